//! Integration tests for hairguide-scene.

use hairguide_guides::{BindingFault, GuideSettings, HairGuideSet};
use hairguide_math::{Ray, Vec3};
use hairguide_mesh::generators::uv_sphere;
use hairguide_scene::Scene;
use hairguide_solver::{
    BackendKind, DeviceSolver, SolverBackend, SolverStrategy, StepContext, StepResult,
};
use hairguide_telemetry::{EventKind, VecSink};

fn sphere_scene() -> Scene {
    let mut scene = Scene::new();
    scene
        .load_mesh(uv_sphere(Vec3::ZERO, 0.5, 16, 32), None)
        .unwrap();
    scene
}

/// Grows a curve where a -Z ray through `(x, y)` meets the sphere.
fn grow(scene: &mut Scene, x: f32, y: f32) -> usize {
    scene
        .create_curve_from_ray(&Ray::new(Vec3::new(x, y, 2.0), Vec3::NEG_Z))
        .unwrap()
        .unwrap()
        .curve
}

fn tip(scene: &Scene, curve: usize) -> Vec3 {
    scene.guides().curve(curve).unwrap().tip().unwrap()
}

// ─── Mesh Tests ───────────────────────────────────────────────

#[test]
fn load_mesh_bumps_version_and_builds_bvh() {
    let mut scene = Scene::new();
    let sink = VecSink::new();
    scene.events_mut().add_sink(Box::new(sink.clone()));

    assert!(scene.mesh().is_none());
    assert!(scene.bvh().is_none());

    let v1 = scene.load_mesh(uv_sphere(Vec3::ZERO, 0.5, 8, 16), None).unwrap();
    let v2 = scene.load_mesh(uv_sphere(Vec3::ZERO, 0.5, 8, 16), None).unwrap();
    assert_eq!(v1, 1);
    assert_eq!(v2, 2);
    assert_eq!(scene.mesh().unwrap().version, 2);
    assert_eq!(scene.bvh().unwrap().mesh_version(), 2);

    let bounds = scene.mesh_bounds().unwrap();
    assert!((bounds.max.y - 0.5).abs() < 1e-5);

    let reloads = sink
        .events()
        .iter()
        .filter(|e| matches!(e.kind, EventKind::MeshReloaded { .. }))
        .count();
    assert_eq!(reloads, 2);
}

#[test]
fn invalid_mesh_is_rejected() {
    let mut scene = Scene::new();
    let mut mesh = uv_sphere(Vec3::ZERO, 0.5, 8, 16);
    mesh.indices.push(0);
    assert!(scene.load_mesh(mesh, None).is_err());
    assert!(scene.mesh().is_none());
    assert_eq!(scene.mesh_version(), 0);
}

#[test]
fn reload_unpins_existing_curves() {
    let mut scene = sphere_scene();
    let sink = VecSink::new();
    scene.events_mut().add_sink(Box::new(sink.clone()));
    let c = grow(&mut scene, 0.05, 0.05);
    assert!(scene.guides().curve(c).unwrap().is_bound());

    scene.load_mesh(uv_sphere(Vec3::ZERO, 0.5, 16, 32), None).unwrap();
    assert_eq!(scene.guides().len(), 1);
    let result = scene.step_once().unwrap();
    assert_eq!(result.unpinned.len(), 1);
    assert!(!scene.guides().curve(c).unwrap().is_bound());
    assert!(sink
        .events()
        .iter()
        .any(|e| matches!(e.kind, EventKind::RootUnpinned { curve: 0, .. })));
}

#[test]
fn deformed_mesh_carries_roots() {
    let mut scene = sphere_scene();
    let c = grow(&mut scene, 0.05, 0.05);
    let root_before = scene.guides().curve(c).unwrap().points[0];

    let moved = scene.deform_mesh(|mesh| {
        for i in 0..mesh.vertex_count() {
            let p = mesh.position(i);
            mesh.set_position(i, p + Vec3::new(0.0, 0.1, 0.0));
        }
    });
    assert!(moved);
    assert_eq!(scene.mesh_version(), 1);

    scene.step_once().unwrap();
    let root_after = scene.guides().curve(c).unwrap().points[0];
    assert!((root_after - (root_before + Vec3::new(0.0, 0.1, 0.0))).length() < 1e-5);
    assert!(scene.guides().curve(c).unwrap().is_bound());
}

#[test]
fn non_finite_mesh_vertex_unpins_root() {
    let mut scene = sphere_scene();
    let c = grow(&mut scene, 0.05, 0.05);
    let triangle = scene.guides().curve(c).unwrap().root.unwrap().triangle;
    let [vi, _, _] = scene.mesh().unwrap().triangle_vertices(triangle).unwrap();

    assert!(scene.deform_mesh(|mesh| mesh.pos_x[vi] = f32::NAN));
    let result = scene.step_once().unwrap();

    assert_eq!(result.unpinned, vec![(c, BindingFault::NonFinite)]);
    let curve = scene.guides().curve(c).unwrap();
    assert!(!curve.is_bound());
    assert!(curve.is_finite());
    assert_eq!(scene.guides().len(), 1);
}

// ─── Editing Tests ────────────────────────────────────────────

#[test]
fn create_curve_selects_it_alone() {
    let mut scene = sphere_scene();
    let a = grow(&mut scene, 0.1, 0.03);
    let b = grow(&mut scene, -0.1, 0.03);
    assert_eq!(scene.guides().len(), 2);
    assert!(!scene.guides().is_curve_selected(a));
    assert!(scene.guides().is_curve_selected(b));
    assert_eq!(scene.guides().active_curve(), Some(b));

    let curve = scene.guides().curve(b).unwrap();
    assert_eq!(curve.point_count(), 12);
    assert!((curve.length() - 0.3).abs() < 1e-4);
    assert!(curve.is_bound());
}

#[test]
fn create_curve_misses() {
    let mut scene = Scene::new();
    let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
    assert_eq!(scene.create_curve_from_ray(&ray).unwrap(), None);

    let mut scene = sphere_scene();
    let away = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::Z);
    assert_eq!(scene.create_curve_from_ray(&away).unwrap(), None);
    assert!(scene.guides().is_empty());
}

#[test]
fn select_curve_from_ray() {
    let mut scene = sphere_scene();
    let a = grow(&mut scene, 0.1, 0.03);
    let b = grow(&mut scene, -0.1, 0.03);

    let mid = scene.guides().curve(a).unwrap().points[6];
    let ray = Ray::new(mid + Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
    assert_eq!(scene.select_curve_from_ray(&ray, true), Some(a));
    assert!(scene.guides().is_curve_selected(a));
    assert!(scene.guides().is_curve_selected(b));
    assert_eq!(scene.guides().active_curve(), Some(a));

    let nowhere = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::X);
    assert_eq!(scene.select_curve_from_ray(&nowhere, false), None);
    assert_eq!(scene.guides().selected_curves(), vec![0, 1]);

    scene.deselect_all();
    assert!(scene.guides().selected_curves().is_empty());
}

#[test]
fn delete_selected_curves_keeps_the_rest() {
    let mut scene = sphere_scene();
    for i in 0..5 {
        grow(&mut scene, -0.21 + 0.1 * i as f32, 0.03);
    }
    let tips: Vec<Vec3> = (0..5).map(|i| tip(&scene, i)).collect();

    scene.guides_mut().deselect_all();
    scene.guides_mut().select_curve(1, true);
    scene.guides_mut().select_curve(3, true);
    assert_eq!(scene.delete_selected_curves(), 2);

    assert_eq!(scene.guides().len(), 3);
    assert_eq!(tip(&scene, 0), tips[0]);
    assert_eq!(tip(&scene, 1), tips[2]);
    assert_eq!(tip(&scene, 2), tips[4]);
    assert_eq!(scene.delete_selected_curves(), 0);
}

#[test]
fn deleting_the_dragged_curve_ends_the_drag() {
    let mut scene = sphere_scene();
    let c = grow(&mut scene, 0.01, 0.02);
    let t = tip(&scene, c);
    scene
        .begin_drag(&Ray::new(t + Vec3::X * 2.0, Vec3::NEG_X), Vec3::NEG_X)
        .unwrap();
    assert!(scene.drag().is_some());

    assert_eq!(scene.delete_selected_curves(), 1);
    assert!(scene.drag().is_none());
    assert!(scene.drag_plane().is_none());
}

#[test]
fn length_steps_resample_selected() {
    let mut scene = sphere_scene();
    let a = grow(&mut scene, 0.1, 0.03);
    let b = grow(&mut scene, -0.1, 0.03);
    assert_eq!(scene.apply_length_steps_to_selected(0.5, 20), 1);
    assert_eq!(scene.guides().curve(b).unwrap().point_count(), 20);
    assert!((scene.guides().curve(b).unwrap().length() - 0.5).abs() < 1e-3);
    assert_eq!(scene.guides().curve(a).unwrap().point_count(), 12);
}

#[test]
fn reset_settings_keeps_curves() {
    let mut scene = sphere_scene();
    grow(&mut scene, 0.01, 0.1);
    scene.settings_mut().solver_iterations = 3;
    scene.settings_mut().gravity = 2.0;
    scene.reset_settings();
    assert_eq!(scene.settings(), &GuideSettings::default());
    assert_eq!(scene.guides().len(), 1);
}

// ─── Drag Tests ───────────────────────────────────────────────

#[test]
fn drag_moves_tip_by_smoothing_fraction() {
    let mut scene = sphere_scene();
    let c = grow(&mut scene, 0.01, 0.02);
    let t = tip(&scene, c);

    let pin = scene
        .begin_drag(&Ray::new(t + Vec3::X * 2.0, Vec3::NEG_X), Vec3::NEG_X)
        .unwrap();
    assert_eq!(pin.curve, c);
    assert_eq!(pin.vertex, 11);
    assert_eq!(scene.drag_plane().unwrap().point, t);

    assert!(scene.update_drag(&Ray::new(t + Vec3::Y + Vec3::X * 2.0, Vec3::NEG_X)));
    let expected = t + Vec3::Y * 0.35;
    assert!((tip(&scene, c) - expected).length() < 1e-4);

    scene.end_drag();
    assert!(scene.drag().is_none());
    assert!(!scene.update_drag(&Ray::new(t + Vec3::X * 2.0, Vec3::NEG_X)));
}

#[test]
fn drag_prefers_selected_then_any_curve() {
    let mut scene = sphere_scene();
    let a = grow(&mut scene, 0.2, 0.03);
    let _b = grow(&mut scene, -0.2, 0.03);
    assert!(!scene.guides().is_curve_selected(a));

    let t = tip(&scene, a);
    let pin = scene
        .begin_drag(&Ray::new(t + Vec3::Y * 2.0, Vec3::NEG_Y), Vec3::NEG_Y)
        .unwrap();
    assert_eq!(pin.curve, a);
    assert!(scene.guides().is_curve_selected(a));
    assert_eq!(scene.guides().active_curve(), Some(a));
}

#[test]
fn drag_misses_leave_state_alone() {
    let mut scene = sphere_scene();
    grow(&mut scene, 0.01, 0.02);
    let miss = Ray::new(Vec3::new(3.0, 3.0, 3.0), Vec3::X);
    assert!(scene.begin_drag(&miss, Vec3::NEG_Z).is_none());
    assert!(scene.drag().is_none());
    let invalid = Ray::new(Vec3::ZERO, Vec3::ZERO);
    assert!(scene.begin_drag(&invalid, Vec3::NEG_Z).is_none());
}

#[test]
fn drag_stability_scenario() {
    let mut scene = sphere_scene();
    let c = grow(&mut scene, 0.01, 0.02);
    let t = tip(&scene, c);

    // Grab the tip and pull toward a point 1 m away in a single frame.
    scene
        .begin_drag(&Ray::new(t + Vec3::X * 2.0, Vec3::NEG_X), Vec3::NEG_X)
        .unwrap();
    assert!(scene.update_drag(&Ray::new(t + Vec3::Y + Vec3::X * 2.0, Vec3::NEG_X)));
    scene.end_drag();

    for _ in 0..8 {
        let result = scene.step_once().unwrap();
        assert!(result.removed_curves.is_empty());
    }

    let curve = scene.guides().curve(c).unwrap();
    assert!(curve.is_finite());
    let rest = curve.segment_rest_len;
    assert!((rest - 0.3 / 11.0).abs() < 1e-6);
    for seg in curve.points.windows(2) {
        let len = seg[0].distance(seg[1]);
        assert!(
            (len - rest).abs() < 0.05 * rest,
            "segment {} vs rest {}",
            len,
            rest
        );
    }
}

// ─── Mirror Tests ─────────────────────────────────────────────

#[test]
fn mirror_mode_creates_linked_twin() {
    let mut scene = sphere_scene();
    scene.settings_mut().mirror_mode = true;
    let created = scene
        .create_curve_from_ray(&Ray::new(Vec3::new(0.2, 0.1, 2.0), Vec3::NEG_Z))
        .unwrap()
        .unwrap();
    let twin = created.mirror.unwrap();
    assert_eq!(scene.guides().len(), 2);
    assert!(scene.guides().is_curve_selected(created.curve));
    assert!(scene.guides().is_curve_selected(twin));
    assert_eq!(scene.guides().active_curve(), Some(created.curve));
    assert_eq!(scene.interaction().mirror.peer(created.curve), Some(twin));

    let root = scene.guides().curve(created.curve).unwrap().points[0];
    let twin_root = scene.guides().curve(twin).unwrap().points[0];
    assert!((twin_root - Vec3::new(-root.x, root.y, root.z)).length() < 1e-3);
}

#[test]
fn mirror_twin_follows_drag() {
    let mut scene = sphere_scene();
    scene.settings_mut().mirror_mode = true;
    let created = scene
        .create_curve_from_ray(&Ray::new(Vec3::new(0.2, 0.1, 2.0), Vec3::NEG_Z))
        .unwrap()
        .unwrap();
    let (a, twin) = (created.curve, created.mirror.unwrap());

    let curve = scene.guides().curve(a).unwrap();
    let t = curve.tip().unwrap();
    let dir = (t - curve.points[0]).normalize();
    let side = dir.cross(Vec3::Y).normalize();

    let pin = scene.begin_drag(&Ray::new(t + side, -side), -side).unwrap();
    assert_eq!((pin.curve, pin.vertex), (a, 11));
    assert!(scene.update_drag(&Ray::new(t + Vec3::Y * 0.5 + side, -side)));

    let moved = tip(&scene, a);
    let mirrored = tip(&scene, twin);
    assert!((moved - (t + Vec3::Y * 0.175)).length() < 1e-4);
    assert!((mirrored - Vec3::new(-moved.x, moved.y, moved.z)).length() < 1e-6);
}

#[test]
fn mirror_pair_pruned_by_selection() {
    let mut scene = sphere_scene();
    scene.settings_mut().mirror_mode = true;
    let created = scene
        .create_curve_from_ray(&Ray::new(Vec3::new(0.2, 0.1, 2.0), Vec3::NEG_Z))
        .unwrap()
        .unwrap();
    let a = created.curve;

    let mid = scene.guides().curve(a).unwrap().points[6];
    let ray = Ray::new(mid + Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
    assert_eq!(scene.select_curve_from_ray(&ray, false), Some(a));
    assert!(scene.interaction().mirror.is_empty());
}

#[test]
fn mirror_plane_hit_makes_no_twin() {
    let mut scene = sphere_scene();
    scene.settings_mut().mirror_mode = true;
    let created = scene
        .create_curve_from_ray(&Ray::new(Vec3::new(1.0e-5, 0.1, 2.0), Vec3::NEG_Z))
        .unwrap()
        .unwrap();
    assert_eq!(created.mirror, None);
    assert_eq!(scene.guides().len(), 1);
}

// ─── Simulation Tests ─────────────────────────────────────────

#[test]
fn gravity_override_targets_active_curve() {
    let mut scene = sphere_scene();
    let a = grow(&mut scene, 0.15, 0.1);
    let b = grow(&mut scene, -0.15, -0.1);
    scene.guides_mut().select_curve(a, true);
    assert_eq!(scene.guides().selected_curves(), vec![a, b]);
    assert_eq!(scene.guides().active_curve(), Some(a));

    let (tip_a, tip_b) = (tip(&scene, a), tip(&scene, b));
    scene.set_gravity_override_held(true);
    assert_eq!(scene.effective_gravity(a), 9.81);
    assert_eq!(scene.effective_gravity(b), 0.0);
    for _ in 0..30 {
        scene.step_once().unwrap();
    }
    assert!(tip(&scene, a).y < tip_a.y - 0.01);
    assert!((tip(&scene, b) - tip_b).length() < 1e-4);

    scene.set_gravity_override_held(false);
    assert!(!scene.gravity_override_held());
    assert_eq!(scene.effective_gravity(a), 0.0);
}

#[test]
fn simulate_pays_out_fixed_steps() {
    let mut scene = sphere_scene();
    grow(&mut scene, 0.01, 0.1);
    let report = scene.simulate(0.05);
    assert_eq!(report.steps, 6);
    assert_eq!(report.backend, BackendKind::Cpu);
    assert_eq!(scene.step_count(), 6);
    assert!(scene.sim_time() > 0.049 && scene.sim_time() < 0.051);
}

#[test]
fn disabled_simulation_does_not_accumulate() {
    let mut scene = sphere_scene();
    scene.settings_mut().enable_simulation = false;
    let report = scene.simulate(0.05);
    assert_eq!(report.steps, 0);
    assert_eq!(scene.driver().accumulator(), 0.0);
    assert_eq!(scene.step_count(), 0);
}

#[test]
fn no_mesh_steps_are_no_ops() {
    let mut scene = Scene::new();
    assert!(scene.step_once().is_none());
    let report = scene.simulate(0.05);
    assert_eq!(report.steps, 0);
    assert_eq!(scene.step_count(), 0);
}

#[test]
fn corrupted_curve_is_discarded_and_reported() {
    let mut scene = sphere_scene();
    let sink = VecSink::new();
    scene.events_mut().add_sink(Box::new(sink.clone()));
    let a = grow(&mut scene, 0.1, 0.03);
    let b = grow(&mut scene, -0.1, 0.03);
    scene.guides_mut().select_curve(a, true);

    let t = tip(&scene, b);
    scene
        .begin_drag(&Ray::new(t + Vec3::X * 2.0, Vec3::NEG_X), Vec3::NEG_X)
        .unwrap();
    scene.guides_mut().curve_mut(a).unwrap().points[4] = Vec3::NAN;

    let result = scene.step_once().unwrap();
    assert_eq!(result.removed_curves, vec![a]);
    assert_eq!(scene.guides().len(), 1);
    assert_eq!(scene.drag().map(|d| d.curve), Some(0));

    let events = sink.events();
    assert!(events
        .iter()
        .any(|e| matches!(e.kind, EventKind::CurveDiscarded { curve: 0 })));
    assert!(events.iter().any(|e| matches!(e.kind, EventKind::StepBegin { curves: 2, .. })));
    assert!(matches!(events.last().unwrap().kind, EventKind::StepEnd { .. }));
}

// ─── Backend Tests ────────────────────────────────────────────

struct FieldDevice;

impl SolverStrategy for FieldDevice {
    fn step(&mut self, _guides: &mut HairGuideSet, ctx: &StepContext<'_>, _dt: f32) -> StepResult {
        StepResult {
            simulated_curves: u32::from(ctx.field.is_some()),
            ..Default::default()
        }
    }

    fn name(&self) -> &str {
        "field_device"
    }

    fn uses_distance_field(&self) -> bool {
        true
    }
}

impl DeviceSolver for FieldDevice {
    fn probe(&self) -> Result<(), String> {
        Ok(())
    }
}

#[test]
fn device_backend_gets_lazy_distance_field() {
    let backend = SolverBackend::default().with_device(Box::new(FieldDevice));
    let mut scene = Scene::with_backend(backend);
    scene.load_mesh(uv_sphere(Vec3::ZERO, 0.5, 8, 16), None).unwrap();
    scene.set_field_resolution(16);
    assert!(scene.distance_field().is_none());

    let report = scene.simulate(0.02);
    assert_eq!(report.backend, BackendKind::Cpu);
    assert!(scene.distance_field().is_none());

    scene.settings_mut().enable_device_solver = true;
    let report = scene.simulate(0.02);
    assert_eq!(report.backend, BackendKind::Device);
    assert_eq!(scene.backend().active_name(), "field_device");
    let field = scene.distance_field().unwrap();
    assert_eq!(field.resolution(), 16);
    assert_eq!(field.mesh_version(), 1);
}
