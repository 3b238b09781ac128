//! Integration tests for hairguide-contact.

use hairguide_contact::inside::count_crossings;
use hairguide_contact::{
    is_inside, nearest_on_mesh, raycast_mesh, ContactResult, CurveCollision, MeshBvh, MeshCollider,
    MeshDistanceField,
};
use hairguide_guides::HairCurve;
use hairguide_math::triangle::{closest_point_on_triangle, ray_triangle};
use hairguide_math::{Ray, Vec3};
use hairguide_mesh::generators::{cube, uv_sphere};
use hairguide_mesh::TriangleMesh;
use hairguide_types::TriangleId;

fn probe_points() -> Vec<Vec3> {
    let mut pts = Vec::new();
    for i in 0..40 {
        let f = i as f32;
        pts.push(Vec3::new((f * 0.37).sin() * 1.6, (f * 0.71).cos() * 1.4, (f * 0.53).sin() * 1.2));
    }
    pts
}

// ─── BVH Build Tests ──────────────────────────────────────────

#[test]
fn bvh_empty_mesh() {
    let bvh = MeshBvh::build(&TriangleMesh::default());
    assert!(bvh.is_empty());
    assert!(bvh.nearest_triangle(Vec3::ZERO, f32::INFINITY).is_none());
    let mut visited = 0;
    bvh.raycast(Vec3::ZERO, Vec3::X, |_, _| visited += 1);
    assert_eq!(visited, 0);
}

#[test]
fn bvh_splits_large_meshes() {
    let mesh = uv_sphere(Vec3::ZERO, 1.0, 16, 32);
    let bvh = MeshBvh::build(&mesh);
    assert_eq!(bvh.triangle_count(), mesh.triangle_count());
    assert!(bvh.node_count() > 1);
    let b = bvh.bounds();
    assert!((b.max - Vec3::ONE).abs().max_element() < 1e-3);
}

#[test]
fn bvh_records_mesh_version() {
    let mesh = cube(1.0).with_version(7);
    assert_eq!(MeshBvh::build(&mesh).mesh_version(), 7);
}

// ─── Raycast Tests ────────────────────────────────────────────

#[test]
fn raycast_cube_known_face() {
    let mesh = cube(1.0);
    let bvh = MeshBvh::build(&mesh);
    let ray = Ray::new(Vec3::new(0.2, -0.1, 5.0), Vec3::NEG_Z);
    let hit = raycast_mesh(&bvh, &mesh, &ray).unwrap();

    assert_eq!(hit.triangle, TriangleId(8));
    assert!((hit.t - 4.5).abs() < 1e-5);
    assert!((hit.bary.x + hit.bary.y + hit.bary.z - 1.0).abs() < 1e-5);
    assert!((hit.bary - Vec3::new(0.3, 0.3, 0.4)).abs().max_element() < 1e-5);
    assert!(hit.position.distance(Vec3::new(0.2, -0.1, 0.5)) < 1e-5);
    assert!(hit.normal.distance(Vec3::Z) < 1e-5);

    let direct = mesh.evaluate_barycentric(hit.triangle, hit.bary).unwrap();
    assert!(direct.distance(hit.position) < 1e-6);
}

#[test]
fn raycast_miss() {
    let mesh = cube(1.0);
    let bvh = MeshBvh::build(&mesh);
    let ray = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::NEG_Z);
    assert!(raycast_mesh(&bvh, &mesh, &ray).is_none());
    let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
    assert!(raycast_mesh(&bvh, &mesh, &away).is_none());
}

#[test]
fn raycast_matches_brute_force() {
    let mesh = uv_sphere(Vec3::ZERO, 1.0, 12, 24);
    let bvh = MeshBvh::build(&mesh);
    for p in probe_points() {
        let origin = p * 3.0 + Vec3::new(0.0, 0.0, 0.01);
        let ray = Ray::new(origin, -origin);
        let mut brute: Option<f32> = None;
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle_corners(TriangleId(t as u32)).unwrap();
            if let Some(h) = ray_triangle(ray.origin, ray.direction, a, b, c) {
                brute = Some(brute.map_or(h.t, |bt: f32| bt.min(h.t)));
            }
        }
        let hit = raycast_mesh(&bvh, &mesh, &ray).map(|h| h.t);
        match (brute, hit) {
            (Some(b), Some(h)) => assert!((b - h).abs() < 1e-5, "brute {b} bvh {h}"),
            (None, None) => {}
            other => panic!("disagreement for origin {origin:?}: {other:?}"),
        }
    }
}

// ─── Nearest Tests ────────────────────────────────────────────

#[test]
fn nearest_above_cube_face() {
    let mesh = cube(1.0);
    let bvh = MeshBvh::build(&mesh);
    let hit = bvh.nearest_triangle(Vec3::new(0.2, 0.1, 0.8), f32::INFINITY).unwrap();
    assert_eq!(hit.triangle, TriangleId(8));
    assert!(hit.closest_point.distance(Vec3::new(0.2, 0.1, 0.5)) < 1e-6);
    assert!(hit.normal.distance(Vec3::Z) < 1e-6);
    assert!((hit.distance - 0.3).abs() < 1e-6);
}

#[test]
fn nearest_respects_max_distance() {
    let mesh = cube(1.0);
    let bvh = MeshBvh::build(&mesh);
    assert!(bvh.nearest_triangle(Vec3::new(0.0, 0.0, 0.8), 0.2).is_none());
    assert!(bvh.nearest_triangle(Vec3::new(0.0, 0.0, 0.8), 0.31).is_some());
}

#[test]
fn nearest_matches_brute_force() {
    let mesh = uv_sphere(Vec3::ZERO, 1.0, 12, 24);
    let bvh = MeshBvh::build(&mesh);
    for p in probe_points() {
        let brute = (0..mesh.triangle_count())
            .map(|t| {
                let [a, b, c] = mesh.triangle_corners(TriangleId(t as u32)).unwrap();
                closest_point_on_triangle(p, a, b, c).point.distance(p)
            })
            .fold(f32::INFINITY, f32::min);
        let hit = bvh.nearest_triangle(p, f32::INFINITY).unwrap();
        assert!((hit.distance - brute).abs() < 1e-5, "point {p:?}");
    }
}

#[test]
fn nearest_on_mesh_uses_vertex_normals() {
    let mesh = uv_sphere(Vec3::ZERO, 1.0, 16, 32);
    let bvh = MeshBvh::build(&mesh);
    let hit = nearest_on_mesh(&bvh, &mesh, Vec3::new(0.0, 0.0, 2.0), f32::INFINITY).unwrap();
    assert!((hit.t - 1.0).abs() < 0.02);
    assert!(hit.normal.dot(Vec3::Z) > 0.99);
    assert!((hit.normal.length() - 1.0).abs() < 1e-4);
}

// ─── Inside Tests ─────────────────────────────────────────────

#[test]
fn inside_cube() {
    let bvh = MeshBvh::build(&cube(1.0));
    assert!(is_inside(&bvh, Vec3::new(0.1, 0.2, -0.1)));
    assert!(!is_inside(&bvh, Vec3::new(2.0, 0.2, -0.1)));
    assert!(!is_inside(&bvh, Vec3::new(-2.0, 0.2, -0.1)));
    assert_eq!(count_crossings(&bvh, Vec3::new(-2.0, 0.2, -0.1), Vec3::X), 2);
}

#[test]
fn inside_sphere() {
    let bvh = MeshBvh::build(&uv_sphere(Vec3::ZERO, 1.0, 16, 32));
    assert!(is_inside(&bvh, Vec3::new(0.05, 0.13, 0.07)));
    assert!(!is_inside(&bvh, Vec3::new(0.05, 1.5, 0.07)));
}

// ─── Mesh Collision Tests ─────────────────────────────────────

#[test]
fn mesh_collider_pushes_out_and_sticks() {
    let bvh = MeshBvh::build(&cube(1.0));
    let collider = MeshCollider::new(0.002, 1.0);
    let mut p = Vec3::new(0.1, 0.05, 0.501);
    let mut prev = Vec3::new(0.0, 0.05, 0.511);
    let depth = collider.resolve_point(&bvh, &mut p, &mut prev).unwrap();
    assert!((depth - 0.001).abs() < 1e-5);
    assert!((p.z - 0.502).abs() < 1e-5);
    assert!(p.distance(prev) < 1e-6);
}

#[test]
fn mesh_collider_frictionless_keeps_tangent() {
    let bvh = MeshBvh::build(&cube(1.0));
    let collider = MeshCollider::new(0.002, 0.0);
    let mut p = Vec3::new(0.1, 0.05, 0.501);
    let mut prev = Vec3::new(0.0, 0.05, 0.511);
    collider.resolve_point(&bvh, &mut p, &mut prev).unwrap();
    let v = p - prev;
    assert!((v - Vec3::new(0.1, 0.0, 0.0)).abs().max_element() < 1e-5);
}

#[test]
fn mesh_collider_flips_inside_points() {
    let bvh = MeshBvh::build(&cube(1.0));
    let collider = MeshCollider::new(0.002, 1.0);
    let mut p = Vec3::new(0.1, 0.05, 0.499);
    let mut prev = p;
    collider.resolve_point(&bvh, &mut p, &mut prev).unwrap();
    assert!(p.z >= 0.5 - 1e-6);
    // A second pass finishes the pushout.
    collider.resolve_point(&bvh, &mut p, &mut prev);
    assert!(p.z >= 0.502 - 1e-5);
}

#[test]
fn mesh_collider_lifts_surface_points_along_face_normal() {
    let bvh = MeshBvh::build(&cube(1.0));
    let collider = MeshCollider::new(0.002, 1.0);
    let mut p = Vec3::new(0.25, -0.25, 0.5);
    let mut prev = Vec3::new(0.2, -0.25, 0.5);
    let depth = collider.resolve_point(&bvh, &mut p, &mut prev).unwrap();
    assert!((depth - 0.002).abs() < 1e-6);
    assert!(p.distance(Vec3::new(0.25, -0.25, 0.502)) < 1e-6);
    assert!(p.distance(prev) < 1e-6);
}

#[test]
fn mesh_collider_ignores_far_points_and_root() {
    let bvh = MeshBvh::build(&cube(1.0));
    let collider = MeshCollider::new(0.002, 1.0);
    let mut points = vec![Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.0, 0.6)];
    let mut prev = points.clone();
    let result = collider.resolve_curve(&bvh, &mut points, &mut prev);
    assert_eq!(result, ContactResult::default());
    assert_eq!(points[0], Vec3::new(0.0, 0.0, 0.5));
}

// ─── Curve Collision Tests ────────────────────────────────────

fn pair_of_curves() -> Vec<HairCurve> {
    vec![
        HairCurve::from_points(vec![Vec3::ZERO, Vec3::new(0.0, 0.1, 0.0)], 0.1),
        HairCurve::from_points(vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.001, 0.1, 0.0)], 0.1),
    ]
}

#[test]
fn curve_collision_separates_symmetrically() {
    let mut curves = pair_of_curves();
    let result = CurveCollision::new(0.002).resolve(&mut curves, &[true, true]);
    assert_eq!(result.resolved_count, 1);
    assert!((curves[0].points[1].x + 0.0005).abs() < 1e-6);
    assert!((curves[1].points[1].x - 0.0015).abs() < 1e-6);
    assert!((curves[0].points[1].distance(curves[1].points[1]) - 0.002).abs() < 1e-6);
    assert_eq!(curves[0].points[0], Vec3::ZERO);
}

#[test]
fn curve_collision_skips_unselected() {
    let mut curves = pair_of_curves();
    let before = curves.clone();
    let result = CurveCollision::new(0.002).resolve(&mut curves, &[true, false]);
    assert_eq!(result.resolved_count, 0);
    assert_eq!(curves, before);
}

// ─── Distance Field Tests ─────────────────────────────────────

#[test]
fn distance_field_on_cube() {
    let mesh = cube(1.0);
    let bvh = MeshBvh::build(&mesh);
    let field = MeshDistanceField::build(&mesh, &bvh, 4, 0.03).unwrap();
    assert_eq!(field.resolution(), 16);
    assert!((field.voxel_size() - 1.06 / 15.0).abs() < 1e-5);
    assert!(field.origin().distance(Vec3::splat(-0.53)) < 1e-5);

    for z in 0..16 {
        for y in 0..16 {
            for x in 0..16 {
                let s = field.voxel(x, y, z).unwrap();
                assert!((s.closest_point.abs().max_element() - 0.5).abs() < 1e-4);
            }
        }
    }

    let s = field.sample(Vec3::new(0.0, 0.0, 0.6)).unwrap();
    assert!((s.closest_point.z - 0.5).abs() < 1e-5);
    assert!(s.normal.distance(Vec3::Z) < 1e-5);
    // Far points clamp to the grid.
    assert!(field.sample(Vec3::splat(50.0)).is_some());
    assert!(field.sample(Vec3::splat(f32::NAN)).is_none());
}

#[test]
fn distance_field_empty_mesh() {
    let mesh = TriangleMesh::default();
    let bvh = MeshBvh::build(&mesh);
    assert!(MeshDistanceField::build(&mesh, &bvh, 32, 0.03).is_none());
}
