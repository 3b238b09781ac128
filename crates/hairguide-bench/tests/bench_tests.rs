//! Integration tests for hairguide-bench.

use hairguide_bench::metrics::BenchmarkMetrics;
use hairguide_bench::runner::BenchmarkRunner;
use hairguide_bench::scenarios::{Scenario, ScenarioKind};
use hairguide_math::Vec3;
use hairguide_solver::SolverBackend;

// ─── Scenario Tests ───────────────────────────────────────────

#[test]
fn head_drape_setup() {
    let s = Scenario::head_drape();
    assert_eq!(s.kind, ScenarioKind::HeadDrape);
    assert_eq!(s.rays.len(), 64);
    assert!(s.settings.gravity > 0.0);
    assert!(s.drag.is_none());
    assert!(s.mesh.validate().is_ok());
}

#[test]
fn drag_stress_setup() {
    let s = Scenario::drag_stress();
    let script = s.drag.unwrap();
    assert_eq!(script.curve, 0);
    assert_eq!(script.offset(0.0), Vec3::ZERO);
    let quarter = script.offset(script.period * 0.25);
    assert!((quarter.x - script.amplitude).abs() < 1e-5);
    assert!((quarter.y - script.amplitude).abs() < 1e-5);
}

#[test]
fn curve_crowd_setup() {
    let s = Scenario::curve_crowd();
    assert_eq!(s.rays.len(), 100);
    assert!(s.settings.enable_curve_collision);
    assert_eq!(s.mesh.triangle_count(), 12);
}

#[test]
fn scenario_names_round_trip() {
    assert_eq!(ScenarioKind::all().len(), 3);
    for &kind in ScenarioKind::all() {
        assert_eq!(ScenarioKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(ScenarioKind::from_name("hanging_sheet"), None);
}

// ─── Runner Tests ─────────────────────────────────────────────

#[test]
fn build_scene_grows_and_selects_curves() {
    let scenario = Scenario::head_drape();
    let scene = BenchmarkRunner::build_scene(&scenario, SolverBackend::default()).unwrap();
    let curves = scene.guides().len();
    assert!(curves >= 60, "only {curves} of 64 rays hit");
    assert_eq!(scene.guides().selected_curves().len(), curves);
    assert!(scene.guides().curves().iter().all(|c| c.is_bound()));
}

#[test]
fn run_head_drape() {
    let scenario = Scenario::head_drape().with_timesteps(10);
    let metrics = BenchmarkRunner::run(&scenario).unwrap();

    assert_eq!(metrics.scenario, "head_drape");
    assert_eq!(metrics.timesteps, 10);
    assert_eq!(metrics.points, metrics.curves * 12);
    assert_eq!(metrics.removed_curves, 0);
    assert_eq!(metrics.unpinned, 0);
    assert!(metrics.max_tip_displacement > 1e-4); // Gravity pulls the tips down
    assert!(metrics.max_stretch_error.is_finite());
    assert!(metrics.min_step_time <= metrics.max_step_time);
    assert!(metrics.avg_iterations > 0.0);
}

#[test]
fn run_drag_stress_moves_the_dragged_tip() {
    let scenario = Scenario::drag_stress().with_timesteps(12);
    let metrics = BenchmarkRunner::run(&scenario).unwrap();
    assert_eq!(metrics.timesteps, 12);
    assert!(metrics.max_tip_displacement > 1e-3);
    assert_eq!(metrics.removed_curves, 0);
}

#[test]
fn run_all_scenarios_briefly() {
    for &kind in ScenarioKind::all() {
        let scenario = Scenario::from_kind(kind).with_timesteps(3);
        let metrics = BenchmarkRunner::run(&scenario).unwrap();
        assert_eq!(metrics.scenario, kind.name());
        assert_eq!(metrics.timesteps, 3);
        assert!(metrics.curves > 0);
        assert!(metrics.total_wall_time >= 0.0);
    }
}

// ─── Metrics Tests ────────────────────────────────────────────

fn sample_metrics() -> BenchmarkMetrics {
    BenchmarkMetrics {
        scenario: "test".into(),
        curves: 64,
        points: 768,
        triangle_count: 2304,
        timesteps: 100,
        total_wall_time: 1.5,
        avg_step_time: 0.015,
        min_step_time: 0.01,
        max_step_time: 0.02,
        avg_iterations: 24.0,
        max_stretch_error: 1.0e-3,
        final_stretch_error: 2.0e-4,
        max_tip_displacement: 0.12,
        removed_curves: 0,
        unpinned: 1,
        mesh_contacts: 5000,
        curve_contacts: 0,
    }
}

#[test]
fn metrics_csv_output() {
    let row = sample_metrics().to_csv_row();
    assert!(row.starts_with("test,64,768,2304,100,"));
    assert!(row.ends_with(",0,1,5000,0"));
    let header = BenchmarkMetrics::to_csv_header();
    assert_eq!(row.split(',').count(), header.split(',').count());
}

#[test]
fn metrics_csv_multi() {
    let csv = BenchmarkMetrics::to_csv(&[sample_metrics(), sample_metrics()]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3); // Header + 2 data rows
    assert!(lines[0].starts_with("scenario,"));
}

#[test]
fn metrics_json_round_trip() {
    let json = serde_json::to_string(&sample_metrics()).unwrap();
    let recovered: BenchmarkMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.timesteps, 100);
    assert_eq!(recovered.mesh_contacts, 5000);
}
