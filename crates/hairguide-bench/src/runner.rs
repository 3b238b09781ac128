//! Benchmark runner: builds a scene from a scenario, steps it and collects
//! metrics.

use std::time::Instant;

use tracing::{debug, warn};
use hairguide_math::{Ray, Vec3};
use hairguide_scene::Scene;
use hairguide_solver::SolverBackend;
use hairguide_types::constants::FIXED_DT;
use hairguide_types::HairResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Loads the scenario mesh, grows one curve per ray and selects them
    /// all. Rays that miss are skipped.
    pub fn build_scene(scenario: &Scenario, backend: SolverBackend) -> HairResult<Scene> {
        let mut scene = Scene::with_backend(backend).with_settings(scenario.settings.clone());
        scene.load_mesh(scenario.mesh.clone(), None)?;

        let mut missed = 0;
        for ray in &scenario.rays {
            if scene.create_curve_from_ray(ray)?.is_none() {
                missed += 1;
            }
        }
        if missed > 0 {
            warn!(scenario = scenario.kind.name(), missed, "creation rays missed the mesh");
        }
        for i in 0..scene.guides().len() {
            scene.guides_mut().select_curve(i, true);
        }
        Ok(scene)
    }

    /// Runs a scenario on the default CPU backend.
    pub fn run(scenario: &Scenario) -> HairResult<BenchmarkMetrics> {
        Self::run_with_backend(scenario, SolverBackend::default())
    }

    /// Runs a scenario on the given backend.
    pub fn run_with_backend(scenario: &Scenario, backend: SolverBackend) -> HairResult<BenchmarkMetrics> {
        let mut scene = Self::build_scene(scenario, backend)?;
        let curves = scene.guides().len();
        let points = scene.guides().curves().iter().map(|c| c.points.len()).sum();
        let initial_tips: Vec<Option<Vec3>> = scene.guides().curves().iter().map(|c| c.tip()).collect();

        // The grab point, when the drag took hold.
        let grab = scenario.drag.and_then(|script| {
            let tip = scene.guides().curve(script.curve)?.tip()?;
            scene.begin_drag(&Ray::new(tip + Vec3::Z, Vec3::NEG_Z), Vec3::NEG_Z)?;
            Some((script, tip))
        });
        if scenario.drag.is_some() && grab.is_none() {
            warn!(scenario = scenario.kind.name(), "scripted drag could not grab its curve");
        }

        let mut metrics = BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            curves,
            points,
            triangle_count: scenario.mesh.triangle_count(),
            min_step_time: f64::MAX,
            ..Default::default()
        };
        let mut total_iterations: u64 = 0;

        let total_start = Instant::now();
        for step in 0..scenario.timesteps {
            if let Some((script, tip)) = grab {
                let target = tip + script.offset(step as f32 * FIXED_DT);
                scene.update_drag(&Ray::new(target + Vec3::Z, Vec3::NEG_Z));
            }
            let Some(result) = scene.step_once() else {
                break;
            };
            metrics.timesteps += 1;
            metrics.avg_step_time += result.wall_time;
            metrics.min_step_time = metrics.min_step_time.min(result.wall_time);
            metrics.max_step_time = metrics.max_step_time.max(result.wall_time);
            metrics.max_stretch_error = metrics.max_stretch_error.max(result.max_stretch_error);
            metrics.final_stretch_error = result.max_stretch_error;
            metrics.removed_curves += result.removed_curves.len();
            metrics.unpinned += result.unpinned.len();
            metrics.mesh_contacts += u64::from(result.mesh_contacts.resolved_count);
            metrics.curve_contacts += u64::from(result.curve_contacts.resolved_count);
            total_iterations += u64::from(result.iterations);
        }
        metrics.total_wall_time = total_start.elapsed().as_secs_f64();
        scene.end_drag();

        if metrics.timesteps > 0 {
            metrics.avg_step_time /= f64::from(metrics.timesteps);
            metrics.avg_iterations = total_iterations as f32 / metrics.timesteps as f32;
        } else {
            metrics.min_step_time = 0.0;
        }

        // Removals shift indices, so displacement is only tracked when every
        // curve survived.
        if metrics.removed_curves == 0 {
            metrics.max_tip_displacement = scene
                .guides()
                .curves()
                .iter()
                .zip(&initial_tips)
                .filter_map(|(c, start)| Some(c.tip()?.distance((*start)?)))
                .fold(0.0, f32::max);
        }

        debug!(
            scenario = %metrics.scenario,
            steps = metrics.timesteps,
            wall_time = metrics.total_wall_time,
            "benchmark finished"
        );
        Ok(metrics)
    }

    /// Runs every scenario on the default backend.
    pub fn run_all() -> HairResult<Vec<BenchmarkMetrics>> {
        ScenarioKind::all()
            .iter()
            .map(|&kind| Self::run(&Scenario::from_kind(kind)))
            .collect()
    }
}
