//! CPU guide solver.
//!
//! Per selected curve, every substep:
//! 1. Zero implausible implied velocities, discard curves holding NaN/Inf
//! 2. Damped Verlet integration (root and dragged vertex stay put)
//! 3. `solver_iterations` passes of stretch, bend and mesh pushout
//! 4. Motion diagnostics
//!
//! Then curve-curve collision over the selected set.

use std::time::Instant;

use tracing::{error, warn};
use hairguide_contact::{CurveCollision, MeshCollider};
use hairguide_guides::{GuideSettings, HairCurve, HairGuideSet};
use hairguide_math::Vec3;

use crate::config::SafetyLimits;
use crate::constraints::{clamp_velocities, integrate, relax_chain};
use crate::strategy::{MotionWarning, SolverStrategy, StepContext, StepResult};

/// Reference Verlet/position-based solver.
#[derive(Debug, Clone, Default)]
pub struct VerletSolver {
    limits: SafetyLimits,
    /// Motion warnings seen so far; drives the rate limit.
    warn_counter: u64,
}

enum CurveOutcome {
    Skipped,
    Simulated,
    Corrupted,
}

impl VerletSolver {
    /// A solver with default safety limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// A solver with custom safety limits.
    pub fn with_limits(limits: SafetyLimits) -> Self {
        Self {
            limits,
            warn_counter: 0,
        }
    }

    /// Safety limits in use.
    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    fn simulate_curve(
        &mut self,
        index: usize,
        curve: &mut HairCurve,
        ctx: &StepContext<'_>,
        gravity: f32,
        dt: f32,
        result: &mut StepResult,
    ) -> CurveOutcome {
        let settings = ctx.settings;
        if curve.points.len() < 2 {
            return CurveOutcome::Skipped;
        }
        curve.resync_prev();

        result.clamped_velocities += clamp_velocities(
            &curve.points,
            &mut curve.prev_points,
            self.limits.max_reasonable_speed * dt,
        );

        if let Some(bad) = curve.first_non_finite() {
            error!(curve = index, vertex = bad, "non-finite control point; discarding curve");
            return CurveOutcome::Corrupted;
        }

        let pinned = ctx
            .interaction
            .pinned_vertex(index)
            .filter(|&v| v < curve.points.len());
        if let Some(v) = pinned {
            curve.prev_points[v] = curve.points[v];
        }
        integrate(
            &mut curve.points,
            &mut curve.prev_points,
            dt,
            Vec3::new(0.0, -gravity.max(0.0), 0.0),
            settings.clamped_damping(),
            pinned,
        );

        if curve.segment_rest_len <= 0.0 || !curve.segment_rest_len.is_finite() {
            curve.segment_rest_len = settings.clamped_length() / (curve.points.len() - 1) as f32;
        }
        let rest = curve.segment_rest_len;
        let bend = settings.clamped_bend_stiffness();
        let collider = (settings.enable_mesh_collision && !ctx.bvh.is_empty())
            .then(|| MeshCollider::new(settings.clamped_thickness(), settings.clamped_friction()));

        for _ in 0..settings.clamped_iterations() {
            relax_chain(&mut curve.points, rest, bend, pinned);
            if let Some(collider) = &collider {
                let contacts = collider.resolve_curve(ctx.bvh, &mut curve.points, &mut curve.prev_points);
                result.mesh_contacts.merge(&contacts);
            }
        }

        self.diagnose(index, curve, dt, result);
        result.max_stretch_error = result.max_stretch_error.max(curve.max_stretch_error());
        CurveOutcome::Simulated
    }

    fn diagnose(&mut self, index: usize, curve: &HairCurve, dt: f32, result: &mut StepResult) {
        let mut max_speed = 0.0_f32;
        let mut max_distance = 0.0_f32;
        for (p, q) in curve.points.iter().zip(&curve.prev_points) {
            max_speed = max_speed.max((*p - *q).length() / dt);
            max_distance = max_distance.max(p.length());
        }
        if max_speed <= self.limits.warn_speed && max_distance <= self.limits.warn_distance {
            return;
        }
        let every = u64::from(self.limits.warn_every.max(1));
        let seen = self.warn_counter;
        self.warn_counter += 1;
        if seen % every == 0 {
            warn!(curve = index, max_speed, max_distance, "curve moving implausibly fast or far");
            result.motion_warnings.push(MotionWarning {
                curve: index,
                max_speed,
                max_distance,
            });
        }
    }
}

impl SolverStrategy for VerletSolver {
    fn step(&mut self, guides: &mut HairGuideSet, ctx: &StepContext<'_>, dt: f32) -> StepResult {
        let start = Instant::now();
        let settings: &GuideSettings = ctx.settings;
        let mut result = StepResult {
            iterations: settings.clamped_iterations(),
            ..Default::default()
        };
        if dt <= 0.0 || !settings.enable_simulation {
            return result;
        }

        result.unpinned = guides.update_pinned_roots_from_mesh(ctx.mesh);

        let selected = guides.selection().to_vec();
        let active = guides.active_curve();
        let mut corrupted = Vec::new();
        for (index, curve) in guides.curves_mut().iter_mut().enumerate() {
            if !selected[index] {
                continue;
            }
            let gravity = ctx.interaction.effective_gravity(index, active, settings);
            match self.simulate_curve(index, curve, ctx, gravity, dt, &mut result) {
                CurveOutcome::Simulated => result.simulated_curves += 1,
                CurveOutcome::Corrupted => corrupted.push(index),
                CurveOutcome::Skipped => {}
            }
        }

        // Deferred so indices stay valid during the pass above.
        corrupted.reverse();
        for &index in &corrupted {
            guides.remove_curve(index);
        }
        result.removed_curves = corrupted;

        if settings.enable_curve_collision && guides.len() >= 2 {
            let selected = guides.selection().to_vec();
            result.curve_contacts =
                CurveCollision::new(settings.clamped_thickness()).resolve(guides.curves_mut(), &selected);
        }

        result.wall_time = start.elapsed().as_secs_f64();
        result
    }

    fn name(&self) -> &str {
        "cpu_verlet"
    }
}
