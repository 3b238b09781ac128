//! Global guide/solver tuning.
//!
//! Values are stored as the user typed them and clamped at the point of
//! use through the `clamped_*` accessors, so an out-of-range setting never
//! reaches the solver and is never rejected either.

use serde::{Deserialize, Serialize};
use hairguide_types::constants::{
    GRAVITY, MAX_CURVE_STEPS, MAX_SOLVER_ITERATIONS, MIN_CURVE_LENGTH, MIN_CURVE_STEPS,
    MIN_SOLVER_ITERATIONS,
};

/// Flat configuration record shared by editing and simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideSettings {
    /// Length of newly created curves (m).
    pub default_length: f32,
    /// Control points per newly created curve.
    pub default_steps: usize,

    /// Master switch for the physics step.
    pub enable_simulation: bool,
    /// Push points out of the head mesh.
    pub enable_mesh_collision: bool,
    /// Push points of different selected curves apart.
    pub enable_curve_collision: bool,
    /// Prefer the device solver when one is available.
    pub enable_device_solver: bool,
    /// Author curves in X-mirrored pairs.
    pub mirror_mode: bool,

    /// Minimum point-to-surface / point-to-point separation (m).
    pub collision_thickness: f32,
    /// Tangential velocity removed on mesh contact (0 = slide, 1 = stick).
    pub friction: f32,
    /// Constraint relaxation passes per step.
    pub solver_iterations: u32,
    /// Gravity magnitude along -Y (m/s²).
    pub gravity: f32,
    /// Fraction of implied velocity kept each step.
    pub damping: f32,
    /// Stiffness of the i/i+2 bend constraints (0 disables them).
    pub bend_stiffness: f32,
    /// Fraction of the remaining drag distance covered per drag update.
    pub drag_smoothing: f32,
    /// Gravity applied while the override input is held (m/s²).
    pub gravity_override: f32,
}

impl Default for GuideSettings {
    fn default() -> Self {
        Self {
            default_length: 0.3,
            default_steps: 12,
            enable_simulation: true,
            enable_mesh_collision: true,
            enable_curve_collision: false,
            enable_device_solver: false,
            mirror_mode: false,
            collision_thickness: 0.002,
            friction: 1.0,
            solver_iterations: 24,
            gravity: 0.0,
            damping: 0.9,
            bend_stiffness: 0.10,
            drag_smoothing: 0.35,
            gravity_override: GRAVITY,
        }
    }
}

impl GuideSettings {
    /// Cheaper settings for dense scenes (fewer relaxation passes).
    pub fn interactive() -> Self {
        Self {
            solver_iterations: 8,
            ..Default::default()
        }
    }

    /// Tighter length preservation at higher cost.
    pub fn precise() -> Self {
        Self {
            solver_iterations: MAX_SOLVER_ITERATIONS,
            ..Default::default()
        }
    }

    /// Points per new curve, within the supported range.
    pub fn clamped_steps(&self) -> usize {
        self.default_steps.clamp(MIN_CURVE_STEPS, MAX_CURVE_STEPS)
    }

    /// Default curve length, never shorter than the minimum.
    pub fn clamped_length(&self) -> f32 {
        if self.default_length.is_finite() {
            self.default_length.max(MIN_CURVE_LENGTH)
        } else {
            MIN_CURVE_LENGTH
        }
    }

    /// Constraint passes per step, within the supported range.
    pub fn clamped_iterations(&self) -> u32 {
        self.solver_iterations
            .clamp(MIN_SOLVER_ITERATIONS, MAX_SOLVER_ITERATIONS)
    }

    /// Collision thickness, non-negative.
    pub fn clamped_thickness(&self) -> f32 {
        finite_or(self.collision_thickness, 0.0).max(0.0)
    }

    /// Friction in `[0, 1]`.
    pub fn clamped_friction(&self) -> f32 {
        finite_or(self.friction, 1.0).clamp(0.0, 1.0)
    }

    /// Velocity damping in `[0, 1]`.
    pub fn clamped_damping(&self) -> f32 {
        finite_or(self.damping, 1.0).clamp(0.0, 1.0)
    }

    /// Bend stiffness in `[0, 1]`.
    pub fn clamped_bend_stiffness(&self) -> f32 {
        finite_or(self.bend_stiffness, 0.0).clamp(0.0, 1.0)
    }

    /// Drag smoothing in `[0.05, 1]`.
    pub fn clamped_drag_smoothing(&self) -> f32 {
        finite_or(self.drag_smoothing, 1.0).clamp(0.05, 1.0)
    }

    /// Gravity magnitude, zero if non-finite.
    pub fn clamped_gravity(&self) -> f32 {
        finite_or(self.gravity, 0.0)
    }

    /// Gravity override magnitude, standard gravity if non-finite.
    pub fn clamped_gravity_override(&self) -> f32 {
        finite_or(self.gravity_override, GRAVITY)
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}
