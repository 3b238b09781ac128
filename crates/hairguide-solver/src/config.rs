//! Safety-net thresholds for the CPU solver.
//!
//! These are heuristics, not stability guarantees; the defaults are tuned
//! for head-sized meshes in metres.

use serde::{Deserialize, Serialize};
use hairguide_types::constants::{
    MAX_REASONABLE_SPEED, WARN_DISTANCE, WARN_EVERY, WARN_SPEED,
};

/// Velocity clamp and motion warning configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyLimits {
    /// Implied speeds above this (m/s) are zeroed before integration.
    pub max_reasonable_speed: f32,
    /// Post-step speed (m/s) that triggers a motion warning.
    pub warn_speed: f32,
    /// Post-step distance from the origin (m) that triggers a motion warning.
    pub warn_distance: f32,
    /// Log the first warning and then every `warn_every`-th.
    pub warn_every: u32,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_reasonable_speed: MAX_REASONABLE_SPEED,
            warn_speed: WARN_SPEED,
            warn_distance: WARN_DISTANCE,
            warn_every: WARN_EVERY,
        }
    }
}

impl SafetyLimits {
    /// Limits for very large scenes: only the velocity clamp stays active.
    pub fn quiet() -> Self {
        Self {
            warn_speed: f32::MAX,
            warn_distance: f32::MAX,
            ..Default::default()
        }
    }
}
