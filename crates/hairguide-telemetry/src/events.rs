//! Simulation event types.

use serde::{Deserialize, Serialize};

/// An event tagged with the physics step it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideEvent {
    /// Physics step counter of the emitting scene (0-indexed).
    pub step: u64,
    /// What happened.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A physics step started.
    StepBegin {
        /// Simulated time at the start of the step (seconds).
        sim_time: f64,
        /// Curves in the guide set.
        curves: u32,
    },

    /// A physics step finished.
    StepEnd {
        /// Wall-clock time of the step (seconds).
        wall_time: f64,
        simulated_curves: u32,
        max_stretch_error: f32,
    },

    /// A curve was deleted for holding non-finite points.
    CurveDiscarded { curve: usize },

    /// A root binding failed and the root stopped tracking the mesh.
    RootUnpinned { curve: usize, reason: String },

    /// Implausible motion (rate-limited).
    MotionWarning {
        curve: usize,
        max_speed: f32,
        max_distance: f32,
    },

    /// Collision work done in a step.
    Contacts {
        mesh_contacts: u32,
        curve_contacts: u32,
        max_penetration: f32,
    },

    /// A new mesh replaced the previous one.
    MeshReloaded { version: u64, triangles: usize },

    /// Custom event for extensibility.
    Custom {
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl GuideEvent {
    /// An event for `step`.
    pub fn new(step: u64, kind: EventKind) -> Self {
        Self { step, kind }
    }
}
