//! # hairguide-solver
//!
//! Fixed-timestep simulation of guide curves.
//!
//! ## Key Types
//!
//! - [`SolverStrategy`] — Step contract shared by every execution backend
//! - [`VerletSolver`] — CPU Verlet integration with position-based stretch,
//!   bend and collision passes
//! - [`Interaction`] — Transient editor state the solver honours (drag pin,
//!   gravity override, mirror pairs)
//! - [`FixedTimestep`] — Frame-time accumulator producing fixed substeps
//! - [`SolverBackend`] — CPU solver plus an optional device solver, chosen
//!   by capability with CPU fallback
//! - [`SafetyLimits`] — Velocity clamp and motion warning thresholds

pub mod backend;
pub mod config;
pub mod constraints;
pub mod cpu;
pub mod driver;
pub mod interaction;
pub mod strategy;

pub use backend::{BackendKind, DeviceSolver, SolverBackend};
pub use config::SafetyLimits;
pub use cpu::VerletSolver;
pub use driver::FixedTimestep;
pub use interaction::{DragPin, Interaction, MirrorPairs};
pub use strategy::{MotionWarning, SolverStrategy, StepContext, StepResult};
