//! # hairguide-scene
//!
//! The authoring session: one head mesh, the guide curves grown on it,
//! the editor's transient interaction state and the simulation loop.
//!
//! ## Key Types
//!
//! - [`Scene`] — Owns the mesh and its version, BVH and distance-field
//!   caches, guides, settings, interaction, timestep driver, solver
//!   backend and event bus
//! - [`FrameReport`] — What one `simulate` call did
//! - [`CurveCreation`] — Curves grown by one click (with mirror twin)

pub mod drag;
pub mod editing;
pub mod scene;
pub mod simulate;

pub use drag::DragPlane;
pub use editing::CurveCreation;
pub use scene::Scene;
pub use simulate::FrameReport;
