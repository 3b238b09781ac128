//! # hairguide-types
//!
//! Shared error type, identifiers and tuning constants for the
//! hairguide authoring engine.
//!
//! This crate has zero domain logic. It defines the vocabulary
//! the other hairguide crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{HairError, HairResult};
pub use ids::{LayerId, TriangleId};
