//! # hairguide-math
//!
//! Geometry primitives shared by the mesh, collision and solver crates.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Vec2`)
//! - [`Aabb`] with slab ray tests and point distance
//! - [`Ray`] with point, segment and plane queries
//! - Triangle closest-point projection and Möller–Trumbore intersection
//! - Catmull-Rom evaluation and arc-length polyline resampling

pub mod aabb;
pub mod curve;
pub mod ray;
pub mod triangle;

// Re-export glam types as the canonical math types for hairguide.
pub use glam::{Vec2, Vec3};

pub use aabb::Aabb;
pub use ray::Ray;
pub use triangle::{ClosestPoint, RayTriangleHit};
