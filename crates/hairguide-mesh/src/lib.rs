//! # hairguide-mesh
//!
//! Triangle mesh representation with Structure-of-Arrays (SoA) layout.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`] — Positions, optional normals/UVs and triangle
//!   indices in contiguous SoA buffers, plus the version counter that
//!   downstream caches key off.
//! - Procedural generators for tests and benchmarks (cube, UV sphere,
//!   quad grid).

pub mod generators;
pub mod mesh;
pub mod normals;

pub use mesh::TriangleMesh;
