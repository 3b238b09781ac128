//! # hairguide-contact
//!
//! Spatial queries against the head mesh and the collision passes the
//! solver runs every substep.
//!
//! 1. **Spatial index** — [`MeshBvh`], a median-split triangle BVH answering
//!    ray-candidate and nearest-triangle queries
//! 2. **Classification** — [`is_inside`], a ray-parity inside test used to
//!    pick the pushout sign
//! 3. **Response** — [`MeshCollider`] (point vs. mesh pushout with friction)
//!    and [`CurveCollision`] (pairwise point repulsion between curves)
//!
//! [`MeshDistanceField`] bakes nearest-surface records onto a voxel grid for
//! solvers that cannot walk the BVH.

pub mod bvh;
pub mod curve_collision;
pub mod distance_field;
pub mod inside;
pub mod mesh_collision;
pub mod raycast;
pub mod response;

pub use bvh::{MeshBvh, NearestHit};
pub use curve_collision::CurveCollision;
pub use distance_field::{FieldSample, MeshDistanceField};
pub use inside::is_inside;
pub use mesh_collision::MeshCollider;
pub use raycast::{nearest_on_mesh, raycast_mesh, RayHit};
pub use response::ContactResult;
