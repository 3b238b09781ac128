//! Exact ray and nearest-point queries built on [`MeshBvh`].

use hairguide_math::triangle::ray_triangle;
use hairguide_math::{Ray, Vec3};
use hairguide_mesh::TriangleMesh;
use hairguide_types::TriangleId;

use crate::bvh::MeshBvh;

/// A surface hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter for ray casts, surface distance for nearest queries.
    pub t: f32,
    /// Triangle that was hit.
    pub triangle: TriangleId,
    /// Barycentric weights of the hit on that triangle.
    pub bary: Vec3,
    /// World-space hit point.
    pub position: Vec3,
    /// Interpolated vertex normal, or the face normal if the mesh has none.
    pub normal: Vec3,
}

/// Nearest ray-triangle crossing in front of the ray origin.
///
/// `mesh` supplies shading normals; if it is not the version `bvh` was
/// built from, the face normals captured by the tree are used instead.
pub fn raycast_mesh(bvh: &MeshBvh, mesh: &TriangleMesh, ray: &Ray) -> Option<RayHit> {
    if !ray.is_valid() {
        return None;
    }
    let mut best: Option<(TriangleId, f32, Vec3)> = None;
    bvh.raycast(ray.origin, ray.direction, |t, [a, b, c]| {
        if let Some(hit) = ray_triangle(ray.origin, ray.direction, *a, *b, *c) {
            if best.map_or(true, |(_, bt, _)| hit.t < bt) {
                best = Some((t, hit.t, hit.bary));
            }
        }
    });

    let (triangle, t, bary) = best?;
    let [a, b, c] = *bvh.corners(triangle)?;
    Some(RayHit {
        t,
        triangle,
        bary,
        position: a * bary.x + b * bary.y + c * bary.z,
        normal: shading_normal(bvh, mesh, triangle, bary),
    })
}

/// Closest surface point within `max_distance` of `p`.
pub fn nearest_on_mesh(bvh: &MeshBvh, mesh: &TriangleMesh, p: Vec3, max_distance: f32) -> Option<RayHit> {
    let hit = bvh.nearest_triangle(p, max_distance)?;
    Some(RayHit {
        t: hit.distance,
        triangle: hit.triangle,
        bary: hit.bary,
        position: hit.closest_point,
        normal: shading_normal(bvh, mesh, hit.triangle, hit.bary),
    })
}

fn shading_normal(bvh: &MeshBvh, mesh: &TriangleMesh, triangle: TriangleId, bary: Vec3) -> Vec3 {
    let face = bvh.face_normal(triangle).unwrap_or(Vec3::Y);
    if mesh.version != bvh.mesh_version() {
        return face;
    }
    mesh.interpolated_normal(triangle, bary)
        .filter(|n| n.length_squared() > 0.0)
        .unwrap_or(face)
}
