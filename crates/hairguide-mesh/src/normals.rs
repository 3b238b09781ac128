//! Vertex normal computation from triangle mesh data.
//!
//! Computes area-weighted vertex normals by accumulating
//! face normals from each adjacent triangle.

use hairguide_math::triangle::face_normal_raw;
use hairguide_math::Vec3;
use hairguide_types::TriangleId;

use crate::mesh::TriangleMesh;

/// Recompute vertex normals from triangle geometry (area-weighted).
///
/// Allocates the normal arrays when the mesh has none. Triangles with
/// out-of-range indices are skipped. Vertices touched by no triangle
/// keep a zero normal.
pub fn compute_vertex_normals(mesh: &mut TriangleMesh) {
    let n = mesh.vertex_count();
    let mut acc = vec![Vec3::ZERO; n];

    for t in 0..mesh.triangle_count() {
        let Some([a, b, c]) = mesh.triangle_vertices(TriangleId(t as u32)) else {
            continue;
        };
        // Magnitude is twice the triangle area, which gives the weighting.
        let fn_raw = face_normal_raw(mesh.position(a), mesh.position(b), mesh.position(c));
        acc[a] += fn_raw;
        acc[b] += fn_raw;
        acc[c] += fn_raw;
    }

    mesh.normal_x.clear();
    mesh.normal_y.clear();
    mesh.normal_z.clear();
    for v in acc {
        let nrm = if v.length_squared() > 1e-20 { v.normalize() } else { Vec3::ZERO };
        mesh.normal_x.push(nrm.x);
        mesh.normal_y.push(nrm.y);
        mesh.normal_z.push(nrm.z);
    }
}
