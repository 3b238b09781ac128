//! Procedural mesh generators for benchmarks and testing.
//!
//! These generators produce deterministic meshes with outward-facing
//! counter-clockwise winding.

use hairguide_math::Vec3;

use crate::mesh::TriangleMesh;

/// Generates an axis-aligned cube of edge length `size` centred at the origin.
///
/// 8 shared vertices, 12 triangles, no normals (queries fall back to face
/// normals). Triangles come in face pairs: +X (0, 1), -X (2, 3), +Y (4, 5),
/// -Y (6, 7), +Z (8, 9), -Z (10, 11). Vertex `i` has sign bits
/// `x = i & 1`, `y = i & 2`, `z = i & 4`.
///
/// # Example
/// ```
/// use hairguide_mesh::generators::cube;
/// let mesh = cube(1.0);
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn cube(size: f32) -> TriangleMesh {
    let h = size * 0.5;
    let mut mesh = TriangleMesh::with_capacity(8, 12);
    for i in 0..8u32 {
        let sign = |bit: u32| if i & bit != 0 { h } else { -h };
        mesh.pos_x.push(sign(1));
        mesh.pos_y.push(sign(2));
        mesh.pos_z.push(sign(4));
    }
    mesh.indices = vec![
        1, 3, 7, 1, 7, 5, // +X
        0, 6, 2, 0, 4, 6, // -X
        2, 6, 7, 2, 7, 3, // +Y
        0, 1, 5, 0, 5, 4, // -Y
        4, 5, 7, 4, 7, 6, // +Z
        0, 2, 3, 0, 3, 1, // -Z
    ];
    mesh
}

/// Generates a flat rectangular quad grid in the XZ plane at `y = 0`,
/// facing +Y.
///
/// # Arguments
/// - `cols` — Number of quads along X (vertex count = cols + 1).
/// - `rows` — Number of quads along Z (vertex count = rows + 1).
/// - `width` — Total extent along X in meters.
/// - `depth` — Total extent along Z in meters.
pub fn quad_grid(cols: usize, rows: usize, width: f32, depth: f32) -> TriangleMesh {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let verts_x = cols + 1;
    let verts_z = rows + 1;
    let mut mesh = TriangleMesh::with_capacity(verts_x * verts_z, cols * rows * 2);

    for j in 0..verts_z {
        for i in 0..verts_x {
            let u = i as f32 / cols as f32;
            let v = j as f32 / rows as f32;
            mesh.pos_x.push(-width * 0.5 + u * width);
            mesh.pos_y.push(0.0);
            mesh.pos_z.push(-depth * 0.5 + v * depth);

            mesh.normal_x.push(0.0);
            mesh.normal_y.push(1.0);
            mesh.normal_z.push(0.0);

            mesh.uv_u.push(u);
            mesh.uv_v.push(v);
        }
    }

    for j in 0..rows {
        for i in 0..cols {
            let a = (j * verts_x + i) as u32;
            let b = a + 1;
            let c = a + verts_x as u32;
            let d = c + 1;
            // (a, c, b) and (b, c, d) wind counter-clockwise seen from +Y.
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    mesh
}

/// Generates a UV sphere centered at `center`, the usual stand-in for a head.
///
/// # Arguments
/// - `radius` — Sphere radius in meters.
/// - `stacks` — Number of horizontal slices (latitude divisions).
/// - `slices` — Number of vertical slices (longitude divisions).
pub fn uv_sphere(center: Vec3, radius: f32, stacks: usize, slices: usize) -> TriangleMesh {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let mut mesh = TriangleMesh::with_capacity((stacks + 1) * (slices + 1), stacks * slices * 2);

    for i in 0..=stacks {
        let phi = std::f32::consts::PI * i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=slices {
            let theta = std::f32::consts::TAU * j as f32 / slices as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let n = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
            let p = center + n * radius;

            mesh.pos_x.push(p.x);
            mesh.pos_y.push(p.y);
            mesh.pos_z.push(p.z);
            mesh.normal_x.push(n.x);
            mesh.normal_y.push(n.y);
            mesh.normal_z.push(n.z);
            mesh.uv_u.push(j as f32 / slices as f32);
            mesh.uv_v.push(i as f32 / stacks as f32);
        }
    }

    for i in 0..stacks {
        for j in 0..slices {
            let a = (i * (slices + 1) + j) as u32;
            let b = a + (slices + 1) as u32;

            // Skip degenerate triangles at poles
            if i != 0 {
                mesh.indices.extend_from_slice(&[a, a + 1, b]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b + 1, b]);
            }
        }
    }

    mesh
}
