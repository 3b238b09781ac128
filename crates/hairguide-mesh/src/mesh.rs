//! Core triangle mesh type with SoA (Structure of Arrays) layout.
//!
//! The SoA layout stores each coordinate channel contiguously:
//! - `pos_x: [x0, x1, x2, ...]`
//! - `pos_y: [y0, y1, y2, ...]`
//! - `pos_z: [z0, z1, z2, ...]`
//!
//! Normals and UVs are optional: their arrays are either empty or
//! vertex-count long.

use serde::{Deserialize, Serialize};
use hairguide_math::triangle::face_normal;
use hairguide_math::{Aabb, Vec3};
use hairguide_types::{HairError, HairResult, TriangleId};

/// A triangle mesh stored in Structure-of-Arrays layout.
///
/// The mesh is read-only to the solver. Whoever loads or replaces it
/// stamps a new [`version`](Self::version) so that BVH/distance-field
/// caches and curve root bindings can tell a stale mesh from the
/// current one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    // --- Vertex data (SoA) ---
    /// X coordinates of all vertices.
    pub pos_x: Vec<f32>,
    /// Y coordinates of all vertices.
    pub pos_y: Vec<f32>,
    /// Z coordinates of all vertices.
    pub pos_z: Vec<f32>,

    /// X components of vertex normals (empty when absent).
    #[serde(default)]
    pub normal_x: Vec<f32>,
    /// Y components of vertex normals.
    #[serde(default)]
    pub normal_y: Vec<f32>,
    /// Z components of vertex normals.
    #[serde(default)]
    pub normal_z: Vec<f32>,

    /// U texture coordinates (empty when absent).
    #[serde(default)]
    pub uv_u: Vec<f32>,
    /// V texture coordinates.
    #[serde(default)]
    pub uv_v: Vec<f32>,

    // --- Triangle data ---
    /// Triangle indices, stored flat: `[t0v0, t0v1, t0v2, t1v0, ...]`
    pub indices: Vec<u32>,

    /// Monotonic version stamp. Not persisted.
    #[serde(skip)]
    pub version: u64,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when there is nothing to collide with or bind to.
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.triangle_count() == 0
    }

    /// Returns the position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Iterates over all vertex positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.vertex_count()).map(|i| self.position(i))
    }

    /// True when per-vertex normals are present.
    pub fn has_normals(&self) -> bool {
        let n = self.vertex_count();
        n > 0 && self.normal_x.len() == n && self.normal_y.len() == n && self.normal_z.len() == n
    }

    /// Returns the normal of vertex `i`, if normals are present.
    #[inline]
    pub fn normal(&self, i: usize) -> Option<Vec3> {
        if !self.has_normals() || i >= self.vertex_count() {
            return None;
        }
        Some(Vec3::new(self.normal_x[i], self.normal_y[i], self.normal_z[i]))
    }

    /// Returns the three vertex indices of triangle `t`.
    ///
    /// Panics when `t` is out of range; use [`triangle_vertices`](Self::triangle_vertices)
    /// for untrusted indices.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Vertex indices of triangle `t`, or `None` if the triangle or any of
    /// its vertex references is out of range.
    pub fn triangle_vertices(&self, t: TriangleId) -> Option<[usize; 3]> {
        let t = t.index();
        if t >= self.triangle_count() {
            return None;
        }
        let n = self.vertex_count();
        let [a, b, c] = self.triangle(t).map(|i| i as usize);
        (a < n && b < n && c < n).then_some([a, b, c])
    }

    /// Corner positions of triangle `t`, checked like [`triangle_vertices`](Self::triangle_vertices).
    pub fn triangle_corners(&self, t: TriangleId) -> Option<[Vec3; 3]> {
        self.triangle_vertices(t).map(|v| v.map(|i| self.position(i)))
    }

    /// Unit face normal of triangle `t`.
    pub fn face_normal(&self, t: TriangleId) -> Option<Vec3> {
        let [a, b, c] = self.triangle_corners(t)?;
        Some(face_normal(a, b, c))
    }

    /// Point on triangle `t` at barycentric weights `bary`.
    pub fn evaluate_barycentric(&self, t: TriangleId, bary: Vec3) -> Option<Vec3> {
        let [a, b, c] = self.triangle_corners(t)?;
        Some(a * bary.x + b * bary.y + c * bary.z)
    }

    /// Surface normal at barycentric weights `bary`: interpolated vertex
    /// normals when present and non-degenerate, else the face normal.
    pub fn interpolated_normal(&self, t: TriangleId, bary: Vec3) -> Option<Vec3> {
        let [ia, ib, ic] = self.triangle_vertices(t)?;
        if let (Some(na), Some(nb), Some(nc)) = (self.normal(ia), self.normal(ib), self.normal(ic)) {
            let n = (na * bary.x + nb * bary.y + nc * bary.z).normalize_or_zero();
            if n != Vec3::ZERO && n.is_finite() {
                return Some(n);
            }
        }
        self.face_normal(t)
    }

    /// Axis-aligned bounds of all vertices.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions())
    }

    /// Sets the position of vertex `i`.
    #[inline]
    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.pos_x[i] = p.x;
        self.pos_y[i] = p.y;
        self.pos_z[i] = p.z;
    }

    /// Returns a copy with every position multiplied by `factor`
    /// (e.g. `0.01` for centimetre sources). Normals are unchanged.
    pub fn scaled(mut self, factor: f32) -> Self {
        for v in self
            .pos_x
            .iter_mut()
            .chain(self.pos_y.iter_mut())
            .chain(self.pos_z.iter_mut())
        {
            *v *= factor;
        }
        self
    }

    /// Returns the mesh stamped with `version`.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(vertex_capacity),
            pos_y: Vec::with_capacity(vertex_capacity),
            pos_z: Vec::with_capacity(vertex_capacity),
            normal_x: Vec::with_capacity(vertex_capacity),
            normal_y: Vec::with_capacity(vertex_capacity),
            normal_z: Vec::with_capacity(vertex_capacity),
            uv_u: Vec::with_capacity(vertex_capacity),
            uv_v: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
            version: 0,
        }
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - Position arrays have the same length
    /// - Normal/UV arrays are empty or vertex-count long
    /// - Triangle indices are within bounds
    /// - No non-finite positions
    pub fn validate(&self) -> HairResult<()> {
        let n = self.pos_x.len();

        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(HairError::InvalidMesh(
                "Position arrays have inconsistent lengths".into(),
            ));
        }
        let optional_ok = |len: usize| len == 0 || len == n;
        if !(optional_ok(self.normal_x.len())
            && self.normal_x.len() == self.normal_y.len()
            && self.normal_x.len() == self.normal_z.len())
        {
            return Err(HairError::InvalidMesh(
                "Normal arrays have inconsistent lengths".into(),
            ));
        }
        if !(optional_ok(self.uv_u.len()) && self.uv_u.len() == self.uv_v.len()) {
            return Err(HairError::InvalidMesh(
                "UV arrays have inconsistent lengths".into(),
            ));
        }

        if self.indices.len() % 3 != 0 {
            return Err(HairError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(HairError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        if let Some(i) = (0..n).find(|&i| !self.position(i).is_finite()) {
            return Err(HairError::InvalidMesh(format!(
                "Vertex {} has a non-finite position",
                i
            )));
        }

        Ok(())
    }

    /// Builds a mesh from vertex positions and flat triangle indices.
    pub fn from_positions(positions: &[Vec3], indices: &[u32]) -> HairResult<Self> {
        let mut mesh = Self::with_capacity(positions.len(), indices.len() / 3);
        for p in positions {
            mesh.pos_x.push(p.x);
            mesh.pos_y.push(p.y);
            mesh.pos_z.push(p.z);
        }
        mesh.indices = indices.to_vec();
        mesh.validate()?;
        Ok(mesh)
    }

    /// Constructs a mesh from interleaved position data
    /// `[x0, y0, z0, x1, y1, z1, ...]`, the layout importers hand over.
    /// UVs are kept when `uvs` holds two floats per vertex.
    pub fn from_interleaved(positions: &[f32], indices: &[u32], uvs: &[f32]) -> HairResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(HairError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mut mesh = Self::with_capacity(n, indices.len() / 3);
        for p in positions.chunks_exact(3) {
            mesh.pos_x.push(p[0]);
            mesh.pos_y.push(p[1]);
            mesh.pos_z.push(p[2]);
        }
        if uvs.len() == n * 2 {
            for uv in uvs.chunks_exact(2) {
                mesh.uv_u.push(uv[0]);
                mesh.uv_v.push(uv[1]);
            }
        }
        mesh.indices = indices.to_vec();

        mesh.validate()?;
        Ok(mesh)
    }
}
