//! Nearest-surface records baked onto a voxel grid.
//!
//! The grid is cubic: `resolution` samples per axis over the padded mesh
//! bounds, spaced by the longest padded extent. Each sample stores the
//! closest surface point and that triangle's normal. Samples with no
//! surface in reach store themselves and `+Y`.
//!
//! The CPU solver queries the BVH directly; the field is baked only for
//! device backends that report `uses_distance_field`.

use tracing::debug;
use hairguide_math::Vec3;
use hairguide_mesh::TriangleMesh;
use hairguide_types::constants::{MAX_FIELD_RESOLUTION, MIN_FIELD_RESOLUTION};

use crate::bvh::MeshBvh;

/// One voxel's record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    /// Closest surface point to the voxel centre.
    pub closest_point: Vec3,
    /// Face normal of the triangle holding `closest_point`.
    pub normal: Vec3,
}

/// Cubic grid of nearest-surface records over a mesh's padded bounds.
#[derive(Debug, Clone)]
pub struct MeshDistanceField {
    resolution: usize,
    voxel_size: f32,
    origin: Vec3,
    mesh_version: u64,
    samples: Vec<FieldSample>,
}

impl MeshDistanceField {
    /// Bakes the field for `mesh` using its BVH.
    ///
    /// `resolution` is clamped to the supported range and negative padding
    /// is treated as zero. Returns `None` for an empty or flat-to-a-point
    /// mesh.
    pub fn build(mesh: &TriangleMesh, bvh: &MeshBvh, resolution: usize, padding: f32) -> Option<Self> {
        if mesh.is_empty() || bvh.is_empty() {
            return None;
        }
        let resolution = resolution.clamp(MIN_FIELD_RESOLUTION, MAX_FIELD_RESOLUTION);
        let padding = padding.max(0.0);
        let bounds = mesh.bounds().padded(padding);
        let max_axis = bounds.extent().max_element();
        if max_axis.is_nan() || max_axis < 1.0e-6 {
            return None;
        }
        let voxel_size = max_axis / (resolution - 1) as f32;
        let origin = bounds.min;

        let mut samples = Vec::with_capacity(resolution * resolution * resolution);
        for z in 0..resolution {
            for y in 0..resolution {
                for x in 0..resolution {
                    let p = origin + Vec3::new(x as f32, y as f32, z as f32) * voxel_size;
                    let sample = match bvh.nearest_triangle(p, f32::INFINITY) {
                        Some(hit) => FieldSample {
                            closest_point: hit.closest_point,
                            normal: hit.normal,
                        },
                        None => FieldSample {
                            closest_point: p,
                            normal: Vec3::Y,
                        },
                    };
                    samples.push(sample);
                }
            }
        }
        debug!(resolution, voxel_size, mesh_version = mesh.version, "distance field built");

        Some(Self {
            resolution,
            voxel_size,
            origin,
            mesh_version: mesh.version,
            samples,
        })
    }

    /// Samples per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Spacing between samples (m).
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// World position of voxel (0, 0, 0).
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Version of the mesh the field was baked from.
    pub fn mesh_version(&self) -> u64 {
        self.mesh_version
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.resolution * (y + self.resolution * z)
    }

    /// Record of voxel `(x, y, z)`.
    pub fn voxel(&self, x: usize, y: usize, z: usize) -> Option<&FieldSample> {
        if x >= self.resolution || y >= self.resolution || z >= self.resolution {
            return None;
        }
        self.samples.get(self.index(x, y, z))
    }

    /// Record of the voxel nearest `p`, clamped to the grid.
    pub fn sample(&self, p: Vec3) -> Option<FieldSample> {
        if !p.is_finite() {
            return None;
        }
        let max = (self.resolution - 1) as f32;
        let g = ((p - self.origin) / self.voxel_size).round().clamp(Vec3::ZERO, Vec3::splat(max));
        self.voxel(g.x as usize, g.y as usize, g.z as usize).copied()
    }
}
