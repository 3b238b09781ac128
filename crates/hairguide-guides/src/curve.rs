//! A single guide curve and its mesh root binding.

use thiserror::Error;
use hairguide_math::curve::{catmull_rom_polyline, polyline_length, resample_polyline};
use hairguide_math::triangle::sanitize_barycentric;
use hairguide_math::Vec3;
use hairguide_mesh::TriangleMesh;
use hairguide_types::{LayerId, TriangleId};

/// Anchors point 0 of a curve to a mesh triangle.
///
/// Only meaningful for the mesh version that was current when the
/// binding was made; evaluation against any other version fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootBinding {
    /// Mesh version the binding was made against.
    pub mesh_version: u64,
    /// Triangle holding the root.
    pub triangle: TriangleId,
    /// Clamped, renormalized barycentric weights.
    pub bary: Vec3,
}

/// Why a root binding can no longer be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BindingFault {
    /// The mesh was replaced since the binding was made.
    #[error("bound to mesh version {bound}, current is {current}")]
    StaleVersion { bound: u64, current: u64 },
    /// The triangle no longer exists on this mesh.
    #[error("triangle {triangle} or one of its vertices is out of range ({triangle_count} triangles)")]
    OutOfRange { triangle: u32, triangle_count: usize },
    /// The root evaluated to NaN or infinity.
    #[error("root evaluated to a non-finite position")]
    NonFinite,
}

impl RootBinding {
    /// Creates a binding with sanitized weights.
    pub fn new(mesh_version: u64, triangle: TriangleId, bary: Vec3) -> Self {
        Self {
            mesh_version,
            triangle,
            bary: sanitize_barycentric(bary),
        }
    }

    /// World position of the root on `mesh`.
    pub fn evaluate(&self, mesh: &TriangleMesh) -> Result<Vec3, BindingFault> {
        if self.mesh_version != mesh.version {
            return Err(BindingFault::StaleVersion {
                bound: self.mesh_version,
                current: mesh.version,
            });
        }
        let p = mesh
            .evaluate_barycentric(self.triangle, sanitize_barycentric(self.bary))
            .ok_or(BindingFault::OutOfRange {
                triangle: self.triangle.0,
                triangle_count: mesh.triangle_count(),
            })?;
        if !p.is_finite() {
            return Err(BindingFault::NonFinite);
        }
        Ok(p)
    }
}

/// A poly-line of control points simulated as a particle chain.
///
/// `points[0]` is the root. `prev_points` holds last step's positions;
/// velocity is `points[i] - prev_points[i]` and is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct HairCurve {
    /// Mesh anchor of the root, `None` when free-floating.
    pub root: Option<RootBinding>,
    /// Control points, root first.
    pub points: Vec<Vec3>,
    /// Positions from the previous step.
    pub prev_points: Vec<Vec3>,
    /// Target distance between consecutive points.
    pub segment_rest_len: f32,
    /// Layer the curve is drawn with.
    pub layer: LayerId,
    /// Per-curve visibility; the layer can still hide it.
    pub visible: bool,
}

impl HairCurve {
    /// A curve at rest through `points`, with an explicit rest length.
    pub fn from_points(points: Vec<Vec3>, segment_rest_len: f32) -> Self {
        Self {
            root: None,
            prev_points: points.clone(),
            points,
            segment_rest_len,
            layer: LayerId::DEFAULT,
            visible: true,
        }
    }

    /// A straight curve of `count` points from `root` along `direction`.
    pub fn straight(root: Vec3, direction: Vec3, count: usize, length: f32) -> Self {
        let count = count.max(2);
        let rest = length / (count - 1) as f32;
        let points = (0..count)
            .map(|i| root + direction * (length * i as f32 / (count - 1) as f32))
            .collect();
        Self::from_points(points, rest)
    }

    /// Number of control points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Last control point.
    pub fn tip(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    /// True while the root is anchored to the mesh.
    pub fn is_bound(&self) -> bool {
        self.root.is_some()
    }

    /// True when every point and previous point is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().chain(&self.prev_points).all(|p| p.is_finite())
    }

    /// Index of the first non-finite point, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.points.iter().position(|p| !p.is_finite())
    }

    /// Makes `prev_points` match `points` in length. Returns true if it had to.
    pub fn resync_prev(&mut self) -> bool {
        if self.prev_points.len() == self.points.len() {
            return false;
        }
        self.prev_points = self.points.clone();
        true
    }

    /// Zeroes every implied velocity.
    pub fn settle(&mut self) {
        self.prev_points.clone_from(&self.points);
    }

    /// Polyline length through the control points.
    pub fn length(&self) -> f32 {
        polyline_length(&self.points)
    }

    /// Mean distance between consecutive points (0 for fewer than 2).
    pub fn average_segment_length(&self) -> f32 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.length() / (self.points.len() - 1) as f32
    }

    /// Largest `|segment length - rest length|` along the curve.
    pub fn max_stretch_error(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| (w[0].distance(w[1]) - self.segment_rest_len).abs())
            .fold(0.0, f32::max)
    }

    /// Catmull-Rom presentation of the curve.
    pub fn smooth_points(&self, samples_per_segment: usize) -> Vec<Vec3> {
        catmull_rom_polyline(&self.points, samples_per_segment)
    }

    /// Arc-length resample to `length` over `count` points (already
    /// clamped by the caller). Keeps the root, zeroes velocity.
    pub fn resample(&mut self, length: f32, count: usize) {
        if self.points.len() < 2 {
            return;
        }
        let count = count.max(2);
        self.points = resample_polyline(&self.points, length, count);
        self.prev_points = self.points.clone();
        self.segment_rest_len = length / (count - 1) as f32;
    }
}
