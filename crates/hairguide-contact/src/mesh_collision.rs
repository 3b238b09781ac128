//! Point-vs-mesh pushout.
//!
//! Keeps curve points at least `thickness` from the surface. The push
//! direction is the point-to-surface vector, flipped when the ray-parity
//! test says the point is inside. After the push the implied velocity
//! loses its normal component and `friction` of its tangential one; the
//! response is written into the previous position.

use hairguide_math::Vec3;

use crate::bvh::MeshBvh;
use crate::inside::is_inside;
use crate::response::ContactResult;

/// Mesh collision parameters for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshCollider {
    /// Distance kept between points and the surface (m).
    pub thickness: f32,
    /// 0 keeps tangential motion (slide), 1 removes it (stick).
    pub friction: f32,
}

impl MeshCollider {
    /// Creates a collider; thickness is kept positive and friction in `[0, 1]`.
    pub fn new(thickness: f32, friction: f32) -> Self {
        Self {
            thickness: thickness.max(1.0e-6),
            friction: friction.clamp(0.0, 1.0),
        }
    }

    /// Resolves a single point. Returns the correction depth if it moved.
    pub fn resolve_point(&self, bvh: &MeshBvh, point: &mut Vec3, prev: &mut Vec3) -> Option<f32> {
        let hit = bvh.nearest_triangle(*point, self.thickness * 2.0)?;
        let d = *point - hit.closest_point;
        let dist = d.length();
        if dist >= self.thickness {
            return None;
        }

        let push_dir = if dist >= 1.0e-8 {
            let out = d / dist;
            if is_inside(bvh, *point) {
                -out
            } else {
                out
            }
        } else {
            hit.normal
        };
        let depth = self.thickness - dist;
        *point += push_dir * depth;

        let n = push_dir.normalize_or_zero();
        let v = *point - *prev;
        let v_normal = n * v.dot(n);
        let v_tangent = v - v_normal;
        *prev = *point - v_tangent * (1.0 - self.friction);
        Some(depth)
    }

    /// Resolves every point of a curve except the root.
    pub fn resolve_curve(&self, bvh: &MeshBvh, points: &mut [Vec3], prev: &mut [Vec3]) -> ContactResult {
        let mut result = ContactResult::default();
        if bvh.is_empty() {
            return result;
        }
        for (p, q) in points.iter_mut().zip(prev.iter_mut()).skip(1) {
            if let Some(depth) = self.resolve_point(bvh, p, q) {
                result.record(depth);
            }
        }
        result
    }
}
