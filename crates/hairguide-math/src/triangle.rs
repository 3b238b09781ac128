//! Point-triangle and ray-triangle queries.

use glam::Vec3;
use hairguide_types::constants::RAY_T_MIN;

/// Closest point on a triangle together with its barycentric weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Closest point on the triangle.
    pub point: Vec3,
    /// Barycentric weights of `point`.
    pub bary: Vec3,
}

/// A ray-triangle crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayTriangleHit {
    /// Ray parameter of the crossing.
    pub t: f32,
    /// Barycentric weights of the crossing point (sum to 1).
    pub bary: Vec3,
}

/// Unnormalized face normal (length = twice the area).
#[inline]
pub fn face_normal_raw(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

/// Unit face normal, zero for degenerate triangles.
#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    face_normal_raw(a, b, c).normalize_or_zero()
}

/// Closest point on triangle `abc` to `p`.
///
/// Voronoi-region walk (Ericson, *Real-Time Collision Detection* 5.1.5):
/// vertex regions first, then edges, then the face interior.
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> ClosestPoint {
    let ab = b - a;
    let ac = c - a;

    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return ClosestPoint { point: a, bary: Vec3::X };
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return ClosestPoint { point: b, bary: Vec3::Y };
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return ClosestPoint {
            point: a + ab * v,
            bary: Vec3::new(1.0 - v, v, 0.0),
        };
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return ClosestPoint { point: c, bary: Vec3::Z };
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return ClosestPoint {
            point: a + ac * w,
            bary: Vec3::new(1.0 - w, 0.0, w),
        };
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return ClosestPoint {
            point: b + (c - b) * w,
            bary: Vec3::new(0.0, 1.0 - w, w),
        };
    }

    let sum = va + vb + vc;
    if sum.abs() < 1.0e-20 {
        // Collapsed triangle that slipped past the region tests.
        return ClosestPoint { point: a, bary: Vec3::X };
    }
    let denom = 1.0 / sum;
    let v = vb * denom;
    let w = vc * denom;
    ClosestPoint {
        point: a + ab * v + ac * w,
        bary: Vec3::new(1.0 - v - w, v, w),
    }
}

/// Möller–Trumbore ray-triangle intersection. Crossings at `t <= 1e-6`
/// are ignored so a ray starting on a surface does not hit it.
pub fn ray_triangle(origin: Vec3, direction: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<RayTriangleHit> {
    let e1 = b - a;
    let e2 = c - a;
    let p = direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1.0e-12 {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    if t <= RAY_T_MIN {
        return None;
    }

    Some(RayTriangleHit {
        t,
        bary: Vec3::new(1.0 - u - v, u, v),
    })
}

/// Clamps weights to be non-negative and renormalizes them to sum to 1.
/// Non-finite or all-zero input falls back to the first corner.
pub fn sanitize_barycentric(bary: Vec3) -> Vec3 {
    if !bary.is_finite() {
        return Vec3::X;
    }
    let clamped = bary.max(Vec3::ZERO);
    let sum = clamped.x + clamped.y + clamped.z;
    if sum <= 1.0e-8 {
        return Vec3::X;
    }
    clamped / sum
}
