//! World-space rays and the distance queries used for picking.

use glam::Vec3;

/// A half-line `origin + t * direction`, `t >= 0`, with unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction, or zero for a degenerate ray.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray; `direction` is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// False for zero or non-finite rays, which every query treats as a miss.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite() && self.direction != Vec3::ZERO
    }

    /// Point at parameter `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance from `p` to the ray, and the ray parameter of the closest point.
    pub fn distance_to_point(&self, p: Vec3) -> (f32, f32) {
        let t = (p - self.origin).dot(self.direction).max(0.0);
        (self.at(t).distance(p), t)
    }

    /// Distance between the ray and segment `[a, b]`, and the ray parameter
    /// of the closest approach.
    pub fn distance_to_segment(&self, a: Vec3, b: Vec3) -> (f32, f32) {
        let d1 = self.direction;
        let d2 = b - a;
        let r = self.origin - a;
        let dd1 = d1.dot(d1);
        let dd2 = d2.dot(d2);
        if dd2 <= 1.0e-12 || dd1 <= 1.0e-12 {
            return self.distance_to_point(a);
        }

        let f = d2.dot(r);
        let c = d1.dot(r);
        let b12 = d1.dot(d2);
        let denom = dd1 * dd2 - b12 * b12;

        let mut s = if denom > 1.0e-12 {
            ((b12 * f - c * dd2) / denom).max(0.0)
        } else {
            0.0
        };
        let mut t = (b12 * s + f) / dd2;
        if t < 0.0 {
            t = 0.0;
            s = (-c / dd1).max(0.0);
        } else if t > 1.0 {
            t = 1.0;
            s = ((b12 - c) / dd1).max(0.0);
        }

        let on_ray = self.origin + d1 * s;
        let on_seg = a + d2 * t;
        (on_ray.distance(on_seg), s)
    }

    /// Intersection with the plane through `point` with normal `normal`.
    /// `None` when parallel or behind the origin.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<Vec3> {
        let denom = normal.dot(self.direction);
        if denom.abs() < 1.0e-8 {
            return None;
        }
        let t = normal.dot(point - self.origin) / denom;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        Some(self.at(t))
    }
}
