//! Pairwise point repulsion between selected curves.
//!
//! Brute force over every pair of selected curves and every pair of their
//! non-root points. Interactive sessions keep few curves selected, so the
//! quadratic cost stays small.

use hairguide_guides::HairCurve;
use hairguide_math::Vec3;

use crate::response::ContactResult;

/// Curve-curve collision parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveCollision {
    /// Minimum separation between points of different curves.
    pub radius: f32,
}

impl CurveCollision {
    /// Creates a pass separating points closer than `thickness`.
    pub fn new(thickness: f32) -> Self {
        Self {
            radius: thickness.max(1.0e-5),
        }
    }

    /// Pushes overlapping points of different selected curves apart, each
    /// by half the penetration. `selected` is parallel to `curves`.
    pub fn resolve(&self, curves: &mut [HairCurve], selected: &[bool]) -> ContactResult {
        let mut result = ContactResult::default();
        let r = self.radius;
        let r2 = r * r;
        let n = curves.len().min(selected.len());
        if n < 2 {
            return result;
        }

        for a in 0..n {
            if !selected[a] {
                continue;
            }
            for b in (a + 1)..n {
                if !selected[b] {
                    continue;
                }
                let (head, tail) = curves.split_at_mut(b);
                let ca = &mut head[a].points;
                let cb = &mut tail[0].points;
                for pa in ca.iter_mut().skip(1) {
                    for pb in cb.iter_mut().skip(1) {
                        let d: Vec3 = *pb - *pa;
                        let d2 = d.length_squared();
                        if d2 < 1.0e-12 || d2 > r2 {
                            continue;
                        }
                        let dist = d2.sqrt();
                        let dir = d / dist;
                        let pen = r - dist;
                        *pa -= dir * (0.5 * pen);
                        *pb += dir * (0.5 * pen);
                        result.record(pen);
                    }
                }
            }
        }
        result
    }
}
