//! Position-level kernels shared by the CPU solver.
//!
//! Weights are inverse masses: 1 for free points, 0 for pinned ones.

use hairguide_math::Vec3;

/// Moves `p0`/`p1` toward distance `rest`.
///
/// The correction is split by weight and scaled by `stiffness`; it is not
/// limited, so a stiffness of 1 restores the rest length in one call.
#[inline]
pub fn solve_distance(p0: &mut Vec3, p1: &mut Vec3, rest: f32, w0: f32, w1: f32, stiffness: f32) {
    let d = *p1 - *p0;
    let len = d.length();
    if len < 1.0e-8 {
        return;
    }
    let w_sum = w0 + w1;
    if w_sum <= 0.0 {
        return;
    }
    let n = d / len;
    let corr = n * ((len - rest) / w_sum) * stiffness.clamp(0.0, 1.0);
    *p0 += corr * w0;
    *p1 -= corr * w1;
}

/// Distance constraint between `points[i]` and `points[j]` (`i < j`).
#[inline]
pub fn solve_pair(points: &mut [Vec3], i: usize, j: usize, rest: f32, wi: f32, wj: f32, stiffness: f32) {
    debug_assert!(i < j);
    let (head, tail) = points.split_at_mut(j);
    solve_distance(&mut head[i], &mut tail[0], rest, wi, wj, stiffness);
}

/// Damped Verlet step of every point except the root and `pinned`:
/// `x' = x + (x - prev) * damping + gravity * dt²`.
pub fn integrate(points: &mut [Vec3], prev: &mut [Vec3], dt: f32, gravity: Vec3, damping: f32, pinned: Option<usize>) {
    let acc = gravity * (dt * dt);
    for (i, (p, q)) in points.iter_mut().zip(prev.iter_mut()).enumerate() {
        if i == 0 || Some(i) == pinned {
            continue;
        }
        let x = *p;
        let v = (x - *q) * damping;
        *q = x;
        *p = x + v + acc;
    }
}

/// Zeroes implied velocities that are non-finite or longer than
/// `max_displacement`. Returns how many were zeroed.
pub fn clamp_velocities(points: &[Vec3], prev: &mut [Vec3], max_displacement: f32) -> u32 {
    let mut clamped = 0;
    for (p, q) in points.iter().zip(prev.iter_mut()) {
        let dp = *p - *q;
        if !dp.is_finite() || dp.length() > max_displacement {
            *q = *p;
            clamped += 1;
        }
    }
    clamped
}

/// Weight of vertex `i` in a chain whose root and `pinned` vertex are fixed.
#[inline]
pub fn chain_weight(i: usize, pinned: Option<usize>) -> f32 {
    if i == 0 || Some(i) == pinned {
        0.0
    } else {
        1.0
    }
}

/// One stretch pass (full stiffness) followed by one bend pass over
/// second neighbours at `2 * rest`.
pub fn relax_chain(points: &mut [Vec3], rest: f32, bend_stiffness: f32, pinned: Option<usize>) {
    for i in 0..points.len().saturating_sub(1) {
        let (w0, w1) = (chain_weight(i, pinned), chain_weight(i + 1, pinned));
        solve_pair(points, i, i + 1, rest, w0, w1, 1.0);
    }
    if bend_stiffness > 0.0 {
        for i in 0..points.len().saturating_sub(2) {
            let (w0, w2) = (chain_weight(i, pinned), chain_weight(i + 2, pinned));
            solve_pair(points, i, i + 2, rest * 2.0, w0, w2, bend_stiffness);
        }
    }
}
