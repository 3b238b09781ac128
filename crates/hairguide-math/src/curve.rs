//! Polyline helpers: Catmull-Rom presentation and arc-length resampling.

use glam::Vec3;

/// Uniform Catmull-Rom spline through `p1..p2`, `t` in `[0, 1]`.
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Samples a Catmull-Rom spline through every control point.
///
/// Produces `samples_per_segment` points per segment plus the final
/// control point. End tangents are formed by repeating the end points.
pub fn catmull_rom_polyline(points: &[Vec3], samples_per_segment: usize) -> Vec<Vec3> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let samples = samples_per_segment.max(1);
    let last = points.len() - 1;
    let mut out = Vec::with_capacity(last * samples + 1);
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        for s in 0..samples {
            let t = s as f32 / samples as f32;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    out.push(points[last]);
    out
}

/// Cumulative arc length at each point (`[0, |p1-p0|, ...]`).
pub fn cumulative_lengths(points: &[Vec3]) -> Vec<f32> {
    let mut cum = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += p.distance(points[i - 1]);
        }
        cum.push(total);
    }
    cum
}

/// Total polyline length.
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point at arc length `s` along the polyline, clamped to its ends.
fn point_at_arc_length(points: &[Vec3], cum: &[f32], s: f32) -> Vec3 {
    let Some(&first) = points.first() else {
        return Vec3::ZERO;
    };
    let total = cum.last().copied().unwrap_or(0.0);
    if s <= 0.0 || points.len() < 2 || total <= 1.0e-8 {
        return first;
    }
    if s >= total {
        return points[points.len() - 1];
    }
    let hi = cum.partition_point(|&c| c < s).clamp(1, points.len() - 1);
    let lo = hi - 1;
    let span = cum[hi] - cum[lo];
    let t = if span > 0.0 { (s - cum[lo]) / span } else { 0.0 };
    points[lo].lerp(points[hi], t.clamp(0.0, 1.0))
}

/// Resamples a polyline to `count` evenly spaced points spanning `length`.
///
/// The first point is kept exactly. Past the end of the source polyline
/// the curve is extended along its last segment direction (`+Y` when that
/// segment is degenerate). A degenerate source becomes a straight line.
pub fn resample_polyline(points: &[Vec3], length: f32, count: usize) -> Vec<Vec3> {
    let Some(&root) = points.first() else {
        return Vec::new();
    };
    let count = count.max(2);
    let cum = cumulative_lengths(points);
    let old_len = cum.last().copied().unwrap_or(0.0);

    let mut tail_dir = Vec3::Y;
    if points.len() >= 2 {
        let d = points[points.len() - 1] - points[points.len() - 2];
        let dl = d.length();
        if dl > 1.0e-6 {
            tail_dir = d / dl;
        }
    }
    let tail = points[points.len() - 1];

    let mut out = Vec::with_capacity(count);
    out.push(root);
    for i in 1..count {
        let s = length * i as f32 / (count - 1) as f32;
        let p = if old_len > 1.0e-6 {
            if s <= old_len {
                point_at_arc_length(points, &cum, s)
            } else {
                tail + tail_dir * (s - old_len)
            }
        } else {
            root + tail_dir * s
        };
        out.push(p);
    }
    out
}
