//! Integration tests for hairguide-math.

use hairguide_math::curve::{catmull_rom_polyline, cumulative_lengths, polyline_length, resample_polyline};
use hairguide_math::triangle::{closest_point_on_triangle, face_normal, ray_triangle, sanitize_barycentric};
use hairguide_math::{Aabb, Ray, Vec3};

fn tri() -> (Vec3, Vec3, Vec3) {
    (Vec3::ZERO, Vec3::X, Vec3::Y)
}

// ─── Aabb Tests ───────────────────────────────────────────────

#[test]
fn aabb_from_points_and_axis() {
    let b = Aabb::from_points([Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 0.5)]);
    assert_eq!(b.min, Vec3::ZERO);
    assert_eq!(b.max, Vec3::new(2.0, 1.0, 0.5));
    assert_eq!(b.longest_axis(), 0);
    assert_eq!(b.center(), Vec3::new(1.0, 0.5, 0.25));
}

#[test]
fn aabb_empty() {
    assert!(Aabb::EMPTY.is_empty());
    assert_eq!(Aabb::EMPTY.extent(), Vec3::ZERO);
}

#[test]
fn aabb_distance_sq() {
    let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
    assert_eq!(b.distance_sq(Vec3::splat(0.5)), 0.0);
    assert!((b.distance_sq(Vec3::new(3.0, 0.5, 0.5)) - 4.0).abs() < 1e-6);
    assert!((b.distance_sq(Vec3::new(2.0, 2.0, 0.5)) - 2.0).abs() < 1e-6);
}

#[test]
fn aabb_ray_interval() {
    let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let (t0, t1) = b.ray_interval(Vec3::new(-5.0, 0.0, 0.0), Vec3::X).unwrap();
    assert!((t0 - 4.0).abs() < 1e-6);
    assert!((t1 - 6.0).abs() < 1e-6);

    // Box behind the origin.
    assert!(b.ray_interval(Vec3::new(5.0, 0.0, 0.0), Vec3::X).is_none());
    // Parallel miss.
    assert!(b.ray_interval(Vec3::new(-5.0, 2.0, 0.0), Vec3::X).is_none());
    // Origin inside.
    let (t0, _) = b.ray_interval(Vec3::ZERO, Vec3::Y).unwrap();
    assert!(t0 < 0.0);
}

// ─── Ray Tests ────────────────────────────────────────────────

#[test]
fn ray_normalizes_direction() {
    let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
    assert_eq!(r.direction, Vec3::new(0.0, 0.0, -1.0));
    assert!(r.is_valid());
    assert!(!Ray::new(Vec3::ZERO, Vec3::ZERO).is_valid());
}

#[test]
fn ray_point_distance() {
    let r = Ray::new(Vec3::ZERO, Vec3::X);
    let (d, t) = r.distance_to_point(Vec3::new(2.0, 1.0, 0.0));
    assert!((d - 1.0).abs() < 1e-6);
    assert!((t - 2.0).abs() < 1e-6);

    // Points behind the origin measure to the origin.
    let (d, t) = r.distance_to_point(Vec3::new(-3.0, 0.0, 0.0));
    assert!((d - 3.0).abs() < 1e-6);
    assert_eq!(t, 0.0);
}

#[test]
fn ray_segment_distance() {
    let r = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
    // Segment crossing under the ray at height 0.
    let (d, t) = r.distance_to_segment(Vec3::new(-1.0, 0.5, 0.0), Vec3::new(1.0, 0.5, 0.0));
    assert!((d - 0.5).abs() < 1e-5);
    assert!((t - 5.0).abs() < 1e-5);

    // Segment whose closest approach is an endpoint.
    let (d, _) = r.distance_to_segment(Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0));
    assert!((d - 2.0).abs() < 1e-5);
}

#[test]
fn ray_plane() {
    let r = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
    let hit = r.intersect_plane(Vec3::ZERO, Vec3::Y).unwrap();
    assert!(hit.distance(Vec3::ZERO) < 1e-6);
    assert!(r.intersect_plane(Vec3::ZERO, Vec3::X).is_none());
}

// ─── Triangle Tests ───────────────────────────────────────────

#[test]
fn closest_point_interior() {
    let (a, b, c) = tri();
    let cp = closest_point_on_triangle(Vec3::new(0.25, 0.25, 1.0), a, b, c);
    assert!(cp.point.distance(Vec3::new(0.25, 0.25, 0.0)) < 1e-6);
    assert!((cp.bary.x + cp.bary.y + cp.bary.z - 1.0).abs() < 1e-6);
}

#[test]
fn closest_point_regions() {
    let (a, b, c) = tri();
    assert_eq!(closest_point_on_triangle(Vec3::new(-1.0, -1.0, 0.0), a, b, c).point, a);
    assert_eq!(closest_point_on_triangle(Vec3::new(2.0, -0.5, 0.0), a, b, c).point, b);
    assert_eq!(closest_point_on_triangle(Vec3::new(-0.5, 2.0, 0.0), a, b, c).point, c);

    let edge = closest_point_on_triangle(Vec3::new(0.5, -1.0, 0.3), a, b, c);
    assert!(edge.point.distance(Vec3::new(0.5, 0.0, 0.0)) < 1e-6);
    assert!(edge.bary.distance(Vec3::new(0.5, 0.5, 0.0)) < 1e-6);

    let hyp = closest_point_on_triangle(Vec3::new(1.0, 1.0, 0.0), a, b, c);
    assert!(hyp.point.distance(Vec3::new(0.5, 0.5, 0.0)) < 1e-6);
}

#[test]
fn ray_triangle_hit_and_miss() {
    let (a, b, c) = tri();
    let hit = ray_triangle(Vec3::new(0.2, 0.3, 2.0), Vec3::new(0.0, 0.0, -1.0), a, b, c).unwrap();
    assert!((hit.t - 2.0).abs() < 1e-6);
    assert!(hit.bary.distance(Vec3::new(0.5, 0.2, 0.3)) < 1e-6);

    assert!(ray_triangle(Vec3::new(0.8, 0.8, 2.0), Vec3::new(0.0, 0.0, -1.0), a, b, c).is_none());
    // Pointing away.
    assert!(ray_triangle(Vec3::new(0.2, 0.3, 2.0), Vec3::Z, a, b, c).is_none());
}

#[test]
fn face_normal_is_ccw() {
    let (a, b, c) = tri();
    assert_eq!(face_normal(a, b, c), Vec3::Z);
    assert_eq!(face_normal(a, a, b), Vec3::ZERO);
}

#[test]
fn barycentric_sanitizing() {
    let s = sanitize_barycentric(Vec3::new(2.0, -1.0, 2.0));
    assert!(s.distance(Vec3::new(0.5, 0.0, 0.5)) < 1e-6);
    assert_eq!(sanitize_barycentric(Vec3::new(f32::NAN, 0.0, 0.0)), Vec3::X);
    assert_eq!(sanitize_barycentric(Vec3::new(-1.0, -2.0, 0.0)), Vec3::X);
}

// ─── Curve Tests ──────────────────────────────────────────────

#[test]
fn catmull_rom_passes_through_controls() {
    let pts = vec![Vec3::ZERO, Vec3::X, Vec3::new(2.0, 1.0, 0.0)];
    let smooth = catmull_rom_polyline(&pts, 8);
    assert_eq!(smooth.len(), 2 * 8 + 1);
    assert_eq!(smooth[0], pts[0]);
    assert!(smooth[8].distance(pts[1]) < 1e-6);
    assert_eq!(*smooth.last().unwrap(), pts[2]);
}

#[test]
fn cumulative_and_total_length() {
    let pts = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 2.0, 0.0)];
    assert_eq!(cumulative_lengths(&pts), vec![0.0, 1.0, 3.0]);
    assert!((polyline_length(&pts) - 3.0).abs() < 1e-6);
}

#[test]
fn resample_shorter_keeps_root() {
    let pts: Vec<Vec3> = (0..5).map(|i| Vec3::new(0.1, i as f32 * 0.25, 0.0)).collect();
    let out = resample_polyline(&pts, 0.5, 3);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], pts[0]);
    assert!(out[2].distance(Vec3::new(0.1, 0.5, 0.0)) < 1e-5);
}

#[test]
fn resample_longer_extends_along_tail() {
    let pts = vec![Vec3::ZERO, Vec3::X];
    let out = resample_polyline(&pts, 2.0, 5);
    assert_eq!(out.len(), 5);
    assert!(out[4].distance(Vec3::new(2.0, 0.0, 0.0)) < 1e-5);
    assert!(out[3].distance(Vec3::new(1.5, 0.0, 0.0)) < 1e-5);
}

#[test]
fn resample_degenerate_grows_up() {
    let pts = vec![Vec3::ONE, Vec3::ONE];
    let out = resample_polyline(&pts, 1.0, 3);
    assert!(out[2].distance(Vec3::new(1.0, 2.0, 1.0)) < 1e-5);
}
