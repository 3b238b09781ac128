//! Ray-parity inside/outside classification.

use hairguide_math::triangle::ray_triangle;
use hairguide_math::Vec3;
use hairguide_types::constants::INSIDE_RAY_OFFSET;

use crate::bvh::MeshBvh;

/// Number of triangles crossed by the ray from `origin` along `direction`.
pub fn count_crossings(bvh: &MeshBvh, origin: Vec3, direction: Vec3) -> usize {
    let mut count = 0;
    bvh.raycast(origin, direction, |_, [a, b, c]| {
        if ray_triangle(origin, direction, *a, *b, *c).is_some() {
            count += 1;
        }
    });
    count
}

/// Odd-even rule along `+X`, starting a hair in front of `p`.
///
/// Only meaningful for closed, non-self-intersecting surfaces. A ray that
/// grazes an edge shared by two triangles may count both.
pub fn is_inside(bvh: &MeshBvh, p: Vec3) -> bool {
    let origin = p + Vec3::new(INSIDE_RAY_OFFSET, 0.0, 0.0);
    count_crossings(bvh, origin, Vec3::X) % 2 == 1
}
