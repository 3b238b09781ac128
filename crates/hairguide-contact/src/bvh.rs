//! Bounding volume hierarchy over mesh triangles.
//!
//! Built once per mesh version by recursive median split on the longest
//! axis of each node's bounds. Queries walk the tree iteratively with an
//! explicit stack.

use tracing::debug;
use hairguide_math::triangle::{closest_point_on_triangle, face_normal};
use hairguide_math::{Aabb, Vec3};
use hairguide_mesh::TriangleMesh;
use hairguide_types::constants::BVH_LEAF_SIZE;
use hairguide_types::TriangleId;

/// Result of a nearest-triangle query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    /// The closest triangle.
    pub triangle: TriangleId,
    /// Closest point on that triangle.
    pub closest_point: Vec3,
    /// Barycentric weights of `closest_point` on the triangle.
    pub bary: Vec3,
    /// Unit face normal of the triangle.
    pub normal: Vec3,
    /// Distance from the query point to `closest_point`.
    pub distance: f32,
}

#[derive(Debug, Clone)]
struct BvhNode {
    bounds: Aabb,
    /// Child node indices; only meaningful when `count == 0`.
    left: u32,
    right: u32,
    /// Range into `order` for leaves.
    first: u32,
    count: u32,
}

impl BvhNode {
    #[inline]
    fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

/// Triangle BVH snapshot of one mesh version.
///
/// The tree keeps its own copy of the triangle corners, so it can be
/// queried without borrowing the mesh it was built from.
#[derive(Debug, Clone, Default)]
pub struct MeshBvh {
    nodes: Vec<BvhNode>,
    /// Triangle indices, permuted so each leaf owns a contiguous range.
    order: Vec<u32>,
    corners: Vec<[Vec3; 3]>,
    normals: Vec<Vec3>,
    mesh_version: u64,
}

impl MeshBvh {
    /// Builds the hierarchy. Triangles with out-of-range indices are left
    /// out; an empty mesh yields an empty tree whose queries all miss.
    pub fn build(mesh: &TriangleMesh) -> Self {
        let mut corners = Vec::with_capacity(mesh.triangle_count());
        let mut ids = Vec::with_capacity(mesh.triangle_count());
        for t in 0..mesh.triangle_count() {
            if let Some(c) = mesh.triangle_corners(TriangleId(t as u32)) {
                corners.push(c);
                ids.push(t as u32);
            } else {
                corners.push([Vec3::ZERO; 3]);
            }
        }
        let normals = corners.iter().map(|[a, b, c]| face_normal(*a, *b, *c)).collect();

        let mut bvh = Self {
            nodes: Vec::new(),
            order: ids,
            corners,
            normals,
            mesh_version: mesh.version,
        };
        if !bvh.order.is_empty() {
            let centroids: Vec<Vec3> = bvh
                .corners
                .iter()
                .map(|[a, b, c]| (*a + *b + *c) / 3.0)
                .collect();
            bvh.nodes.reserve(2 * bvh.order.len() / BVH_LEAF_SIZE + 1);
            let count = bvh.order.len();
            bvh.build_node(&centroids, 0, count);
        }
        debug!(
            triangles = bvh.order.len(),
            nodes = bvh.nodes.len(),
            mesh_version = mesh.version,
            "mesh BVH built"
        );
        bvh
    }

    fn build_node(&mut self, centroids: &[Vec3], first: usize, count: usize) -> u32 {
        let range = first..first + count;
        let mut bounds = Aabb::EMPTY;
        for &t in &self.order[range.clone()] {
            for &p in &self.corners[t as usize] {
                bounds.grow(p);
            }
        }

        let index = self.nodes.len() as u32;
        self.nodes.push(BvhNode {
            bounds,
            left: 0,
            right: 0,
            first: first as u32,
            count: count as u32,
        });
        if count <= BVH_LEAF_SIZE {
            return index;
        }

        let axis = bounds.longest_axis();
        let mid = count / 2;
        self.order[range].select_nth_unstable_by(mid, |&a, &b| {
            centroids[a as usize][axis].total_cmp(&centroids[b as usize][axis])
        });

        let left = self.build_node(centroids, first, mid);
        let right = self.build_node(centroids, first + mid, count - mid);
        let node = &mut self.nodes[index as usize];
        node.left = left;
        node.right = right;
        node.count = 0;
        index
    }

    /// True when the tree holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of indexed triangles.
    pub fn triangle_count(&self) -> usize {
        self.order.len()
    }

    /// Number of tree nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Version of the mesh this tree was built from.
    pub fn mesh_version(&self) -> u64 {
        self.mesh_version
    }

    /// Bounds of the whole tree.
    pub fn bounds(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, |n| n.bounds)
    }

    /// Corners of a triangle as captured at build time.
    pub fn corners(&self, triangle: TriangleId) -> Option<&[Vec3; 3]> {
        self.corners.get(triangle.index())
    }

    /// Unit face normal of a triangle as captured at build time.
    pub fn face_normal(&self, triangle: TriangleId) -> Option<Vec3> {
        self.normals.get(triangle.index()).copied()
    }

    /// Calls `visitor` for every triangle in a leaf whose bounds the ray
    /// crosses in front of its origin. Candidates only: the visitor does
    /// the exact ray-triangle test.
    pub fn raycast<F>(&self, origin: Vec3, direction: Vec3, mut visitor: F)
    where
        F: FnMut(TriangleId, &[Vec3; 3]),
    {
        if self.nodes.is_empty() {
            return;
        }
        let mut stack: Vec<u32> = Vec::with_capacity(64);
        stack.push(0);
        while let Some(ni) = stack.pop() {
            let node = &self.nodes[ni as usize];
            if node.bounds.ray_interval(origin, direction).is_none() {
                continue;
            }
            if node.is_leaf() {
                let range = node.first as usize..(node.first + node.count) as usize;
                for &t in &self.order[range] {
                    visitor(TriangleId(t), &self.corners[t as usize]);
                }
            } else {
                stack.push(node.right);
                stack.push(node.left);
            }
        }
    }

    /// Closest point on any triangle within `max_distance` of `p`.
    ///
    /// Branch-and-bound: a subtree is entered only if its bounds could hold
    /// a point closer than the best found so far.
    pub fn nearest_triangle(&self, p: Vec3, max_distance: f32) -> Option<NearestHit> {
        if self.nodes.is_empty() || !p.is_finite() {
            return None;
        }
        let mut best_d2 = if max_distance.is_finite() {
            max_distance * max_distance
        } else {
            f32::INFINITY
        };
        let mut best: Option<(u32, Vec3, Vec3)> = None;

        let mut stack: Vec<u32> = Vec::with_capacity(64);
        stack.push(0);
        while let Some(ni) = stack.pop() {
            let node = &self.nodes[ni as usize];
            if node.bounds.distance_sq(p) > best_d2 {
                continue;
            }
            if node.is_leaf() {
                let range = node.first as usize..(node.first + node.count) as usize;
                for &t in &self.order[range] {
                    let [a, b, c] = self.corners[t as usize];
                    let cp = closest_point_on_triangle(p, a, b, c);
                    let d2 = cp.point.distance_squared(p);
                    if d2 <= best_d2 {
                        best_d2 = d2;
                        best = Some((t, cp.point, cp.bary));
                    }
                }
            } else {
                // Pop the nearer child first so the bound tightens early.
                let l = &self.nodes[node.left as usize];
                let r = &self.nodes[node.right as usize];
                if l.bounds.distance_sq(p) <= r.bounds.distance_sq(p) {
                    stack.push(node.right);
                    stack.push(node.left);
                } else {
                    stack.push(node.left);
                    stack.push(node.right);
                }
            }
        }

        best.map(|(t, point, bary)| NearestHit {
            triangle: TriangleId(t),
            closest_point: point,
            bary,
            normal: self.normals[t as usize],
            distance: best_d2.sqrt(),
        })
    }
}
