//! Curve creation, selection and deletion driven by world-space rays.

use tracing::{debug, warn};
use hairguide_math::{Ray, Vec3};
use hairguide_mesh::TriangleMesh;
use hairguide_types::constants::{MIRROR_SNAP_DISTANCE, PICK_CURVE_THRESHOLD};
use hairguide_types::{HairResult, TriangleId};

use crate::drag::mirror_x;
use crate::scene::Scene;

/// Curves grown by one creation click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveCreation {
    /// Index of the new curve.
    pub curve: usize,
    /// X-mirrored twin, when mirror mode produced one.
    pub mirror: Option<usize>,
}

impl Scene {
    /// Grows a curve where `ray` hits the mesh and makes it the only
    /// selection.
    ///
    /// In mirror mode a twin is grown at the reflected hit (snapped to the
    /// nearest surface), selected alongside and linked. `Ok(None)` when
    /// there is no mesh, the ray misses, or a drag is in progress.
    pub fn create_curve_from_ray(&mut self, ray: &Ray) -> HairResult<Option<CurveCreation>> {
        if self.interaction.drag.is_some() {
            return Ok(None);
        }
        let Some(hit) = self.raycast(ray) else {
            return Ok(None);
        };

        let curve = self.add_curve(Some(hit.triangle), hit.bary, hit.position, hit.normal)?;
        self.guides.select_curve(curve, false);

        let mut mirror = None;
        if self.settings.mirror_mode {
            let reflected = mirror_x(hit.position);
            if reflected.distance(hit.position) < 1.0e-4 {
                debug!(curve, "hit lies on the mirror plane; no twin created");
            } else if let Some(twin_hit) = self.nearest_surface(reflected, MIRROR_SNAP_DISTANCE) {
                let twin = self.add_curve(
                    Some(twin_hit.triangle),
                    twin_hit.bary,
                    twin_hit.position,
                    twin_hit.normal,
                )?;
                self.guides.select_curve(twin, true);
                self.guides.set_active_curve(Some(curve));
                self.interaction.mirror.link(curve, twin);
                mirror = Some(twin);
            } else {
                warn!(curve, ?reflected, "no surface near the mirrored hit; twin not created");
            }
        }

        self.interaction.mirror.prune_to_selection(self.guides.selection());
        Ok(Some(CurveCreation { curve, mirror }))
    }

    /// Grows an unselected curve with default length and step count.
    ///
    /// The root binds to `triangle`/`bary` on the current mesh. Without a
    /// mesh the curve is created free at `root`.
    pub fn add_curve(
        &mut self,
        triangle: Option<TriangleId>,
        bary: Vec3,
        root: Vec3,
        normal: Vec3,
    ) -> HairResult<usize> {
        let empty;
        let (mesh, triangle) = match self.mesh.as_ref() {
            Some(mesh) => (mesh, triangle),
            None => {
                empty = TriangleMesh::default();
                (&empty, None)
            }
        };
        self.guides
            .add_curve_on_mesh(mesh, triangle, bary, root, normal, &self.settings)
    }

    /// Selects the curve passing closest to `ray`. Returns it, or `None`
    /// (selection unchanged) when no curve is near.
    pub fn select_curve_from_ray(&mut self, ray: &Ray, additive: bool) -> Option<usize> {
        let curve = self.guides.pick_curve(ray, PICK_CURVE_THRESHOLD)?;
        self.guides.select_curve(curve, additive);
        self.interaction.mirror.prune_to_selection(self.guides.selection());
        Some(curve)
    }

    /// Clears the selection and every mirror pair.
    pub fn deselect_all(&mut self) {
        self.guides.deselect_all();
        self.interaction.mirror.clear();
    }

    /// Deletes every selected curve. A drag on a deleted curve ends.
    /// Returns how many curves were removed.
    pub fn delete_selected_curves(&mut self) -> usize {
        let mut doomed = self.guides.selected_curves();
        if doomed.is_empty() {
            return 0;
        }
        doomed.sort_unstable_by(|a, b| b.cmp(a));

        self.interaction.apply_removals(&doomed);
        if self.interaction.drag.is_none() {
            self.drag_plane = None;
        }
        let removed = self.guides.remove_curves(&doomed);
        self.interaction.mirror.prune_to_selection(self.guides.selection());
        debug!(removed, "deleted selected curves");
        removed
    }

    /// Resamples the selected curves. Returns how many changed.
    pub fn apply_length_steps_to_selected(&mut self, length: f32, steps: usize) -> usize {
        let changed = self.guides.apply_length_steps_to_selected(length, steps);
        if changed > 0 {
            if let Some(pin) = self.interaction.drag {
                let out_of_range = self
                    .guides
                    .curve(pin.curve)
                    .map_or(true, |c| pin.vertex >= c.points.len());
                if out_of_range {
                    self.end_drag();
                }
            }
        }
        changed
    }
}
