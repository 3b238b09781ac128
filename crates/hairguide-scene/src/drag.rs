//! Dragging control points on a view-facing plane.

use tracing::{debug, warn};
use hairguide_math::{Ray, Vec3};
use hairguide_solver::DragPin;
use hairguide_types::constants::PICK_POINT_THRESHOLD;

use crate::scene::Scene;

/// Plane the dragged vertex slides on: through the vertex as it was
/// grabbed, facing the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPlane {
    /// Vertex position when the drag began.
    pub point: Vec3,
    /// Unit plane normal, towards the camera.
    pub normal: Vec3,
}

impl DragPlane {
    /// Where `ray` meets the plane.
    pub fn target(&self, ray: &Ray) -> Option<Vec3> {
        ray.intersect_plane(self.point, self.normal)
    }
}

/// Reflection across the YZ plane.
pub(crate) fn mirror_x(p: Vec3) -> Vec3 {
    Vec3::new(-p.x, p.y, p.z)
}

impl Scene {
    /// Grabs the control point nearest to `ray`.
    ///
    /// Selected curves are searched first, then every visible curve. The
    /// grabbed curve joins the selection and becomes active. Any previous
    /// drag is released first.
    pub fn begin_drag(&mut self, ray: &Ray, view_forward: Vec3) -> Option<DragPin> {
        self.end_drag();
        if !ray.is_valid() {
            warn!(?ray, "ignoring drag with an invalid ray");
            return None;
        }

        let pick = self
            .guides
            .pick_control_point(ray, PICK_POINT_THRESHOLD, true)
            .or_else(|| self.guides.pick_control_point(ray, PICK_POINT_THRESHOLD, false))?;
        let point = self.guides.curve(pick.curve)?.points.get(pick.vertex).copied()?;

        self.guides.select_curve(pick.curve, true);
        self.interaction.mirror.prune_to_selection(self.guides.selection());

        let normal = if view_forward.is_finite() && view_forward.length_squared() > 1.0e-12 {
            view_forward.normalize()
        } else {
            -ray.direction
        };
        let pin = DragPin {
            curve: pick.curve,
            vertex: pick.vertex,
        };
        self.drag_plane = Some(DragPlane { point, normal });
        self.interaction.drag = Some(pin);
        debug!(curve = pin.curve, vertex = pin.vertex, "drag started");
        Some(pin)
    }

    /// Moves the held vertex toward where `ray` meets the drag plane.
    ///
    /// Each update covers `drag_smoothing` of the remaining distance. In
    /// mirror mode the linked twin's matching vertex follows, reflected.
    /// Returns false when nothing moved.
    pub fn update_drag(&mut self, ray: &Ray) -> bool {
        let (Some(pin), Some(plane)) = (self.interaction.drag, self.drag_plane) else {
            return false;
        };
        if !ray.is_valid() {
            warn!(?ray, "ignoring drag update with an invalid ray");
            return false;
        }
        let Some(target) = plane.target(ray) else {
            return false;
        };
        let Some(current) = self
            .guides
            .curve(pin.curve)
            .and_then(|c| c.points.get(pin.vertex).copied())
        else {
            self.end_drag();
            return false;
        };

        let alpha = self.settings.clamped_drag_smoothing();
        let p = current.lerp(target, alpha);
        if !self.guides.move_control_point(pin.curve, pin.vertex, p) {
            return false;
        }

        if self.settings.mirror_mode {
            if let Some(peer) = self.interaction.mirror.peer(pin.curve) {
                if !self.guides.move_control_point(peer, pin.vertex, mirror_x(p)) {
                    warn!(curve = pin.curve, peer, vertex = pin.vertex, "mirror twin has no matching vertex");
                }
            }
        }
        true
    }

    /// Releases the held vertex.
    pub fn end_drag(&mut self) {
        if let Some(pin) = self.interaction.drag.take() {
            debug!(curve = pin.curve, vertex = pin.vertex, "drag ended");
        }
        self.drag_plane = None;
    }

    /// The active drag pin, if any.
    pub fn drag(&self) -> Option<DragPin> {
        self.interaction.drag
    }

    /// Plane of the active drag, if any.
    pub fn drag_plane(&self) -> Option<DragPlane> {
        self.drag_plane
    }
}
