//! The guide set: curves, selection, active curve and layers.
//!
//! Curves are addressed by position. Removing a curve shifts every
//! higher position down by one, and the selection bitset and active index
//! follow. Callers removing several curves must pass positions in
//! strictly descending order.

use tracing::{debug, error, warn};
use hairguide_math::{Ray, Vec3};
use hairguide_mesh::TriangleMesh;
use hairguide_types::constants::{MAX_CURVE_STEPS, MIN_CURVE_LENGTH, MIN_CURVE_STEPS};
use hairguide_types::{HairError, HairResult, LayerId, TriangleId};

use crate::curve::{BindingFault, HairCurve, RootBinding};
use crate::layers::Layer;
use crate::settings::GuideSettings;

/// Result of a control-point pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPick {
    /// Index of the picked curve.
    pub curve: usize,
    /// Index of the picked control point.
    pub vertex: usize,
    /// Distance from the ray to the picked point.
    pub distance: f32,
}

/// Owns every guide curve plus the per-curve selection state.
#[derive(Debug, Clone)]
pub struct HairGuideSet {
    curves: Vec<HairCurve>,
    selected: Vec<bool>,
    active: Option<usize>,
    layers: Vec<Layer>,
}

impl HairGuideSet {
    /// An empty set holding only the default layer.
    pub fn new() -> Self {
        Self {
            curves: Vec::new(),
            selected: Vec::new(),
            active: None,
            layers: vec![Layer::default_layer()],
        }
    }

    /// Removes every curve. Layers are kept.
    pub fn clear(&mut self) {
        self.curves.clear();
        self.selected.clear();
        self.active = None;
    }

    /// Number of curves.
    #[inline]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// True when there are no curves.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Curve at `index`.
    pub fn curve(&self, index: usize) -> Option<&HairCurve> {
        self.curves.get(index)
    }

    /// Mutable curve at `index`.
    pub fn curve_mut(&mut self, index: usize) -> Option<&mut HairCurve> {
        self.curves.get_mut(index)
    }

    /// All curves, in index order.
    pub fn curves(&self) -> &[HairCurve] {
        &self.curves
    }

    /// Mutable access to the curves. The slice cannot change length, so
    /// selection bookkeeping stays valid.
    pub fn curves_mut(&mut self) -> &mut [HairCurve] {
        &mut self.curves
    }

    /// Appends an already built curve, unselected. Returns its position.
    pub fn push_curve(&mut self, curve: HairCurve) -> usize {
        self.curves.push(curve);
        self.selected.push(false);
        self.curves.len() - 1
    }

    /// Grows a new curve out of the mesh surface.
    ///
    /// `triangle`/`bary` locate the root; an out-of-range triangle is not
    /// stored (the curve spawns unbound at `hit_pos`). Points are laid out
    /// along `hit_normal` (`+Y` if it is zero) with zero velocity. Fails
    /// only when `hit_pos` or `hit_normal` is not finite.
    pub fn add_curve_on_mesh(
        &mut self,
        mesh: &TriangleMesh,
        triangle: Option<TriangleId>,
        bary: Vec3,
        hit_pos: Vec3,
        hit_normal: Vec3,
        settings: &GuideSettings,
    ) -> HairResult<usize> {
        if !hit_pos.is_finite() || !hit_normal.is_finite() {
            error!(?hit_pos, ?hit_normal, "refusing to create a curve from a non-finite hit");
            return Err(HairError::InvalidCurve(
                "hit position or normal is not finite".into(),
            ));
        }

        let binding = match triangle {
            Some(t) if mesh.triangle_vertices(t).is_some() => {
                Some(RootBinding::new(mesh.version, t, bary))
            }
            Some(t) => {
                warn!(
                    triangle = t.0,
                    triangle_count = mesh.triangle_count(),
                    "out-of-range root triangle; curve root will be unpinned"
                );
                None
            }
            None => None,
        };

        let normal_len = hit_normal.length();
        let dir = if normal_len < 1.0e-6 {
            warn!(normal_len, "degenerate hit normal; growing curve along +Y");
            Vec3::Y
        } else {
            hit_normal / normal_len
        };

        // Start from the mesh-evaluated root so the first re-pin does not jump.
        let root_pos = binding
            .and_then(|b| b.evaluate(mesh).ok())
            .unwrap_or(hit_pos);

        let mut curve = HairCurve::straight(
            root_pos,
            dir,
            settings.clamped_steps(),
            settings.clamped_length(),
        );
        curve.root = binding;
        let index = self.push_curve(curve);
        debug!(curve = index, bound = binding.is_some(), "curve created");
        Ok(index)
    }

    /// Removes one curve. Returns it, or `None` if `index` is out of range.
    pub fn remove_curve(&mut self, index: usize) -> Option<HairCurve> {
        if index >= self.curves.len() {
            return None;
        }
        let removed = self.curves.remove(index);
        self.selected.remove(index);
        match self.active {
            Some(a) if a == index => self.active = self.first_selected(),
            Some(a) if a > index => self.active = Some(a - 1),
            _ => {}
        }
        Some(removed)
    }

    /// Removes several curves. `descending` must be strictly descending so
    /// that earlier removals do not shift later positions.
    /// Returns how many curves were removed.
    pub fn remove_curves(&mut self, descending: &[usize]) -> usize {
        debug_assert!(
            descending.windows(2).all(|w| w[0] > w[1]),
            "remove_curves needs strictly descending indices"
        );
        descending
            .iter()
            .filter(|&&i| self.remove_curve(i).is_some())
            .count()
    }

    // ─── Selection ────────────────────────────────────────────

    /// True if `index` is selected. Out-of-range indices are not.
    pub fn is_curve_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Selection bitset, parallel to [`curves`](Self::curves).
    pub fn selection(&self) -> &[bool] {
        &self.selected
    }

    /// Indices of the selected curves, ascending.
    pub fn selected_curves(&self) -> Vec<usize> {
        (0..self.selected.len()).filter(|&i| self.selected[i]).collect()
    }

    /// Selects `index` and makes it active. Non-additive selection clears
    /// every other curve first.
    pub fn select_curve(&mut self, index: usize, additive: bool) {
        if index >= self.curves.len() {
            return;
        }
        if !additive {
            self.deselect_all();
        }
        self.selected[index] = true;
        self.active = Some(index);
    }

    /// Flips the selection of `index`, re-electing the active curve if needed.
    pub fn toggle_curve_selected(&mut self, index: usize) {
        if index >= self.curves.len() {
            return;
        }
        self.selected[index] = !self.selected[index];
        if self.selected[index] {
            self.active = Some(index);
        } else if self.active == Some(index) {
            self.active = self.first_selected();
        }
    }

    /// Clears the selection and the active curve.
    pub fn deselect_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
        self.active = None;
    }

    /// The most recently targeted curve.
    pub fn active_curve(&self) -> Option<usize> {
        self.active
    }

    /// Sets the active curve. Out-of-range indices clear it.
    pub fn set_active_curve(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| i < self.curves.len());
    }

    fn first_selected(&self) -> Option<usize> {
        self.selected.iter().position(|&s| s)
    }

    // ─── Mesh binding ─────────────────────────────────────────

    /// Moves every bound root onto the current mesh surface, zeroing the
    /// root's velocity. Bindings that fail to evaluate are dropped and
    /// reported. An empty mesh leaves everything untouched.
    pub fn update_pinned_roots_from_mesh(&mut self, mesh: &TriangleMesh) -> Vec<(usize, BindingFault)> {
        let mut faults = Vec::new();
        if mesh.is_empty() {
            return faults;
        }
        for (i, curve) in self.curves.iter_mut().enumerate() {
            let Some(binding) = curve.root else {
                continue;
            };
            match binding.evaluate(mesh) {
                Ok(p) => {
                    if let (Some(p0), Some(q0)) = (curve.points.first_mut(), curve.prev_points.first_mut()) {
                        *p0 = p;
                        *q0 = p;
                    }
                }
                Err(fault) => {
                    warn!(curve = i, %fault, "unpinning curve root");
                    curve.root = None;
                    faults.push((i, fault));
                }
            }
        }
        faults
    }

    // ─── Editing ──────────────────────────────────────────────

    /// Places a control point, zeroing its implied velocity. The root and
    /// out-of-range or non-finite input are refused.
    pub fn move_control_point(&mut self, curve: usize, vertex: usize, world_pos: Vec3) -> bool {
        let Some(c) = self.curves.get_mut(curve) else {
            return false;
        };
        if vertex == 0 || vertex >= c.points.len() {
            return false;
        }
        if !world_pos.is_finite() {
            warn!(curve, vertex, "ignoring non-finite control point position");
            return false;
        }
        c.resync_prev();
        c.points[vertex] = world_pos;
        c.prev_points[vertex] = world_pos;
        true
    }

    /// Resamples every selected curve to `length` over `steps` points.
    /// Returns how many curves changed.
    pub fn apply_length_steps_to_selected(&mut self, length: f32, steps: usize) -> usize {
        let steps = steps.clamp(MIN_CURVE_STEPS, MAX_CURVE_STEPS);
        let length = if length.is_finite() { length.max(MIN_CURVE_LENGTH) } else { MIN_CURVE_LENGTH };
        let mut changed = 0;
        for (curve, &selected) in self.curves.iter_mut().zip(&self.selected) {
            if selected && curve.points.len() >= 2 {
                curve.resample(length, steps);
                changed += 1;
            }
        }
        changed
    }

    // ─── Picking ──────────────────────────────────────────────

    /// Nearest non-root control point within `threshold` of the ray.
    pub fn pick_control_point(&self, ray: &Ray, threshold: f32, selected_only: bool) -> Option<PointPick> {
        if !ray.is_valid() {
            return None;
        }
        let mut best: Option<(PointPick, f32)> = None;
        for (ci, curve) in self.curves.iter().enumerate() {
            if (selected_only && !self.is_curve_selected(ci)) || !self.is_curve_visible(ci) {
                continue;
            }
            for (vi, &p) in curve.points.iter().enumerate().skip(1) {
                let (d, t) = ray.distance_to_point(p);
                if d >= threshold {
                    continue;
                }
                // Equal distances go to the point nearer the eye.
                let better = best.map_or(true, |(b, bt)| {
                    d < b.distance - 1.0e-6 || (d <= b.distance + 1.0e-6 && t < bt)
                });
                if better {
                    let pick = PointPick {
                        curve: ci,
                        vertex: vi,
                        distance: d,
                    };
                    best = Some((pick, t));
                }
            }
        }
        best.map(|(pick, _)| pick)
    }

    /// Curve whose polyline passes closest to the ray, within `threshold`.
    pub fn pick_curve(&self, ray: &Ray, threshold: f32) -> Option<usize> {
        if !ray.is_valid() {
            return None;
        }
        let mut best = f32::INFINITY;
        let mut best_curve = None;
        for (ci, curve) in self.curves.iter().enumerate() {
            if !self.is_curve_visible(ci) {
                continue;
            }
            for seg in curve.points.windows(2) {
                let (d, _) = ray.distance_to_segment(seg[0], seg[1]);
                if d < threshold && d < best {
                    best = d;
                    best_curve = Some(ci);
                }
            }
        }
        best_curve
    }

    // ─── Layers ───────────────────────────────────────────────

    /// All layers, default first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer with the given id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Mutable layer with the given id.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Adds a layer with the next free id.
    pub fn add_layer(&mut self, name: impl Into<String>, color: [f32; 3]) -> LayerId {
        let next = self.layers.iter().map(|l| l.id.0).max().map_or(0, |m| m.saturating_add(1));
        let id = LayerId(next);
        self.layers.push(Layer::new(id, name, color));
        id
    }

    /// Replaces the layer table, keeping the default layer present.
    pub fn set_layers(&mut self, mut layers: Vec<Layer>) {
        if !layers.iter().any(|l| l.id == LayerId::DEFAULT) {
            layers.insert(0, Layer::default_layer());
        }
        self.layers = layers;
    }

    /// Moves a curve to an existing layer.
    pub fn set_curve_layer(&mut self, curve: usize, layer: LayerId) -> bool {
        if self.layer(layer).is_none() {
            return false;
        }
        match self.curves.get_mut(curve) {
            Some(c) => {
                c.layer = layer;
                true
            }
            None => false,
        }
    }

    /// Curve visibility combined with its layer's.
    pub fn is_curve_visible(&self, curve: usize) -> bool {
        self.curves.get(curve).is_some_and(|c| {
            c.visible && self.layer(c.layer).map_or(true, |l| l.visible)
        })
    }

    /// Display colour, taken from the curve's layer.
    pub fn curve_color(&self, curve: usize) -> [f32; 3] {
        self.curves
            .get(curve)
            .and_then(|c| self.layer(c.layer))
            .or_else(|| self.layer(LayerId::DEFAULT))
            .map_or(Layer::default_layer().color, |l| l.color)
    }
}

impl Default for HairGuideSet {
    fn default() -> Self {
        Self::new()
    }
}
