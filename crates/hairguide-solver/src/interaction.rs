//! Transient editor state the solver has to honour.

use std::collections::HashMap;

use hairguide_guides::GuideSettings;

/// The control point currently held by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPin {
    /// Curve being dragged.
    pub curve: usize,
    /// Vertex held in place.
    pub vertex: usize,
}

/// Mirror-authored curve pairs, stored both ways.
///
/// The link is ephemeral: it only lasts while both curves stay selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MirrorPairs {
    peers: HashMap<usize, usize>,
}

impl MirrorPairs {
    /// No pairs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `a` and `b`, dropping any previous partner of either.
    pub fn link(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.unlink(a);
        self.unlink(b);
        self.peers.insert(a, b);
        self.peers.insert(b, a);
    }

    /// Removes `curve` and its partner from the map.
    pub fn unlink(&mut self, curve: usize) {
        if let Some(peer) = self.peers.remove(&curve) {
            self.peers.remove(&peer);
        }
    }

    /// Partner of `curve`, if linked.
    pub fn peer(&self, curve: usize) -> Option<usize> {
        self.peers.get(&curve).copied()
    }

    /// Number of linked pairs.
    pub fn len(&self) -> usize {
        self.peers.len() / 2
    }

    /// True when no pairs are linked.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.peers.clear();
    }

    /// Drops every pair with a member that is not selected (or no longer
    /// exists).
    pub fn prune_to_selection(&mut self, selected: &[bool]) {
        let is_selected = |i: usize| selected.get(i).copied().unwrap_or(false);
        self.peers.retain(|&a, &mut b| is_selected(a) && is_selected(b));
    }

    /// Follows the removal of curve `index`: its pair is dropped and higher
    /// indices shift down by one.
    pub fn on_curve_removed(&mut self, index: usize) {
        self.unlink(index);
        let shift = |i: usize| if i > index { i - 1 } else { i };
        self.peers = self.peers.drain().map(|(a, b)| (shift(a), shift(b))).collect();
    }
}

/// Drag pin, gravity override and mirror pairs.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    /// Active drag, if any.
    pub drag: Option<DragPin>,
    /// Whether the gravity override input is currently held.
    pub gravity_override_held: bool,
    /// Mirror-authored pairs.
    pub mirror: MirrorPairs,
}

impl Interaction {
    /// No drag, override released, no pairs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex of `curve` held by an active drag.
    pub fn pinned_vertex(&self, curve: usize) -> Option<usize> {
        self.drag.filter(|d| d.curve == curve).map(|d| d.vertex)
    }

    /// Gravity magnitude for `curve` this step.
    ///
    /// While the override is held, only the active curve (and its mirror
    /// peer in mirror mode) receives the override value; without an active
    /// curve every simulated curve does.
    pub fn effective_gravity(&self, curve: usize, active: Option<usize>, settings: &GuideSettings) -> f32 {
        let global = settings.clamped_gravity();
        if !self.gravity_override_held {
            return global;
        }
        let value = settings.clamped_gravity_override();
        match active {
            None => value,
            Some(a) if a == curve => value,
            Some(a) if settings.mirror_mode && self.mirror.peer(a) == Some(curve) => value,
            Some(_) => global,
        }
    }

    /// Follows the removal of curve `index`. A drag on that curve ends.
    pub fn on_curve_removed(&mut self, index: usize) {
        if let Some(d) = self.drag {
            if d.curve == index {
                self.drag = None;
            } else if d.curve > index {
                self.drag = Some(DragPin {
                    curve: d.curve - 1,
                    ..d
                });
            }
        }
        self.mirror.on_curve_removed(index);
    }

    /// Applies a batch of removals given in descending order.
    pub fn apply_removals(&mut self, descending: &[usize]) {
        for &index in descending {
            self.on_curve_removed(index);
        }
    }
}
