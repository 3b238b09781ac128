//! # hairguide-guides
//!
//! Hair guide curves and the store that owns them.
//!
//! ## Key Types
//!
//! - [`HairCurve`] — A particle chain: control points, previous positions
//!   (velocity is implicit), rest length and an optional [`RootBinding`].
//! - [`HairGuideSet`] — All curves plus selection bitset, active curve and
//!   layer table. Every mutation keeps those parallel structures in sync.
//! - [`GuideSettings`] — The single global tuning record read each step.
//! - [`Layer`] — Display grouping (name, colour, visibility).

pub mod curve;
pub mod layers;
pub mod set;
pub mod settings;

pub use curve::{BindingFault, HairCurve, RootBinding};
pub use layers::Layer;
pub use set::{HairGuideSet, PointPick};
pub use settings::GuideSettings;
