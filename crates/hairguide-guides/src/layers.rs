//! Display layers. A curve's colour and effective visibility come from
//! its layer.

use serde::{Deserialize, Serialize};
use hairguide_types::LayerId;

/// A named group of curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique layer id.
    pub id: LayerId,
    /// Display name.
    pub name: String,
    /// Linear RGB in `[0, 1]`.
    pub color: [f32; 3],
    /// Hidden layers hide all their curves.
    pub visible: bool,
}

impl Layer {
    /// A visible layer.
    pub fn new(id: LayerId, name: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            visible: true,
        }
    }

    /// The layer that exists in every guide set.
    pub fn default_layer() -> Self {
        Self::new(LayerId::DEFAULT, "default", [0.85, 0.75, 0.45])
    }
}
