//! Strongly-typed identifiers.
//!
//! Curves are addressed by plain `usize` positions in the guide set
//! because those positions shift on removal. Triangles and layers are
//! stable for the lifetime of a mesh or document, so they get newtypes.

use serde::{Deserialize, Serialize};

/// Index into a mesh's triangle array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriangleId(pub u32);

/// Identifier of a guide layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u16);

impl TriangleId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Converts a signed index as stored in documents (`-1` = unbound).
    pub fn from_signed(value: i64) -> Option<Self> {
        u32::try_from(value).ok().map(Self)
    }

    /// Signed representation used by documents and PLY files.
    pub fn to_signed(id: Option<Self>) -> i64 {
        id.map_or(-1, |t| i64::from(t.0))
    }
}

impl LayerId {
    /// The layer every curve belongs to unless told otherwise.
    pub const DEFAULT: LayerId = LayerId(0);

    /// Position of this layer in a dense table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TriangleId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u16> for LayerId {
    fn from(val: u16) -> Self {
        Self(val)
    }
}
