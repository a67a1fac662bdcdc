//! Horizontal layout direction.

use serde::{Deserialize, Serialize};

/// Reading direction of a horizontally laid out widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Left to right
    #[default]
    Ltr,
    /// Right to left (mirrored)
    Rtl,
}

impl LayoutDirection {
    /// Check if the layout is mirrored.
    #[must_use]
    pub const fn is_rtl(&self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// Map a logical slot (0 = reading start) to a physical slot (0 = leftmost).
    ///
    /// The mapping is its own inverse, so it also converts physical to logical.
    #[must_use]
    pub const fn physical_slot(&self, slot: usize, count: usize) -> usize {
        match self {
            Self::Ltr => slot,
            Self::Rtl => count - 1 - slot,
        }
    }
}
