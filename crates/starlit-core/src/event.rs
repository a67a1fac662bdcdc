//! Input events for widgets.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    // Pointer events (unified mouse/touch/pen)
    /// Pointer down
    PointerDown {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
        /// Is primary pointer
        is_primary: bool,
    },
    /// Pointer moved
    PointerMove {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
    },
    /// Pointer up
    PointerUp {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
    },
    /// Pointer cancelled by the platform (e.g. touch turned into a scroll)
    PointerCancel {
        /// Pointer ID
        pointer_id: PointerId,
    },
    /// Element lost capture of the pointer
    LostPointerCapture {
        /// Pointer ID
        pointer_id: PointerId,
    },
    /// Widget lost focus
    FocusOut,
}

impl Event {
    /// Position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. }
            | Self::PointerDown { position, .. }
            | Self::PointerMove { position, .. }
            | Self::PointerUp { position, .. } => Some(*position),
            Self::PointerCancel { .. } | Self::LostPointerCapture { .. } | Self::FocusOut => None,
        }
    }

    /// Pointer ID carried by the event.
    ///
    /// Mouse events report [`PointerId::MOUSE`].
    #[must_use]
    pub const fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::MouseMove { .. } | Self::MouseDown { .. } | Self::MouseUp { .. } => {
                Some(PointerId::MOUSE)
            }
            Self::PointerDown { pointer_id, .. }
            | Self::PointerMove { pointer_id, .. }
            | Self::PointerUp { pointer_id, .. }
            | Self::PointerCancel { pointer_id }
            | Self::LostPointerCapture { pointer_id } => Some(*pointer_id),
            Self::FocusOut => None,
        }
    }
}

/// Pointer identifier for pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

impl PointerId {
    /// Identifier used for legacy mouse events.
    pub const MOUSE: Self = Self(1);
}

/// Type of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PointerType {
    /// Mouse pointer
    #[default]
    Mouse,
    /// Touch pointer
    Touch,
    /// Pen/stylus pointer
    Pen,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}
