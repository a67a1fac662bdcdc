//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle, and receive input through
//! [`Widget::event`]:
//!
//! 1. **Measure**: Compute intrinsic size given constraints
//! 2. **Layout**: Position self within allocated bounds
//! 3. **Paint**: Generate draw commands for rendering
//!
//! # Examples
//!
//! ```
//! use starlit_core::TypeId;
//!
//! let string_type = TypeId::of::<String>();
//! let i32_type = TypeId::of::<i32>();
//! assert_ne!(string_type, i32_type);
//! ```

use crate::constraints::Constraints;
use crate::event::Event;
use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
pub trait Widget: Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw commands for rendering.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle input events.
    ///
    /// Returns a widget-specific message when the event changed something a
    /// host may care about.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Canvas trait for paint operations.
///
/// This is a minimal abstraction over the rendering backend.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: crate::Color);

    /// Draw a stroked rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: crate::Color, width: f32);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: crate::Point, style: &TextStyle);
}

/// Text style for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: crate::Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            color: crate::Color::BLACK,
        }
    }
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Slider
    Slider,
}
