//! Core types and traits for the Starlit rating control.
//!
//! This crate provides foundational types used by the widgets crate:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`Constraints`] and [`LayoutDirection`]
//! - Input events: [`Event`], [`PointerId`], [`PointerType`], [`MouseButton`]
//! - The [`Widget`] and [`Canvas`] traits

mod color;
mod constraints;
mod direction;
mod event;
mod geometry;
pub mod widget;

pub use color::Color;
pub use constraints::Constraints;
pub use direction::LayoutDirection;
pub use event::{Event, MouseButton, PointerId, PointerType};
pub use geometry::{Point, Rect, Size};
pub use widget::{AccessibleRole, Canvas, LayoutResult, TextStyle, TypeId, Widget};
