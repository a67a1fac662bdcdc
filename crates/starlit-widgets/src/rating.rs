//! Star rating widget.
//!
//! A row of `max_rating` stars. Pressing a star starts a gesture that
//! previews ratings as the pointer moves and commits on release; see
//! [`crate::interaction`] for the transition rules.

use crate::interaction::{Interaction, InteractionState};
use crate::listeners::{ListenerId, Listeners, RatingEvent, RatingEventKind};
use crate::options::{AppliedOptions, RatingOptions};
use serde_json::Value;
use starlit_core::{
    widget::{AccessibleRole, LayoutResult},
    Canvas, Color, Constraints, Event, LayoutDirection, MouseButton, Point, PointerId, Rect, Size,
    TextStyle, TypeId, Widget,
};
use std::any::Any;
use tracing::trace;

/// Which rating the stars currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// The pointer's tentative rating, during a gesture
    Tentative,
    /// The committed user rating
    User,
    /// The average rating (user has not rated)
    Average,
}

/// How much of a star is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StarFill {
    /// Entirely filled
    Full,
    /// Filled by the given fraction in (0, 1), from the reading start
    Partial(f32),
    /// Not filled
    Empty,
}

/// Star rating widget.
pub struct Rating {
    options: RatingOptions,
    direction: LayoutDirection,
    /// Side length of one star
    star_size: f32,
    user_color: Color,
    tentative_color: Color,
    average_color: Color,
    empty_color: Color,
    disabled_color: Color,
    test_id_value: Option<String>,
    accessible_name_value: Option<String>,
    /// Cached bounds
    bounds: Rect,
    interaction: Interaction,
    listeners: Listeners,
}

impl Default for Rating {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rating")
            .field("options", &self.options)
            .field("direction", &self.direction)
            .field("state", &self.interaction.state())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Rating {
    /// Create a rating with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: RatingOptions::new(),
            direction: LayoutDirection::Ltr,
            star_size: 24.0,
            user_color: Color::new(1.0, 0.75, 0.0, 1.0),
            tentative_color: Color::new(0.2, 0.47, 0.96, 1.0),
            average_color: Color::new(0.55, 0.55, 0.55, 1.0),
            empty_color: Color::new(0.85, 0.85, 0.85, 1.0),
            disabled_color: Color::new(0.6, 0.6, 0.6, 1.0),
            test_id_value: None,
            accessible_name_value: None,
            bounds: Rect::default(),
            interaction: Interaction::new(),
            listeners: Listeners::new(),
        }
    }

    /// Create a rating on a host element with an option bag.
    ///
    /// `host` becomes the test ID. Invalid options are dropped.
    #[must_use]
    pub fn create(host: impl Into<String>, options: &Value) -> Self {
        let mut rating = Self::new().with_test_id(host);
        rating.apply_options(options);
        rating
    }

    // === Builder ===

    /// Set the number of stars (ignored unless positive).
    #[must_use]
    pub fn max_rating(mut self, max_rating: i64) -> Self {
        self.set_max_rating(max_rating);
        self
    }

    /// Set the committed rating (clamped, ignored if negative).
    #[must_use]
    pub fn user_rating(mut self, user_rating: i64) -> Self {
        self.set_user_rating(user_rating);
        self
    }

    /// Set the average rating (clamped, ignored if negative).
    #[must_use]
    pub fn average_rating(mut self, average_rating: f64) -> Self {
        self.set_average_rating(average_rating);
        self
    }

    /// Set disabled state.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.set_disabled(disabled);
        self
    }

    /// Allow or forbid clearing the rating.
    #[must_use]
    pub fn enable_clear(mut self, enable_clear: bool) -> Self {
        self.set_enable_clear(enable_clear);
        self
    }

    /// Set tooltip strings, one per star.
    #[must_use]
    pub fn tooltip_strings<I, S>(mut self, tooltips: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let tooltips = tooltips.into_iter().map(|t| t.map(Into::into)).collect();
        self.set_tooltip_strings(Some(tooltips));
        self
    }

    /// Set layout direction.
    #[must_use]
    pub const fn direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the side length of one star.
    #[must_use]
    pub fn star_size(mut self, size: f32) -> Self {
        self.star_size = size.max(0.0);
        self
    }

    /// Set committed star color.
    #[must_use]
    pub const fn user_color(mut self, color: Color) -> Self {
        self.user_color = color;
        self
    }

    /// Set tentative star color.
    #[must_use]
    pub const fn tentative_color(mut self, color: Color) -> Self {
        self.tentative_color = color;
        self
    }

    /// Set average star color.
    #[must_use]
    pub const fn average_color(mut self, color: Color) -> Self {
        self.average_color = color;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    // === Options ===

    /// Apply a partial option bag. Each field is validated on its own.
    pub fn apply_options(&mut self, options: &Value) -> AppliedOptions {
        let applied = self.options.apply(options);
        self.reconcile_session();
        applied
    }

    /// Set the number of stars. Returns whether it took effect.
    pub fn set_max_rating(&mut self, max_rating: i64) -> bool {
        let accepted = self.options.set_max_rating(max_rating);
        self.reconcile_session();
        accepted
    }

    /// Set the committed rating. Returns whether it took effect.
    pub fn set_user_rating(&mut self, user_rating: i64) -> bool {
        self.options.set_user_rating(user_rating)
    }

    /// Set the average rating. Returns whether it took effect.
    pub fn set_average_rating(&mut self, average_rating: f64) -> bool {
        self.options.set_average_rating(average_rating)
    }

    /// Enable or disable input. Disabling mid-gesture drops the gesture.
    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        let accepted = self.options.set_disabled(disabled);
        self.reconcile_session();
        accepted
    }

    /// Allow or forbid clearing the rating.
    pub fn set_enable_clear(&mut self, enable_clear: bool) -> bool {
        self.options.set_enable_clear(enable_clear)
    }

    /// Replace tooltip strings.
    pub fn set_tooltip_strings(&mut self, tooltips: Option<Vec<Option<String>>>) -> bool {
        self.options.set_tooltip_strings(tooltips)
    }

    fn reconcile_session(&mut self) {
        if self.options.disabled() {
            self.interaction.abandon();
        }
        self.interaction.clamp_to(self.options.max_rating());
    }

    // === Read model ===

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &RatingOptions {
        &self.options
    }

    /// Number of stars.
    #[must_use]
    pub const fn get_max_rating(&self) -> u32 {
        self.options.max_rating()
    }

    /// Committed rating.
    #[must_use]
    pub const fn get_user_rating(&self) -> u32 {
        self.options.user_rating()
    }

    /// Average rating.
    #[must_use]
    pub const fn get_average_rating(&self) -> f64 {
        self.options.average_rating()
    }

    /// Whether input is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.options.disabled()
    }

    /// Whether clearing is allowed.
    #[must_use]
    pub const fn is_clear_enabled(&self) -> bool {
        self.options.enable_clear()
    }

    /// Tooltip for star `star` (1-based).
    #[must_use]
    pub fn tooltip(&self, star: u32) -> Option<&str> {
        self.options.tooltip(star)
    }

    /// Layout direction.
    #[must_use]
    pub const fn get_direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Gesture state.
    #[must_use]
    pub const fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    /// Tentative rating, while tracking.
    #[must_use]
    pub fn tentative_rating(&self) -> Option<u32> {
        self.interaction.tentative_rating()
    }

    /// Which rating the stars show.
    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        if self.interaction.state() == InteractionState::Tracking {
            DisplayMode::Tentative
        } else if self.options.user_rating() == 0 && self.options.average_rating() > 0.0 {
            DisplayMode::Average
        } else {
            DisplayMode::User
        }
    }

    /// Fill of star `rank` (1-based) in the current display mode.
    #[must_use]
    pub fn star_fill(&self, rank: u32) -> StarFill {
        if rank == 0 || rank > self.options.max_rating() {
            return StarFill::Empty;
        }
        let filled_through = |value: u32| {
            if rank <= value {
                StarFill::Full
            } else {
                StarFill::Empty
            }
        };
        match self.display_mode() {
            DisplayMode::Tentative => filled_through(self.tentative_rating().unwrap_or(0)),
            DisplayMode::User => filled_through(self.options.user_rating()),
            DisplayMode::Average => {
                let average = self.options.average_rating();
                let whole = average.floor() as u32;
                let fraction = average - average.floor();
                if rank <= whole {
                    StarFill::Full
                } else if rank == whole + 1 && fraction > 0.0 {
                    StarFill::Partial(fraction as f32)
                } else {
                    StarFill::Empty
                }
            }
        }
    }

    // === Listeners ===

    /// Register a callback for one event kind.
    pub fn add_listener(
        &mut self,
        kind: RatingEventKind,
        callback: impl Fn(&RatingEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.add(kind, callback)
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Registered listeners.
    #[must_use]
    pub const fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    // === Geometry ===

    /// Bounds of star `rank` (1-based) after layout.
    #[must_use]
    pub fn star_rect(&self, rank: u32) -> Option<Rect> {
        let count = self.options.max_rating() as usize;
        if rank == 0 || rank as usize > count {
            return None;
        }
        let physical = self.direction.physical_slot(rank as usize - 1, count);
        self.bounds.column(physical, count)
    }

    /// Logical rank under horizontal position `x`.
    ///
    /// Positions before the reading start map to 0, positions past the
    /// reading end to `max_rating`.
    #[must_use]
    pub fn rank_at(&self, x: f32) -> u32 {
        let max = self.options.max_rating();
        let width = self.bounds.width;
        if width <= 0.0 {
            return 0;
        }
        let (before_start, past_end) = if self.direction.is_rtl() {
            (x > self.bounds.right(), x < self.bounds.x)
        } else {
            (x < self.bounds.x, x > self.bounds.right())
        };
        if before_start {
            return 0;
        }
        if past_end {
            return max;
        }
        let slot_width = width / max as f32;
        let physical = (((x - self.bounds.x) / slot_width) as usize).min(max as usize - 1);
        self.direction.physical_slot(physical, max as usize) as u32 + 1
    }

    /// Star under `point`, if the point is inside the control.
    #[must_use]
    pub fn star_at(&self, point: &Point) -> Option<u32> {
        if self.bounds.width > 0.0 && self.bounds.contains_point(point) {
            Some(self.rank_at(point.x).max(1))
        } else {
            None
        }
    }

    // === Input ===

    fn handle_down(&mut self, pointer_id: PointerId, position: Point) -> Option<RatingEvent> {
        let Some(rank) = self.star_at(&position) else {
            trace!(x = position.x, y = position.y, "pointer down outside stars");
            return None;
        };
        self.interaction.pointer_down(pointer_id, rank, &self.options)
    }

    fn handle_move(&mut self, pointer_id: PointerId, position: Point) -> Option<RatingEvent> {
        if self.interaction.state() == InteractionState::Idle {
            return None;
        }
        let rank = self.rank_at(position.x);
        self.interaction.pointer_move(pointer_id, rank)
    }

    fn handle_up(&mut self, pointer_id: PointerId) -> Option<RatingEvent> {
        let event = self.interaction.pointer_up(pointer_id, &self.options)?;
        if let RatingEvent::Change { user_rating } = event {
            self.options.set_user_rating(i64::from(user_rating));
        }
        Some(event)
    }

    fn emit(&self, event: RatingEvent) -> Box<dyn Any + Send> {
        let invoked = self.listeners.dispatch(&event);
        trace!(kind = %event.kind(), rating = event.rating(), invoked, "rating event");
        Box::new(event)
    }
}

impl Widget for Rating {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let preferred = Size::new(
            self.star_size * self.options.max_rating() as f32,
            self.star_size,
        );
        constraints.constrain(preferred)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let fill_color = if self.options.disabled() {
            self.disabled_color
        } else {
            match self.display_mode() {
                DisplayMode::Tentative => self.tentative_color,
                DisplayMode::User => self.user_color,
                DisplayMode::Average => self.average_color,
            }
        };

        for rank in 1..=self.options.max_rating() {
            let Some(rect) = self.star_rect(rank) else {
                continue;
            };
            canvas.fill_rect(rect, self.empty_color);
            match self.star_fill(rank) {
                StarFill::Full => canvas.fill_rect(rect, fill_color),
                StarFill::Partial(fraction) => {
                    let width = rect.width * fraction;
                    let x = if self.direction.is_rtl() {
                        rect.right() - width
                    } else {
                        rect.x
                    };
                    canvas.fill_rect(Rect::new(x, rect.y, width, rect.height), fill_color);
                }
                StarFill::Empty => {}
            }
        }

        // Tooltip for the star under the pointer
        if let Some(rank) = self.tentative_rating() {
            if let (Some(text), Some(rect)) = (self.tooltip(rank), self.star_rect(rank)) {
                let style = TextStyle {
                    size: self.star_size * 0.5,
                    color: Color::BLACK,
                };
                canvas.draw_text(text, Point::new(rect.x, rect.y - style.size), &style);
            }
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let emitted = match event {
            Event::PointerDown {
                pointer_id,
                position,
                is_primary: true,
                ..
            } => self.handle_down(*pointer_id, *position),
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => self.handle_down(PointerId::MOUSE, *position),
            Event::PointerMove {
                pointer_id,
                position,
                ..
            } => self.handle_move(*pointer_id, *position),
            Event::MouseMove { position } => self.handle_move(PointerId::MOUSE, *position),
            Event::PointerUp { pointer_id, .. } => self.handle_up(*pointer_id),
            Event::MouseUp {
                button: MouseButton::Left,
                ..
            } => self.handle_up(PointerId::MOUSE),
            Event::PointerCancel { pointer_id } | Event::LostPointerCapture { pointer_id } => {
                self.interaction.pointer_cancel(*pointer_id, &self.options)
            }
            _ => None,
        }?;
        Some(self.emit(emitted))
    }

    fn is_interactive(&self) -> bool {
        !self.options.disabled()
    }

    fn is_focusable(&self) -> bool {
        !self.options.disabled()
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Slider
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use starlit_core::PointerType;
    use std::sync::{Arc, Mutex};

    fn laid_out(rating: Rating) -> Rating {
        let mut rating = rating;
        let size = rating.measure(Constraints::unbounded());
        rating.layout(Rect::from_size(size));
        rating
    }

    fn center_of(rating: &Rating, rank: u32) -> Point {
        rating.star_rect(rank).map(|r| r.center()).unwrap()
    }

    fn down(position: Point) -> Event {
        Event::PointerDown {
            pointer_id: PointerId(5),
            pointer_type: PointerType::Touch,
            position,
            is_primary: true,
        }
    }

    fn moved(position: Point) -> Event {
        Event::PointerMove {
            pointer_id: PointerId(5),
            pointer_type: PointerType::Touch,
            position,
        }
    }

    fn up(position: Point) -> Event {
        Event::PointerUp {
            pointer_id: PointerId(5),
            pointer_type: PointerType::Touch,
            position,
        }
    }

    fn message(result: Option<Box<dyn Any + Send>>) -> Option<RatingEvent> {
        result.and_then(|msg| msg.downcast::<RatingEvent>().ok().map(|b| *b))
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn test_rating_new() {
        let rating = Rating::new();
        assert_eq!(rating.get_max_rating(), 5);
        assert_eq!(rating.get_user_rating(), 0);
        assert_eq!(rating.get_average_rating(), 0.0);
        assert!(!rating.is_disabled());
        assert!(rating.is_clear_enabled());
        assert_eq!(rating.get_direction(), LayoutDirection::Ltr);
        assert_eq!(rating.interaction_state(), InteractionState::Idle);
    }

    #[test]
    fn test_rating_builder() {
        let rating = Rating::new()
            .max_rating(8)
            .user_rating(3)
            .average_rating(4.5)
            .enable_clear(false)
            .disabled(true)
            .tooltip_strings([Some("one"), None])
            .direction(LayoutDirection::Rtl)
            .with_test_id("stars")
            .with_accessible_name("Rate this");

        assert_eq!(rating.get_max_rating(), 8);
        assert_eq!(rating.get_user_rating(), 3);
        assert_eq!(rating.get_average_rating(), 4.5);
        assert!(!rating.is_clear_enabled());
        assert!(rating.is_disabled());
        assert_eq!(rating.tooltip(1), Some("one"));
        assert_eq!(rating.tooltip(2), None);
        assert_eq!(Widget::test_id(&rating), Some("stars"));
        assert_eq!(rating.accessible_name(), Some("Rate this"));
        assert!(format!("{rating:?}").contains("Rtl"));
    }

    #[test]
    fn test_rating_create_with_options() {
        let rating = Rating::create(
            "host",
            &json!({ "maxRating": 7, "userRating": 32, "bogus": 1, "disabled": "yes" }),
        );
        assert_eq!(Widget::test_id(&rating), Some("host"));
        assert_eq!(rating.get_max_rating(), 7);
        assert_eq!(rating.get_user_rating(), 7);
        assert!(!rating.is_disabled());
    }

    #[test]
    fn test_rating_builder_ignores_invalid() {
        let rating = Rating::new().max_rating(-1).user_rating(-4).average_rating(-1.0);
        assert_eq!(rating.get_max_rating(), 5);
        assert_eq!(rating.get_user_rating(), 0);
        assert_eq!(rating.get_average_rating(), 0.0);
    }

    // =========================================================================
    // Widget Trait Tests
    // =========================================================================

    #[test]
    fn test_rating_type_id() {
        let rating = Rating::new();
        assert_eq!(Widget::type_id(&rating), TypeId::of::<Rating>());
    }

    #[test]
    fn test_rating_measure() {
        let rating = Rating::new().star_size(20.0);
        let size = rating.measure(Constraints::unbounded());
        assert_eq!(size, Size::new(100.0, 20.0));

        let size = rating.measure(Constraints::loose(Size::new(60.0, 60.0)));
        assert_eq!(size, Size::new(60.0, 20.0));
    }

    #[test]
    fn test_rating_interactive_and_role() {
        let rating = Rating::new();
        assert!(rating.is_interactive());
        assert!(rating.is_focusable());
        assert_eq!(rating.accessible_role(), AccessibleRole::Slider);
        let rating = Rating::new().disabled(true);
        assert!(!rating.is_interactive());
        assert!(!rating.is_focusable());
    }

    #[test]
    fn test_rating_layout_sets_bounds() {
        let mut rating = Rating::new();
        let result = rating.layout(Rect::new(10.0, 10.0, 120.0, 24.0));
        assert_eq!(result.size, Size::new(120.0, 24.0));
        assert_eq!(rating.bounds(), Rect::new(10.0, 10.0, 120.0, 24.0));
    }

    // =========================================================================
    // Geometry Tests
    // =========================================================================

    #[test]
    fn test_star_rects_ltr_and_rtl() {
        let ltr = laid_out(Rating::new().star_size(10.0));
        assert_eq!(ltr.star_rect(1), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(ltr.star_rect(5), Some(Rect::new(40.0, 0.0, 10.0, 10.0)));
        assert_eq!(ltr.star_rect(0), None);
        assert_eq!(ltr.star_rect(6), None);

        let rtl = laid_out(Rating::new().star_size(10.0).direction(LayoutDirection::Rtl));
        assert_eq!(rtl.star_rect(1), Some(Rect::new(40.0, 0.0, 10.0, 10.0)));
        assert_eq!(rtl.star_rect(5), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_rank_at_edges() {
        let ltr = laid_out(Rating::new().star_size(10.0));
        assert_eq!(ltr.rank_at(-5.0), 0);
        assert_eq!(ltr.rank_at(0.0), 1);
        assert_eq!(ltr.rank_at(25.0), 3);
        assert_eq!(ltr.rank_at(50.0), 5);
        assert_eq!(ltr.rank_at(75.0), 5);

        let rtl = laid_out(Rating::new().star_size(10.0).direction(LayoutDirection::Rtl));
        assert_eq!(rtl.rank_at(75.0), 0);
        assert_eq!(rtl.rank_at(45.0), 1);
        assert_eq!(rtl.rank_at(5.0), 5);
        assert_eq!(rtl.rank_at(-5.0), 5);
    }

    #[test]
    fn test_star_rect_with_huge_max_rating() {
        let mut rating = Rating::new().max_rating(i64::from(u32::MAX));
        rating.layout(Rect::new(0.0, 0.0, 1000.0, 24.0));
        let first = rating.star_rect(1).unwrap();
        assert_eq!(first.x, 0.0);
        assert!(first.width > 0.0);
        let last = rating.star_rect(u32::MAX).unwrap();
        assert!((last.right() - 1000.0).abs() < 0.01);
        assert_eq!(rating.star_rect(0), None);
        assert!(rating.rank_at(500.0) > 1);
    }

    #[test]
    fn test_paint_many_stars() {
        #[derive(Default)]
        struct Counter {
            fills: usize,
            texts: usize,
        }
        impl Canvas for Counter {
            fn fill_rect(&mut self, _rect: Rect, _color: Color) {
                self.fills += 1;
            }
            fn stroke_rect(&mut self, _rect: Rect, _color: Color, _width: f32) {}
            fn draw_text(&mut self, _text: &str, _position: Point, _style: &TextStyle) {
                self.texts += 1;
            }
        }

        let mut rating = Rating::new().max_rating(50_000).user_rating(50_000);
        rating.layout(Rect::new(0.0, 0.0, 5000.0, 24.0));
        let mut canvas = Counter::default();
        rating.paint(&mut canvas);
        // One empty fill plus one full fill per star.
        assert_eq!(canvas.fills, 100_000);
        assert_eq!(canvas.texts, 0);
    }

    #[test]
    fn test_rank_at_without_layout() {
        assert_eq!(Rating::new().rank_at(10.0), 0);
        assert_eq!(Rating::new().star_at(&Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_star_at_outside_bounds() {
        let rating = laid_out(Rating::new().star_size(10.0));
        assert_eq!(rating.star_at(&Point::new(15.0, 5.0)), Some(2));
        assert_eq!(rating.star_at(&Point::new(15.0, 50.0)), None);
        assert_eq!(rating.star_at(&Point::new(-1.0, 5.0)), None);
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[test]
    fn test_display_mode_user_and_average() {
        assert_eq!(Rating::new().display_mode(), DisplayMode::User);
        let rating = Rating::new().average_rating(2.5);
        assert_eq!(rating.display_mode(), DisplayMode::Average);
        let rating = Rating::new().average_rating(2.5).user_rating(1);
        assert_eq!(rating.display_mode(), DisplayMode::User);
    }

    #[test]
    fn test_star_fill_average_partial() {
        let rating = Rating::new().average_rating(2.25);
        assert_eq!(rating.star_fill(1), StarFill::Full);
        assert_eq!(rating.star_fill(2), StarFill::Full);
        assert_eq!(rating.star_fill(3), StarFill::Partial(0.25));
        assert_eq!(rating.star_fill(4), StarFill::Empty);
        assert_eq!(rating.star_fill(0), StarFill::Empty);
    }

    #[test]
    fn test_star_fill_user() {
        let rating = Rating::new().user_rating(3);
        assert_eq!(rating.star_fill(3), StarFill::Full);
        assert_eq!(rating.star_fill(4), StarFill::Empty);
    }

    // =========================================================================
    // Gesture Tests
    // =========================================================================

    #[test]
    fn test_tap_commits_and_notifies() {
        let mut rating = laid_out(Rating::new().user_rating(1));
        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in [
            RatingEventKind::PreviewChange,
            RatingEventKind::Change,
            RatingEventKind::Cancel,
        ] {
            let seen = Arc::clone(&seen);
            rating.add_listener(kind, move |event| seen.lock().unwrap().push(*event));
        }

        let target = center_of(&rating, 4);
        let preview = message(rating.event(&down(target)));
        assert_eq!(
            preview,
            Some(RatingEvent::PreviewChange {
                tentative_rating: 4
            })
        );
        assert_eq!(rating.display_mode(), DisplayMode::Tentative);
        assert_eq!(rating.star_fill(4), StarFill::Full);
        assert_eq!(rating.get_user_rating(), 1);

        let change = message(rating.event(&up(target)));
        assert_eq!(change, Some(RatingEvent::Change { user_rating: 4 }));
        assert_eq!(rating.get_user_rating(), 4);
        assert_eq!(rating.display_mode(), DisplayMode::User);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                RatingEvent::PreviewChange {
                    tentative_rating: 4
                },
                RatingEvent::Change { user_rating: 4 },
            ]
        );
    }

    #[test]
    fn test_drag_off_start_clears() {
        let mut rating = laid_out(Rating::new().user_rating(3));
        rating.event(&down(center_of(&rating, 2)));
        let preview = message(rating.event(&moved(Point::new(-10.0, 5.0))));
        assert_eq!(
            preview,
            Some(RatingEvent::PreviewChange {
                tentative_rating: 0
            })
        );
        let change = message(rating.event(&up(Point::new(-10.0, 5.0))));
        assert_eq!(change, Some(RatingEvent::Change { user_rating: 0 }));
        assert_eq!(rating.get_user_rating(), 0);
    }

    #[test]
    fn test_mouse_gesture_uses_left_button_only() {
        let mut rating = laid_out(Rating::new());
        let target = center_of(&rating, 2);
        let right = Event::MouseDown {
            position: target,
            button: MouseButton::Right,
        };
        assert!(rating.event(&right).is_none());

        let left = Event::MouseDown {
            position: target,
            button: MouseButton::Left,
        };
        assert!(rating.event(&left).is_some());
        let drag = Event::MouseMove {
            position: center_of(&rating, 5),
        };
        assert_eq!(
            message(rating.event(&drag)),
            Some(RatingEvent::PreviewChange {
                tentative_rating: 5
            })
        );
        let release = Event::MouseUp {
            position: center_of(&rating, 5),
            button: MouseButton::Left,
        };
        assert_eq!(
            message(rating.event(&release)),
            Some(RatingEvent::Change { user_rating: 5 })
        );
    }

    #[test]
    fn test_non_primary_pointer_does_not_start() {
        let mut rating = laid_out(Rating::new());
        let event = Event::PointerDown {
            pointer_id: PointerId(8),
            pointer_type: PointerType::Touch,
            position: center_of(&rating, 2),
            is_primary: false,
        };
        assert!(rating.event(&event).is_none());
        assert_eq!(rating.interaction_state(), InteractionState::Idle);
    }

    #[test]
    fn test_lost_capture_cancels() {
        let mut rating = laid_out(Rating::new().user_rating(2));
        rating.event(&down(center_of(&rating, 5)));
        let cancel = message(rating.event(&Event::LostPointerCapture {
            pointer_id: PointerId(5),
        }));
        assert_eq!(cancel, Some(RatingEvent::Cancel { user_rating: 2 }));
        assert_eq!(rating.get_user_rating(), 2);
    }

    #[test]
    fn test_cancel_after_mid_gesture_rating_update() {
        let mut rating = laid_out(Rating::new().user_rating(2));
        rating.event(&down(center_of(&rating, 5)));
        rating.apply_options(&json!({ "userRating": 3 }));
        let cancel = message(rating.event(&Event::PointerCancel {
            pointer_id: PointerId(5),
        }));
        assert_eq!(cancel, Some(RatingEvent::Cancel { user_rating: 3 }));
        assert_eq!(rating.get_user_rating(), 3);
    }

    #[test]
    fn test_disable_mid_gesture_abandons_silently() {
        let mut rating = laid_out(Rating::new().user_rating(2));
        rating.event(&down(center_of(&rating, 4)));
        rating.apply_options(&json!({ "disabled": true }));
        assert_eq!(rating.interaction_state(), InteractionState::Idle);
        assert!(rating.event(&up(center_of(&rating, 4))).is_none());
        assert_eq!(rating.get_user_rating(), 2);
    }

    #[test]
    fn test_shrinking_max_mid_gesture_clamps_tentative() {
        let mut rating = laid_out(Rating::new());
        rating.event(&down(center_of(&rating, 5)));
        assert!(rating.set_max_rating(3));
        assert_eq!(rating.tentative_rating(), Some(3));
    }

    #[test]
    fn test_remove_listener() {
        let mut rating = laid_out(Rating::new());
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        let id = rating.add_listener(RatingEventKind::PreviewChange, move |_| {
            *counter.lock().unwrap() += 1;
        });
        rating.event(&down(center_of(&rating, 1)));
        assert!(rating.remove_listener(id));
        rating.event(&moved(center_of(&rating, 3)));
        assert_eq!(*count.lock().unwrap(), 1);
        assert!(rating.listeners().is_empty());
    }
}
