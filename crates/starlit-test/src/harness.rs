//! Test harness for the rating control.
//!
//! Drives a [`Rating`] with synthetic pointer input and checks option
//! updates against an independent model of the validation rules.

use crate::canvas::RecordingCanvas;
use crate::event_log::{EventCounts, EventLog};
use serde_json::Value;
use starlit_core::{
    Constraints, Event, MouseButton, Point, PointerId, PointerType, Rect, Size, Widget,
};
use starlit_widgets::{
    AppliedOptions, InteractionState, Rating, RatingEvent, RatingOptions, StarFill,
};
use std::collections::VecDeque;
use tracing::trace;

/// Distance past the control edge used for off-control moves.
const OFF_EDGE: f32 = 12.0;

/// Test harness wrapping one rating control.
pub struct Harness {
    rating: Rating,
    log: EventLog,
    /// Event queue for simulation
    event_queue: VecDeque<Event>,
    /// Events returned by the widget, in order
    returned: Vec<RatingEvent>,
    viewport: Rect,
    pointer_id: PointerId,
    pointer_type: PointerType,
    /// Send legacy mouse events instead of pointer events
    mouse_events: bool,
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("rating", &self.rating)
            .field("pending", &self.event_queue.len())
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl Harness {
    /// Wrap a rating, lay it out and attach an event log.
    #[must_use]
    pub fn new(rating: Rating) -> Self {
        let mut harness = Self {
            rating,
            log: EventLog::new(),
            event_queue: VecDeque::new(),
            returned: Vec::new(),
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            pointer_id: PointerId(7),
            pointer_type: PointerType::Mouse,
            mouse_events: false,
        };
        harness.log.attach(&mut harness.rating);
        harness.relayout();
        harness
    }

    /// Instantiate a control on `host` with an option bag.
    #[must_use]
    pub fn instantiate(host: &str, options: &Value) -> Self {
        crate::init_logging();
        Self::new(Rating::create(host, options))
    }

    /// Set the viewport the control is laid out in.
    #[must_use]
    pub fn viewport(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.viewport = Rect::new(x, y, width, height);
        self.relayout();
        self
    }

    /// Use pointer events of this type.
    #[must_use]
    pub const fn pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self.mouse_events = false;
        self
    }

    /// Use pointer events with this pointer ID.
    #[must_use]
    pub const fn pointer_id(mut self, pointer_id: PointerId) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    /// Use legacy mouse events (left button).
    #[must_use]
    pub const fn mouse_events(mut self) -> Self {
        self.mouse_events = true;
        self
    }

    /// Re-measure and lay out the control at the viewport origin.
    pub fn relayout(&mut self) -> &mut Self {
        let size = self
            .rating
            .measure(Constraints::loose(Size::new(self.viewport.width, self.viewport.height)));
        self.rating.layout(Rect::new(
            self.viewport.x,
            self.viewport.y,
            size.width,
            size.height,
        ));
        self
    }

    // === Gesture Simulation ===

    /// Press on star `rank`.
    pub fn pointer_down_on(&mut self, rank: u32) -> &mut Self {
        let position = self.star_center(rank);
        self.push_down(position);
        self.process_events()
    }

    /// Move to star `rank`.
    pub fn move_to(&mut self, rank: u32) -> &mut Self {
        let position = self.star_center(rank);
        self.push_move(position);
        self.process_events()
    }

    /// Move off the control before the first star.
    pub fn move_off_start(&mut self) -> &mut Self {
        let position = self.off_edge(true);
        self.push_move(position);
        self.process_events()
    }

    /// Move off the control past the last star.
    pub fn move_off_end(&mut self) -> &mut Self {
        let position = self.off_edge(false);
        self.push_move(position);
        self.process_events()
    }

    /// Release the pointer where it is.
    pub fn release(&mut self) -> &mut Self {
        let position = self.rating.bounds().center();
        if self.mouse_events {
            self.event_queue.push_back(Event::MouseUp {
                position,
                button: MouseButton::Left,
            });
        } else {
            self.event_queue.push_back(Event::PointerUp {
                pointer_id: self.pointer_id,
                pointer_type: self.pointer_type,
                position,
            });
        }
        self.process_events()
    }

    /// Cancel the pointer.
    pub fn cancel(&mut self) -> &mut Self {
        self.event_queue.push_back(Event::PointerCancel {
            pointer_id: self.active_pointer(),
        });
        self.process_events()
    }

    /// Lose pointer capture.
    pub fn lose_capture(&mut self) -> &mut Self {
        self.event_queue.push_back(Event::LostPointerCapture {
            pointer_id: self.active_pointer(),
        });
        self.process_events()
    }

    /// Press and release on star `rank`.
    pub fn tap(&mut self, rank: u32) -> &mut Self {
        self.pointer_down_on(rank).release()
    }

    /// Press on `from`, move one star at a time to `to`, then release.
    pub fn drag(&mut self, from: u32, to: u32) -> &mut Self {
        self.pointer_down_on(from);
        if from <= to {
            for rank in from + 1..=to {
                self.move_to(rank);
            }
        } else {
            for rank in (to..from).rev() {
                self.move_to(rank);
            }
        }
        self.release()
    }

    /// Send a raw event to the control.
    pub fn send(&mut self, event: Event) -> &mut Self {
        self.event_queue.push_back(event);
        self.process_events()
    }

    // === Options ===

    /// Apply an option bag without checking the result.
    pub fn set_options(&mut self, options: &Value) -> AppliedOptions {
        self.rating.apply_options(options)
    }

    /// Apply an option bag and verify every recognized key took effect,
    /// was clamped, or was rejected.
    ///
    /// # Panics
    ///
    /// Panics if the resulting options differ from the modeled outcome.
    pub fn set_options_and_verify(&mut self, options: &Value) -> &mut Self {
        let expected = expected_options(self.rating.options(), options);
        self.set_options(options);
        let actual = self.rating.options();
        assert_eq!(
            actual.max_rating(),
            expected.max_rating,
            "maxRating after {options}"
        );
        assert_eq!(
            actual.user_rating(),
            expected.user_rating,
            "userRating after {options}"
        );
        assert!(
            (actual.average_rating() - expected.average_rating).abs() < f64::EPSILON,
            "averageRating after {options}: expected {}, got {}",
            expected.average_rating,
            actual.average_rating()
        );
        assert_eq!(actual.disabled(), expected.disabled, "disabled after {options}");
        assert_eq!(
            actual.enable_clear(),
            expected.enable_clear,
            "enableClear after {options}"
        );
        assert_eq!(
            actual.tooltip_strings(),
            expected.tooltip_strings.as_deref(),
            "tooltipStrings after {options}"
        );
        self.relayout()
    }

    // === Queries ===

    /// The control under test.
    #[must_use]
    pub const fn rating(&self) -> &Rating {
        &self.rating
    }

    /// Mutable access to the control.
    pub fn rating_mut(&mut self) -> &mut Rating {
        &mut self.rating
    }

    /// Listener-side event log.
    #[must_use]
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    /// Events returned by the widget from `event`.
    #[must_use]
    pub fn returned(&self) -> &[RatingEvent] {
        &self.returned
    }

    /// Paint into a fresh recording canvas.
    #[must_use]
    pub fn paint(&self) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        self.rating.paint(&mut canvas);
        canvas
    }

    /// Center of star `rank`, or the control center if it has no such star.
    #[must_use]
    pub fn star_center(&self, rank: u32) -> Point {
        self.rating
            .star_rect(rank)
            .map_or_else(|| self.rating.bounds().center(), |rect| rect.center())
    }

    // === Assertions ===

    /// Assert the committed rating.
    ///
    /// # Panics
    ///
    /// Panics if the committed rating differs.
    pub fn assert_user_rating(&self, expected: u32) -> &Self {
        assert_eq!(
            self.rating.get_user_rating(),
            expected,
            "Expected userRating {expected}"
        );
        self
    }

    /// Assert the tentative rating.
    ///
    /// # Panics
    ///
    /// Panics if the control is not tracking or shows another rating.
    pub fn assert_tentative(&self, expected: u32) -> &Self {
        assert_eq!(
            self.rating.tentative_rating(),
            Some(expected),
            "Expected tentative rating {expected}"
        );
        self
    }

    /// Assert the gesture state.
    ///
    /// # Panics
    ///
    /// Panics if the state differs.
    pub fn assert_state(&self, expected: InteractionState) -> &Self {
        assert_eq!(self.rating.interaction_state(), expected);
        self
    }

    /// Assert cumulative event counts.
    ///
    /// # Panics
    ///
    /// Panics if the counts differ, or if the widget's returned events
    /// disagree with what the listeners saw.
    pub fn assert_counts(&self, preview: usize, change: usize, cancel: usize) -> &Self {
        assert_eq!(
            self.log.counts(),
            EventCounts::new(preview, change, cancel),
            "event counts (previewchange, change, cancel)"
        );
        assert_eq!(
            self.log.events(),
            self.returned,
            "listeners and widget output disagree"
        );
        self
    }

    /// Assert the most recent event.
    ///
    /// # Panics
    ///
    /// Panics if no event was emitted or the last one differs.
    pub fn assert_last_event(&self, expected: RatingEvent) -> &Self {
        assert_eq!(self.log.last(), Some(expected));
        self
    }

    /// Assert how each star is filled, first star first.
    ///
    /// # Panics
    ///
    /// Panics if any star's fill differs.
    pub fn assert_fills(&self, expected: &[StarFill]) -> &Self {
        let actual: Vec<StarFill> = (1..=self.rating.get_max_rating())
            .map(|rank| self.rating.star_fill(rank))
            .collect();
        assert_eq!(actual, expected);
        self
    }

    // === Internals ===

    fn push_down(&mut self, position: Point) {
        if self.mouse_events {
            self.event_queue.push_back(Event::MouseMove { position });
            self.event_queue.push_back(Event::MouseDown {
                position,
                button: MouseButton::Left,
            });
        } else {
            self.event_queue.push_back(Event::PointerDown {
                pointer_id: self.pointer_id,
                pointer_type: self.pointer_type,
                position,
                is_primary: true,
            });
        }
    }

    fn push_move(&mut self, position: Point) {
        if self.mouse_events {
            self.event_queue.push_back(Event::MouseMove { position });
        } else {
            self.event_queue.push_back(Event::PointerMove {
                pointer_id: self.pointer_id,
                pointer_type: self.pointer_type,
                position,
            });
        }
    }

    const fn active_pointer(&self) -> PointerId {
        if self.mouse_events {
            PointerId::MOUSE
        } else {
            self.pointer_id
        }
    }

    fn off_edge(&self, reading_start: bool) -> Point {
        let bounds = self.rating.bounds();
        let y = bounds.center().y;
        let left = reading_start != self.rating.get_direction().is_rtl();
        if left {
            Point::new(bounds.x - OFF_EDGE, y)
        } else {
            Point::new(bounds.right() + OFF_EDGE, y)
        }
    }

    fn process_events(&mut self) -> &mut Self {
        while let Some(event) = self.event_queue.pop_front() {
            trace!(?event, "harness event");
            if let Some(message) = self.rating.event(&event) {
                if let Ok(emitted) = message.downcast::<RatingEvent>() {
                    self.returned.push(*emitted);
                }
            }
        }
        self
    }
}

/// Option values a bag should produce, modeled independently of
/// [`RatingOptions::apply`].
#[derive(Debug, Clone, PartialEq)]
struct ExpectedOptions {
    max_rating: u32,
    user_rating: u32,
    average_rating: f64,
    disabled: bool,
    enable_clear: bool,
    tooltip_strings: Option<Vec<Option<String>>>,
}

fn expected_options(before: &RatingOptions, bag: &Value) -> ExpectedOptions {
    let field = |name: &str| bag.as_object().and_then(|map| map.get(name));

    let max_rating = field("maxRating")
        .and_then(whole_number)
        .filter(|max| *max > 0.0 && *max <= f64::from(u32::MAX))
        .map_or(before.max_rating(), |max| max as u32);
    let user_rating = field("userRating")
        .and_then(whole_number)
        .filter(|rating| *rating >= 0.0)
        .map_or(before.user_rating(), |rating| {
            rating.min(f64::from(u32::MAX)) as u32
        })
        .min(max_rating);
    let average_rating = field("averageRating")
        .and_then(Value::as_f64)
        .filter(|average| average.is_finite() && *average >= 0.0)
        .unwrap_or(before.average_rating())
        .min(f64::from(max_rating));
    let disabled = field("disabled")
        .and_then(Value::as_bool)
        .unwrap_or(before.disabled());
    let enable_clear = field("enableClear")
        .and_then(Value::as_bool)
        .unwrap_or(before.enable_clear());
    let tooltip_strings = match field("tooltipStrings") {
        None => before.tooltip_strings().map(<[_]>::to_vec),
        Some(Value::Null) => None,
        Some(Value::Array(items)) if items.iter().all(|i| i.is_null() || i.is_string()) => Some(
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        Some(_) => before.tooltip_strings().map(<[_]>::to_vec),
    };

    ExpectedOptions {
        max_rating,
        user_rating,
        average_rating,
        disabled,
        enable_clear,
        tooltip_strings,
    }
}

fn whole_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|number| number.is_finite() && number.fract() == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_harness_lays_out_control() {
        let harness = Harness::new(Rating::new());
        assert_eq!(harness.rating().bounds(), Rect::new(0.0, 0.0, 120.0, 24.0));
        assert_eq!(harness.rating().listeners().len(), 3);
    }

    #[test]
    fn test_viewport_offsets_control() {
        let harness = Harness::new(Rating::new()).viewport(50.0, 10.0, 400.0, 100.0);
        assert_eq!(harness.rating().bounds().x, 50.0);
        assert_eq!(harness.star_center(1), Point::new(62.0, 22.0));
    }

    #[test]
    fn test_tap_commits() {
        let mut harness = Harness::instantiate("rating", &json!({}));
        harness.tap(3);
        harness
            .assert_user_rating(3)
            .assert_counts(1, 1, 0)
            .assert_last_event(RatingEvent::Change { user_rating: 3 });
    }

    #[test]
    fn test_mouse_events_drag() {
        let mut harness = Harness::new(Rating::new()).mouse_events();
        harness.drag(1, 4);
        harness.assert_user_rating(4).assert_counts(4, 1, 0);
    }

    #[test]
    fn test_expected_options_model() {
        let before = RatingOptions::new();
        let expected = expected_options(
            &before,
            &json!({"maxRating": 3, "userRating": 9, "averageRating": -1, "disabled": "yes"}),
        );
        assert_eq!(expected.max_rating, 3);
        assert_eq!(expected.user_rating, 3);
        assert_eq!(expected.average_rating, 0.0);
        assert!(!expected.disabled);
        assert!(expected.enable_clear);
    }

    #[test]
    fn test_expected_options_rejects_mixed_tooltips() {
        let mut before = RatingOptions::new();
        before.set_tooltip_strings(Some(vec![Some("a".into())]));
        let expected = expected_options(&before, &json!({"tooltipStrings": ["x", 1]}));
        assert_eq!(expected.tooltip_strings, Some(vec![Some("a".to_string())]));
    }

    #[test]
    fn test_set_options_and_verify() {
        let mut harness = Harness::instantiate("rating", &json!({"userRating": 4}));
        harness
            .set_options_and_verify(&json!({"maxRating": 2}))
            .set_options_and_verify(&json!({"maxRating": 8.0, "userRating": 6}))
            .set_options_and_verify(&json!({"maxRating": "7"}))
            .assert_user_rating(6);
        assert_eq!(harness.rating().bounds().width, 8.0 * 24.0);
    }
}
