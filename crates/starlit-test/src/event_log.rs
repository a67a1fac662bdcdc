//! Event-count bookkeeping for rating listeners.

use starlit_widgets::{ListenerId, Rating, RatingEvent, RatingEventKind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Per-kind event counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventCounts {
    /// `previewchange` events
    pub preview: usize,
    /// `change` events
    pub change: usize,
    /// `cancel` events
    pub cancel: usize,
}

impl EventCounts {
    /// Build counts from the three totals.
    #[must_use]
    pub const fn new(preview: usize, change: usize, cancel: usize) -> Self {
        Self {
            preview,
            change,
            cancel,
        }
    }

    /// Sum of all counts.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.preview + self.change + self.cancel
    }
}

/// Shared log of every event a rating emitted to its listeners.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RatingEvent>>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the log to all three event kinds.
    pub fn attach(&self, rating: &mut Rating) -> [ListenerId; 3] {
        [
            RatingEventKind::PreviewChange,
            RatingEventKind::Change,
            RatingEventKind::Cancel,
        ]
        .map(|kind| {
            let events = Arc::clone(&self.events);
            rating.add_listener(kind, move |event| {
                lock(&events).push(*event);
            })
        })
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<RatingEvent> {
        lock(&self.events).clone()
    }

    /// Most recent event.
    #[must_use]
    pub fn last(&self) -> Option<RatingEvent> {
        lock(&self.events).last().copied()
    }

    /// Number of events of one kind.
    #[must_use]
    pub fn count(&self, kind: RatingEventKind) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| event.kind() == kind)
            .count()
    }

    /// Counts for all kinds.
    #[must_use]
    pub fn counts(&self) -> EventCounts {
        EventCounts::new(
            self.count(RatingEventKind::PreviewChange),
            self.count(RatingEventKind::Change),
            self.count(RatingEventKind::Cancel),
        )
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

fn lock(events: &Mutex<Vec<RatingEvent>>) -> MutexGuard<'_, Vec<RatingEvent>> {
    events.lock().unwrap_or_else(PoisonError::into_inner)
}
