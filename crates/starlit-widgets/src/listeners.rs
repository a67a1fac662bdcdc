//! Rating events and the listener registry.

use std::fmt;

/// Kind of rating event, used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingEventKind {
    /// Tentative rating changed while tracking a gesture
    PreviewChange,
    /// Committed rating changed
    Change,
    /// Gesture ended without a committed change
    Cancel,
}

impl RatingEventKind {
    /// Event name as exposed to hosts.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PreviewChange => "previewchange",
            Self::Change => "change",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for RatingEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message emitted by the rating control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingEvent {
    /// The rating implied by the pointer position changed
    PreviewChange {
        /// Tentative rating (0 when dragged off the start edge)
        tentative_rating: u32,
    },
    /// A gesture committed a new rating
    Change {
        /// The new committed rating
        user_rating: u32,
    },
    /// A gesture ended without changing the rating
    Cancel {
        /// The committed rating, unchanged
        user_rating: u32,
    },
}

impl RatingEvent {
    /// Kind of this event.
    #[must_use]
    pub const fn kind(&self) -> RatingEventKind {
        match self {
            Self::PreviewChange { .. } => RatingEventKind::PreviewChange,
            Self::Change { .. } => RatingEventKind::Change,
            Self::Cancel { .. } => RatingEventKind::Cancel,
        }
    }

    /// Rating carried by the event.
    #[must_use]
    pub const fn rating(&self) -> u32 {
        match self {
            Self::PreviewChange { tentative_rating } => *tentative_rating,
            Self::Change { user_rating } | Self::Cancel { user_rating } => *user_rating,
        }
    }
}

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn Fn(&RatingEvent) + Send + Sync>;

struct Entry {
    id: ListenerId,
    kind: RatingEventKind,
    callback: Callback,
}

/// Registered callbacks per event kind.
///
/// Callbacks run in registration order. Removing a listener takes effect for
/// every later dispatch.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<Entry>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Listeners {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a callback for one event kind.
    pub fn add(
        &mut self,
        kind: RatingEventKind,
        callback: impl Fn(&RatingEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of callbacks registered for `kind`.
    #[must_use]
    pub fn count(&self, kind: RatingEventKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    /// Invoke every callback registered for the event's kind.
    ///
    /// Returns how many callbacks ran.
    pub fn dispatch(&self, event: &RatingEvent) -> usize {
        let kind = event.kind();
        let mut invoked = 0;
        for entry in self.entries.iter().filter(|entry| entry.kind == kind) {
            (entry.callback)(event);
            invoked += 1;
        }
        invoked
    }
}
