//! Pointer-gesture state machine for the rating control.
//!
//! The machine works on logical ranks (1..=max, 0 = before the first star);
//! mapping physical positions to ranks is the widget's job. It never writes
//! the committed rating itself: a commit is reported as
//! [`RatingEvent::Change`] and the owner stores it.

use crate::listeners::RatingEvent;
use crate::options::RatingOptions;
use starlit_core::PointerId;
use tracing::{debug, trace};

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Pointer is down and a tentative rating is active
    Tracking,
}

/// Data that lives for one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Pointer that started the gesture
    pub pointer_id: PointerId,
    /// Rating implied by the current pointer position
    pub tentative_rating: u32,
    /// Committed rating when the gesture began
    pub baseline: u32,
}

/// The gesture state machine.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    session: Option<Session>,
}

impl Interaction {
    /// Create an idle machine.
    #[must_use]
    pub const fn new() -> Self {
        Self { session: None }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> InteractionState {
        if self.session.is_some() {
            InteractionState::Tracking
        } else {
            InteractionState::Idle
        }
    }

    /// Active session, if tracking.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Tentative rating, if tracking.
    #[must_use]
    pub fn tentative_rating(&self) -> Option<u32> {
        self.session.map(|session| session.tentative_rating)
    }

    /// Pointer pressed on star `rank`.
    ///
    /// Starts tracking unless the control is disabled or a gesture is
    /// already active.
    pub fn pointer_down(
        &mut self,
        pointer_id: PointerId,
        rank: u32,
        options: &RatingOptions,
    ) -> Option<RatingEvent> {
        if options.disabled() {
            trace!(rank, "pointer down ignored: disabled");
            return None;
        }
        if let Some(session) = &self.session {
            debug!(
                active = session.pointer_id.0,
                pointer = pointer_id.0,
                "pointer down ignored: gesture already active"
            );
            return None;
        }
        let rank = rank.min(options.max_rating());
        self.session = Some(Session {
            pointer_id,
            tentative_rating: rank,
            baseline: options.user_rating(),
        });
        trace!(rank, baseline = options.user_rating(), "tracking started");
        Some(RatingEvent::PreviewChange {
            tentative_rating: rank,
        })
    }

    /// Pointer moved to rank `rank` (0 when off the start edge).
    ///
    /// Emits a preview only when the rank changes.
    pub fn pointer_move(&mut self, pointer_id: PointerId, rank: u32) -> Option<RatingEvent> {
        let session = self.session_for(pointer_id)?;
        if session.tentative_rating == rank {
            return None;
        }
        session.tentative_rating = rank;
        trace!(rank, "tentative rating changed");
        Some(RatingEvent::PreviewChange {
            tentative_rating: rank,
        })
    }

    /// Pointer released. Ends the gesture with a commit or a cancel.
    ///
    /// A release at rank 0 clears the rating when clearing is enabled and
    /// otherwise floors it at 1. A release that lands on the committed
    /// rating is a cancel. The committed rating is read at release time, so
    /// an option update made during the gesture is respected.
    pub fn pointer_up(
        &mut self,
        pointer_id: PointerId,
        options: &RatingOptions,
    ) -> Option<RatingEvent> {
        let session = *self.session_for(pointer_id)?;
        self.session = None;

        let rating = if session.tentative_rating == 0 && !options.enable_clear() {
            1
        } else {
            session.tentative_rating
        };
        let committed = options.user_rating();
        let event = if rating == committed {
            RatingEvent::Cancel {
                user_rating: committed,
            }
        } else {
            RatingEvent::Change {
                user_rating: rating,
            }
        };
        trace!(?event, baseline = session.baseline, "tracking ended");
        Some(event)
    }

    /// Pointer cancelled or capture lost. Ends the gesture with a cancel
    /// reporting the current committed rating.
    pub fn pointer_cancel(
        &mut self,
        pointer_id: PointerId,
        options: &RatingOptions,
    ) -> Option<RatingEvent> {
        let session = *self.session_for(pointer_id)?;
        self.session = None;
        trace!(baseline = session.baseline, "tracking cancelled");
        Some(RatingEvent::Cancel {
            user_rating: options.user_rating(),
        })
    }

    /// Drop the active gesture without emitting anything.
    ///
    /// Returns `true` if a gesture was active.
    pub fn abandon(&mut self) -> bool {
        let abandoned = self.session.take().is_some();
        if abandoned {
            debug!("tracking abandoned");
        }
        abandoned
    }

    /// Clamp the tentative rating after the star count shrank.
    pub fn clamp_to(&mut self, max_rating: u32) {
        if let Some(session) = &mut self.session {
            session.tentative_rating = session.tentative_rating.min(max_rating);
        }
    }

    fn session_for(&mut self, pointer_id: PointerId) -> Option<&mut Session> {
        let active = self.session.as_ref()?.pointer_id;
        if active != pointer_id {
            debug!(
                active = active.0,
                pointer = pointer_id.0,
                "ignoring event from another pointer"
            );
            return None;
        }
        self.session.as_mut()
    }
}
