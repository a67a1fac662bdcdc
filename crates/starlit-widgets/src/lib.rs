//! Star rating control for the Starlit UI toolkit.
//!
//! - [`Rating`]: the widget, with its option model and pointer handling
//! - [`RatingOptions`]: validated configuration and the option-bag API
//! - [`Interaction`]: the gesture state machine
//! - [`Listeners`]: per-event-kind callback registry

pub mod interaction;
pub mod listeners;
pub mod options;
pub mod rating;

pub use interaction::{Interaction, InteractionState, Session};
pub use listeners::{ListenerId, Listeners, RatingEvent, RatingEventKind};
pub use options::{AppliedOptions, OptionError, OptionKey, RatingOptions, DEFAULT_MAX_RATING};
pub use rating::{DisplayMode, Rating, StarFill};
