//! Testing utilities for the Starlit rating control.
//!
//! - [`Harness`]: drives a rating with synthetic pointer input
//! - [`EventLog`]: records `previewchange`, `change` and `cancel` events
//! - [`RecordingCanvas`]: captures paint output
//! - [`OptionGenerator`]: seeded valid and invalid option values
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use starlit_test::Harness;
//!
//! let mut harness = Harness::instantiate("rating", &json!({"maxRating": 7}));
//! harness.drag(2, 5);
//! harness.assert_user_rating(5).assert_counts(4, 1, 0);
//! ```

mod canvas;
mod event_log;
mod harness;
mod random;

pub use canvas::{DrawCommand, RecordingCanvas};
pub use event_log::{EventCounts, EventLog};
pub use harness::Harness;
pub use random::{OptionGenerator, MAX_GENERATED_STARS};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber for tests, once per process.
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}
