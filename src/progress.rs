//! Observer trait for submission progress.
//!
//! Inject an [`Arc<dyn SubmissionObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to follow a submission:
//! every [`UiState`] transition is reported, plus the moment the request
//! leaves for the server. The CLI drives its spinner from these events; a
//! GUI would redraw its button and loader.
//!
//! # Example
//!
//! ```rust
//! use postforge::{ClientConfig, SubmissionObserver, UiState};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Recorder {
//!     states: Mutex<Vec<UiState>>,
//! }
//!
//! impl SubmissionObserver for Recorder {
//!     fn on_state(&self, state: &UiState) {
//!         self.states.lock().unwrap().push(state.clone());
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .observer(Arc::new(Recorder::default()) as Arc<dyn SubmissionObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::state::UiState;
use std::sync::Arc;

/// Called by [`crate::Client`] as a submission progresses.
///
/// All methods default to no-ops so implementors override only what they
/// need.
pub trait SubmissionObserver: Send + Sync {
    /// Called on every state transition, including the final one.
    fn on_state(&self, state: &UiState) {
        let _ = state;
    }

    /// Called right before the HTTP request is sent.
    ///
    /// # Arguments
    /// * `label`: phase text for the button, e.g. "Sending to Server..."
    fn on_sending(&self, label: &str) {
        let _ = label;
    }
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type Observer = Arc<dyn SubmissionObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Tracking {
        states: Mutex<Vec<UiState>>,
        sends: Mutex<Vec<String>>,
    }

    impl SubmissionObserver for Tracking {
        fn on_state(&self, state: &UiState) {
            self.states.lock().unwrap().push(state.clone());
        }

        fn on_sending(&self, label: &str) {
            self.sends.lock().unwrap().push(label.to_string());
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_state(&UiState::Submitting { with_video: true });
        o.on_sending("Sending to Server...");
        o.on_state(&UiState::Success);
    }

    #[test]
    fn tracking_observer_receives_events() {
        let t = Tracking::default();
        t.on_state(&UiState::Submitting { with_video: false });
        t.on_sending("Sending to Server...");
        t.on_state(&UiState::Success);

        assert_eq!(t.states.lock().unwrap().len(), 2);
        assert_eq!(t.sends.lock().unwrap().as_slice(), ["Sending to Server..."]);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let o: Observer = Arc::new(NoopObserver);
        o.on_state(&UiState::Idle);
    }
}
