//! User-facing notifications.
//!
//! The UI layer decides how a message is shown (toast, banner, status
//! line). The cart only needs to hand it over.

use std::sync::{Arc, Mutex};

/// Sink for messages meant for the user.
pub trait Notifier: Send + Sync {
    /// Show an error message to the user.
    fn report_error(&self, message: &str);
}

/// Notifier that emits messages as `tracing` events.
///
/// Useful for headless hosts where the log is the only user surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn report_error(&self, message: &str) {
        tracing::warn!(target: "rocketshoes_cart::user", user_message = message, "User notified");
    }
}

/// Notifier that keeps every message it receives.
///
/// Clones share the same message list.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Remove and return all recorded messages.
    pub fn take(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut messages| std::mem::take(&mut *messages))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn report_error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
