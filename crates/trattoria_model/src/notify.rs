//! Sinks for business action messages.
//!
//! The model triggers a message when a role-gated action runs; it never
//! interprets the text.

use parking_lot::Mutex;

/// Receives short human-readable messages about business actions.
pub trait Notifier: Send + Sync {
    /// Delivers one message.
    fn notify(&self, message: &str);
}

/// Emits each message as an `info` event under `trattoria::notify`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(target: "trattoria::notify", "{message}");
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Returns the most recent message.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.messages.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
