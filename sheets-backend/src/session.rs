//! Single-user flash message, shown once on the next page render.

use parking_lot::Mutex;

#[derive(Default)]
pub struct FlashSession {
    message: Mutex<Option<String>>,
}

impl FlashSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending message.
    pub fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        *self.message.lock() = if message.is_empty() { None } else { Some(message) };
    }

    pub fn has_message(&self) -> bool {
        self.message.lock().is_some()
    }

    /// Take the pending message, leaving the session empty.
    pub fn flush_message(&self) -> Option<String> {
        self.message.lock().take()
    }
}
