//! Suppression of passes while the user is composing.
//!
//! The watched panel echoes the user's own draft into the observed subtree,
//! which would otherwise read as new activity. The guard is purely
//! deadline-based and takes the current instant from the caller, so it can be
//! exercised in tests without waiting.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct TypingGuard {
    active_until: Option<Instant>,
}

impl TypingGuard {
    /// Records a keystroke or input event, pushing the deadline out by the
    /// configured idle window.
    pub fn note_activity(&mut self, now: Instant, idle: Duration) {
        self.active_until = Some(now + idle);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.active_until.map(|deadline| now < deadline).unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.active_until = None;
    }
}
