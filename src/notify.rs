//! Outbound notification sinks.
//!
//! Delivery is at-most-once and fire-and-forget. An error from `emit` means
//! the delivery context is gone (it usually co-occurs with host invalidation)
//! and the watcher treats it as the teardown signal.

use anyhow::{anyhow, Result};
use log::info;
use tokio::sync::mpsc;

use crate::audio::NotificationCue;

pub trait Notifier: Send + Sync {
    fn emit(&self, text: &str) -> Result<()>;
}

/// Forwards rendered text to the relay context over an unbounded channel.
/// A closed channel maps to an error so the watcher tears down.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn emit(&self, text: &str) -> Result<()> {
        self.tx
            .send(text.to_string())
            .map_err(|_| anyhow!("notification relay channel closed"))
    }
}

/// Logs instead of delivering. Used by the demo binary.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn emit(&self, text: &str) -> Result<()> {
        info!("notification: {text}");
        Ok(())
    }
}

/// Plays a sound cue alongside whatever the inner sink does. The cue is
/// fire-and-forget and plays even when delivery fails, matching the page
/// behavior where the sound is not gated on the relay.
pub struct CueNotifier {
    inner: Box<dyn Notifier>,
    cue: NotificationCue,
}

impl CueNotifier {
    pub fn new(inner: Box<dyn Notifier>, cue: NotificationCue) -> Self {
        Self { inner, cue }
    }
}

impl Notifier for CueNotifier {
    fn emit(&self, text: &str) -> Result<()> {
        let result = self.inner.emit(text);
        self.cue.play();
        result
    }
}
