//! Watches a mirrored DOM subtree of a marketplace "messages" panel and raises
//! a notification once per real change: new auction listings, customers coming
//! online, unread-message backlog, and coarse keyword activity.
//!
//! The crate never touches a live browser. The host mirrors the watched region
//! into a [`dom::DomNode`] value tree, forwards mutation batches and input
//! activity over a channel, and supplies the side-effect sinks (notification
//! delivery, session storage, validity probe) through small traits. Everything
//! stateful lives in one [`observer::WatcherController`] per watched region.

pub mod audio;
pub mod config;
pub mod diff;
pub mod dom;
pub mod events;
pub mod guard;
pub mod notify;
pub mod observer;
pub mod reload;
pub mod snapshot;
pub mod state;
pub mod store;

pub use audio::NotificationCue;
pub use config::WatchConfig;
pub use diff::diff;
pub use dom::{DomNode, DomSource, SharedDom};
pub use events::{ChangeEvent, EventOrigin, OnlineEntry};
pub use notify::{ChannelNotifier, CueNotifier, LogNotifier, Notifier};
pub use observer::{
    page_event_channel, AlwaysValid, MutationBatch, MutationKind, ObserveOptions, PageEvent,
    PageEventReceiver, PageEventSender, ValidityProbe, WatcherController,
};
pub use snapshot::{OrderRecord, Snapshot};
pub use store::{MemorySessionStore, SessionStore};
