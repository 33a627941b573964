pub mod controller;
pub mod subscription;
mod worker;

pub use controller::{AlwaysValid, ValidityProbe, WatcherController};
pub use subscription::{
    page_event_channel, MutationBatch, MutationKind, ObserveOptions, PageEvent, PageEventReceiver,
    PageEventSender,
};
