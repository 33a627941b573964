//! The channel between the host's page hooks and the watch loop.

use tokio::sync::mpsc;

/// Change kinds the host-side DOM observer should request for the watched
/// subtree. Attribute reporting must stay on to catch online-status flips
/// without waiting for the periodic check; with it off, those changes are
/// caught by the timer only.
#[derive(Debug, Clone, Copy)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub subtree: bool,
    pub attributes: bool,
    pub character_data: bool,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            child_list: true,
            subtree: true,
            attributes: true,
            character_data: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

/// One batch of DOM mutations as reported by the host. The batch only marks
/// that something changed; the loop re-reads the tree through `DomSource`.
#[derive(Debug, Clone, Default)]
pub struct MutationBatch {
    pub kinds: Vec<MutationKind>,
}

/// Everything the host forwards from the page into the watch loop.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// The watched subtree changed.
    Mutations(MutationBatch),
    /// The user typed into an input-capable element.
    InputActivity,
}

pub type PageEventSender = mpsc::UnboundedSender<PageEvent>;
pub type PageEventReceiver = mpsc::UnboundedReceiver<PageEvent>;

pub fn page_event_channel() -> (PageEventSender, PageEventReceiver) {
    mpsc::unbounded_channel()
}
