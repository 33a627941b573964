//! Carries the last-seen snapshot across a page reload.
//!
//! Pre-unload the host calls [`persist`] (fire-and-forget, the page is about
//! to be torn down). On the next load [`take`] consumes the stored fields at
//! most once; the watch loop then waits out the settle delay before diffing a
//! fresh extraction against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;
use crate::store::{read_json, write_json, SessionStore};

pub const RELOAD_STATE_KEY: &str = "bidwatch.preReloadState";

/// Continuity-relevant snapshot fields in their JSON-encoded form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedWatchState {
    pub order_ids: Vec<String>,
    pub online_keys: Vec<String>,
    pub auction_count: usize,
    pub raw_text: String,
    pub saved_at: DateTime<Utc>,
}

impl PersistedWatchState {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            order_ids: snapshot.order_ids.clone(),
            online_keys: snapshot.online_keys.clone(),
            auction_count: snapshot.auction_count,
            raw_text: snapshot.raw_text.clone(),
            saved_at: Utc::now(),
        }
    }

    /// Rebuilds a diffable "previous" snapshot. Records and unread totals are
    /// not persisted; they come out empty, which the diff tolerates.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            records: Vec::new(),
            order_ids: self.order_ids,
            online_keys: self.online_keys,
            unread_total: 0,
            raw_text: self.raw_text,
            auction_count: self.auction_count,
        }
    }
}

pub fn persist(store: &dyn SessionStore, snapshot: &Snapshot) {
    write_json(store, RELOAD_STATE_KEY, &PersistedWatchState::from_snapshot(snapshot));
}

/// Reads and deletes the persisted state. Deletion happens even when decoding
/// fails, so a second load never re-processes stale data.
pub fn take(store: &dyn SessionStore) -> Option<PersistedWatchState> {
    let was_present = store.get(RELOAD_STATE_KEY).is_some();
    let state = read_json(store, RELOAD_STATE_KEY);
    if was_present {
        store.remove(RELOAD_STATE_KEY);
    }
    state
}
