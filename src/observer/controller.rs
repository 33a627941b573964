//! Lifecycle owner for one watched region.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::WatchConfig;
use crate::dom::DomSource;
use crate::notify::Notifier;
use crate::reload;
use crate::snapshot::Snapshot;
use crate::store::SessionStore;

use super::subscription::PageEventReceiver;
use super::worker::{watch_loop, WorkerDeps};

/// Host-environment liveness probe, queried at the top of every pass. Must
/// never panic; once it reports false the watcher tears down for good.
pub trait ValidityProbe: Send + Sync {
    fn is_valid(&self) -> bool;
}

/// Probe for hosts whose context outlives the watcher.
pub struct AlwaysValid;

impl ValidityProbe for AlwaysValid {
    fn is_valid(&self) -> bool {
        true
    }
}

/// One watcher per watched region. The host wiring owns the instance and its
/// lifecycle instead of sharing global state between regions.
pub struct WatcherController {
    config: WatchConfig,
    dom: Arc<dyn DomSource>,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    probe: Arc<dyn ValidityProbe>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl WatcherController {
    pub fn new(
        config: WatchConfig,
        dom: Arc<dyn DomSource>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        probe: Arc<dyn ValidityProbe>,
    ) -> Self {
        Self {
            config,
            dom,
            store,
            notifier,
            probe,
            handle: None,
            cancel_token: None,
        }
    }

    /// Starts the watch loop over the given page events. Returns `Ok(false)`
    /// without starting anything when the watched subtree is absent, so other
    /// independent watchers keep running.
    ///
    /// Consumes any state persisted before the previous unload; the loop
    /// diffs against it once the settle delay has passed.
    pub fn start(&mut self, events: PageEventReceiver) -> Result<bool> {
        if self.handle.is_some() {
            bail!("watcher already active");
        }

        let Some(root) = self.dom.root() else {
            warn!("watched subtree not found, watcher not started");
            return Ok(false);
        };

        let baseline = Snapshot::extract(Some(&root), &self.config);
        let resumed = reload::take(self.store.as_ref());

        let cancel_token = CancellationToken::new();
        let deps = WorkerDeps {
            config: self.config.clone(),
            dom: Arc::clone(&self.dom),
            notifier: Arc::clone(&self.notifier),
            probe: Arc::clone(&self.probe),
        };
        let handle = tokio::spawn(watch_loop(
            deps,
            events,
            baseline,
            resumed,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        info!("watcher started ({} tracked stage)", self.config.tracked_stage);
        Ok(true)
    }

    /// Serializes the current snapshot for reload continuity. The host calls
    /// this from its before-unload hook; no acknowledgement is possible.
    pub fn persist_for_reload(&self) {
        let root = self.dom.root();
        let snapshot = Snapshot::extract(root.as_ref(), &self.config);
        reload::persist(self.store.as_ref(), &snapshot);
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("watch loop task failed to join")
        } else {
            Ok(())
        }
    }

    /// False once the loop has torn itself down (invalid context, failed
    /// delivery, or an explicit stop).
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}
