//! The watch loop: reacts to page events, the periodic safety-net tick, and
//! the trailing debounce, running the extract → diff → notify pipeline.
//!
//! Each pass runs to completion without awaiting, so passes never interleave
//! and the snapshot swap needs no synchronization.

use std::sync::Arc;
use std::time::{Duration, Instant as StdInstant};

use anyhow::Result;
use log::{debug, info, warn};
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::WatchConfig;
use crate::diff::diff;
use crate::dom::DomSource;
use crate::events::EventOrigin;
use crate::notify::Notifier;
use crate::reload::PersistedWatchState;
use crate::snapshot::Snapshot;
use crate::state::TrackedState;

use super::controller::ValidityProbe;
use super::subscription::{PageEvent, PageEventReceiver};

pub(super) struct WorkerDeps {
    pub config: WatchConfig,
    pub dom: Arc<dyn DomSource>,
    pub notifier: Arc<dyn Notifier>,
    pub probe: Arc<dyn ValidityProbe>,
}

pub(super) async fn watch_loop(
    deps: WorkerDeps,
    mut events: PageEventReceiver,
    baseline: Snapshot,
    resumed: Option<PersistedWatchState>,
    cancel: CancellationToken,
) {
    let mut state = TrackedState::new(baseline);

    // Reload continuity: let the freshly loaded page settle, then diff the
    // current DOM against what was persisted before the unload. The fresh
    // snapshot becomes the baseline either way, so the live loop does not
    // re-detect the same changes.
    if let Some(persisted) = resumed {
        tokio::select! {
            _ = tokio::time::sleep(deps.config.settle_delay) => {
                let previous = persisted.into_snapshot();
                if run_pass(&deps, &mut state, Some(&previous), EventOrigin::AfterRefresh).is_err() {
                    return;
                }
            }
            _ = cancel.cancelled() => return,
        }
    }

    let mut ticker = interval_at(
        Instant::now() + deps.config.periodic_interval,
        deps.config.periodic_interval,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let debounce = sleep_until(far_future());
    tokio::pin!(debounce);
    let mut debounce_armed = false;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("watch loop shutting down");
                break;
            }
            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    info!("page event channel closed, watch loop stopping");
                    break;
                };
                if !deps.probe.is_valid() {
                    warn!("host context invalidated, watch loop stopping");
                    break;
                }
                match event {
                    PageEvent::InputActivity => {
                        state.typing.note_activity(StdInstant::now(), deps.config.typing_idle);
                    }
                    PageEvent::Mutations(batch) => {
                        debug!("mutation batch with {} change records", batch.kinds.len());
                        // Mutations during composition are dropped outright,
                        // not queued; the baseline must not drift while the
                        // panel echoes the user's own draft.
                        if state.typing.is_active(StdInstant::now()) {
                            continue;
                        }
                        debounce.as_mut().reset(Instant::now() + deps.config.mutation_debounce);
                        debounce_armed = true;
                    }
                }
            }
            _ = &mut debounce, if debounce_armed => {
                debounce_armed = false;
                if !deps.probe.is_valid() {
                    warn!("host context invalidated, watch loop stopping");
                    break;
                }
                if state.typing.is_active(StdInstant::now()) {
                    continue;
                }
                if run_pass(&deps, &mut state, None, EventOrigin::Live).is_err() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if !deps.probe.is_valid() {
                    warn!("host context invalidated, watch loop stopping");
                    break;
                }
                if state.typing.is_active(StdInstant::now()) {
                    continue;
                }
                // Safety net for changes the mutation signal can miss, e.g.
                // attribute flips outside the requested change kinds.
                if run_pass(&deps, &mut state, None, EventOrigin::Live).is_err() {
                    break;
                }
            }
        }
    }
}

/// One synchronous pipeline pass. An error means delivery failed and the
/// caller must tear down; the pipeline itself never fails.
fn run_pass(
    deps: &WorkerDeps,
    state: &mut TrackedState,
    previous_override: Option<&Snapshot>,
    origin: EventOrigin,
) -> Result<()> {
    let root = deps.dom.root();
    let current = Snapshot::extract(root.as_ref(), &deps.config);

    let events = {
        let previous = previous_override.unwrap_or_else(|| state.current());
        diff(previous, &current, &deps.config)
    };

    for event in &events {
        let text = event.render(origin);
        if let Err(err) = deps.notifier.emit(&text) {
            warn!("notification delivery failed, tearing down: {err:#}");
            return Err(err);
        }
    }

    state.swap(current);
    Ok(())
}

fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(60 * 60 * 24 * 365)
}
