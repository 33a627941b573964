//! Runs the watcher against a synthetic panel and logs what it notifies.
//!
//! `RUST_LOG=info cargo run --bin watch_demo`

use std::sync::Arc;
use std::time::Duration;

use bidwatch::{
    page_event_channel, AlwaysValid, CueNotifier, DomNode, LogNotifier, MemorySessionStore,
    MutationBatch, MutationKind, NotificationCue, ObserveOptions, PageEvent, SharedDom,
    WatchConfig, WatcherController,
};

fn mutations(kinds: Vec<MutationKind>) -> PageEvent {
    PageEvent::Mutations(MutationBatch { kinds })
}

fn order_item(id: &str, title: &str, handle: &str) -> DomNode {
    DomNode::new("div")
        .with_attr("class", "messages__left_item")
        .with_attr("data-id", id)
        .with_attr("data-stage", "Auction")
        .with_attr("data-title", title)
        .with_attr("data-cutomer_nick_name", handle)
        .with_text(title)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let panel = DomNode::new("div")
        .with_attr("class", "messages__left")
        .with_child(order_item("101", "Essay on ownership", "alice"));

    let dom = SharedDom::new(Some(panel));
    let store = Arc::new(MemorySessionStore::new());
    let (page_tx, page_rx) = page_event_channel();

    // What a real host would hand its mutation observer for this panel.
    let observe = ObserveOptions::default();
    log::info!("host observer registered with {observe:?}");

    let cue = NotificationCue::new();

    let config = WatchConfig {
        settle_delay: Duration::from_millis(200),
        ..WatchConfig::default()
    };

    let mut watcher = WatcherController::new(
        config.clone(),
        Arc::new(dom.clone()),
        store.clone(),
        Arc::new(CueNotifier::new(Box::new(LogNotifier), cue.clone())),
        Arc::new(AlwaysValid),
    );
    if !watcher.start(page_rx)? {
        anyhow::bail!("demo panel missing");
    }

    // A new auction shows up.
    tokio::time::sleep(Duration::from_millis(300)).await;
    dom.update(|root| root.push_child(order_item("102", "Data pipeline review", "bob")));
    page_tx.send(mutations(vec![MutationKind::ChildList]))?;

    // Its customer comes online a moment later.
    tokio::time::sleep(Duration::from_secs(1)).await;
    dom.update(|root| {
        if let Some(item) = root.find_descendant_mut(|n| n.attr("data-id") == Some("102")) {
            item.set_attr("data-online", "online");
        }
    });
    page_tx.send(mutations(vec![MutationKind::Attributes]))?;

    // Simulated reload: persist, tear down, change the page, start over.
    tokio::time::sleep(Duration::from_secs(1)).await;
    watcher.persist_for_reload();
    watcher.stop().await?;

    dom.update(|root| root.push_child(order_item("103", "Compiler homework", "carol")));

    let (_page_tx2, page_rx2) = page_event_channel();
    let mut watcher = WatcherController::new(
        config,
        Arc::new(dom.clone()),
        store,
        Arc::new(CueNotifier::new(Box::new(LogNotifier), cue)),
        Arc::new(AlwaysValid),
    );
    watcher.start(page_rx2)?;

    tokio::time::sleep(Duration::from_secs(1)).await;
    watcher.stop().await?;
    Ok(())
}
