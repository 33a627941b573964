//! Pure comparison of two snapshots.
//!
//! Evaluation order mirrors priority: new orders and new online customers are
//! orthogonal and both evaluated, but if either fired the coarse fallback
//! checks are skipped for this pass so one underlying DOM change is not
//! reported twice.

use std::collections::HashSet;

use crate::config::WatchConfig;
use crate::events::{ChangeEvent, OnlineEntry};
use crate::snapshot::Snapshot;

pub fn diff(previous: &Snapshot, current: &Snapshot, config: &WatchConfig) -> Vec<ChangeEvent> {
    let mut events = Vec::new();

    let prev_ids: HashSet<&str> = previous.order_ids.iter().map(String::as_str).collect();
    let new_ids: Vec<String> = current
        .order_ids
        .iter()
        .filter(|id| !prev_ids.contains(id.as_str()))
        .cloned()
        .collect();
    if !new_ids.is_empty() {
        let details = new_ids
            .iter()
            .filter_map(|id| current.record_for(id))
            .cloned()
            .collect();
        events.push(ChangeEvent::NewOrders {
            ids: new_ids,
            details,
        });
    }

    let prev_keys: HashSet<&str> = previous.online_keys.iter().map(String::as_str).collect();
    let entries: Vec<OnlineEntry> = current
        .online_keys
        .iter()
        .filter(|key| !prev_keys.contains(key.as_str()))
        .map(|key| online_entry(key, current))
        .collect();
    if !entries.is_empty() {
        events.push(ChangeEvent::NewOnlineUsers { entries });
    }

    if !events.is_empty() {
        return events;
    }

    if current.auction_count > previous.auction_count {
        return vec![ChangeEvent::NewAuctionCount {
            delta: current.auction_count - previous.auction_count,
        }];
    }

    // Deliberately level-triggered: checks presence, not delta, so a standing
    // backlog re-fires on every pass until it clears.
    if current.unread_total > 0 {
        return vec![ChangeEvent::UnreadMessages {
            count: current.unread_total,
        }];
    }

    if let Some(keyword) = keyword_in_growth(previous, current, config) {
        return vec![ChangeEvent::GenericActivity { keyword }];
    }

    Vec::new()
}

fn online_entry(key: &str, current: &Snapshot) -> OnlineEntry {
    let (handle, order_id) = key.split_once('|').unwrap_or((key, ""));
    let title = current
        .record_for(order_id)
        .and_then(|r| r.title.clone())
        .unwrap_or_else(|| "Unknown Order".to_string());
    OnlineEntry {
        handle: handle.to_string(),
        order_id: order_id.to_string(),
        title,
    }
}

/// First configured keyword found in the lower-cased suffix that `current`
/// grew beyond `previous`, provided the growth clears the churn threshold.
fn keyword_in_growth(
    previous: &Snapshot,
    current: &Snapshot,
    config: &WatchConfig,
) -> Option<String> {
    let prev_len = previous.raw_text.chars().count();
    let curr_len = current.raw_text.chars().count();
    if curr_len <= prev_len + config.growth_threshold {
        return None;
    }
    let suffix: String = current
        .raw_text
        .chars()
        .skip(prev_len)
        .collect::<String>()
        .to_lowercase();
    config
        .keywords
        .iter()
        .find(|keyword| suffix.contains(keyword.as_str()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::OrderRecord;

    fn record(id: &str, stage: &str, online: Option<&str>) -> OrderRecord {
        OrderRecord {
            order_id: id.to_string(),
            title: Some(format!("Project {id}")),
            customer_handle: online.map(str::to_string),
            stage: stage.to_string(),
            is_online: online.is_some(),
        }
    }

    fn snapshot(ids: &[&str], online: &[&str], unread: u32, text: &str) -> Snapshot {
        Snapshot {
            records: ids.iter().map(|id| record(id, "Auction", None)).collect(),
            order_ids: ids.iter().map(|id| id.to_string()).collect(),
            online_keys: online.iter().map(|k| k.to_string()).collect(),
            unread_total: unread,
            raw_text: text.to_string(),
            auction_count: ids.len(),
        }
    }

    #[test]
    fn identical_snapshots_without_backlog_yield_nothing() {
        let config = WatchConfig::default();
        let s = snapshot(&["1", "2"], &["alice|1"], 0, "Order #1 Order #2");
        assert!(diff(&s, &s, &config).is_empty());
    }

    #[test]
    fn new_orders_keep_document_order_and_carry_details() {
        let config = WatchConfig::default();
        let prev = snapshot(&["2"], &[], 0, "");
        let curr = snapshot(&["5", "2", "3"], &[], 0, "");

        let events = diff(&prev, &curr, &config);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ChangeEvent::NewOrders { ids, details } => {
                assert_eq!(ids, &["5", "3"]);
                assert_eq!(details[0].title.as_deref(), Some("Project 5"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn orders_and_online_are_orthogonal_and_suppress_fallbacks() {
        let config = WatchConfig::default();
        let prev = snapshot(&["1"], &[], 0, "short");
        // Backlog and grown keyword text present, but both fallbacks must be
        // suppressed because higher-priority detections fired.
        let mut curr = snapshot(
            &["1", "2"],
            &["bob|1"],
            4,
            "short plus a much longer tail mentioning a new bid",
        );
        curr.records.push(record("1", "Auction", Some("bob")));

        let events = diff(&prev, &curr, &config);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ChangeEvent::NewOrders { .. }));
        assert!(matches!(events[1], ChangeEvent::NewOnlineUsers { .. }));
    }

    #[test]
    fn online_entries_resolve_titles_from_current_records() {
        let config = WatchConfig::default();
        let prev = snapshot(&["1"], &[], 0, "");
        let mut curr = snapshot(&["1"], &["bob|1", "eve|99"], 0, "");
        curr.records.push(record("1", "Auction", Some("bob")));

        let events = diff(&prev, &curr, &config);
        match &events[0] {
            ChangeEvent::NewOnlineUsers { entries } => {
                assert_eq!(entries[0].title, "Project 1");
                // No record for order 99: placeholder title.
                assert_eq!(entries[1].title, "Unknown Order");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn auction_count_fallback_fires_only_without_new_ids() {
        let config = WatchConfig::default();
        let prev = snapshot(&["1"], &[], 0, "");
        let mut curr = snapshot(&["1"], &[], 0, "");
        curr.auction_count = 3;

        assert_eq!(
            diff(&prev, &curr, &config),
            [ChangeEvent::NewAuctionCount { delta: 2 }]
        );
    }

    #[test]
    fn unread_backlog_is_level_triggered_across_passes() {
        let config = WatchConfig::default();
        let prev = snapshot(&["1"], &[], 3, "");
        let curr = snapshot(&["1"], &[], 3, "");

        // Two consecutive passes with an unchanged backlog of 3 must both
        // fire; this is intentional nagging, not a missing deduplication.
        let first = diff(&prev, &curr, &config);
        let second = diff(&curr, &curr, &config);
        assert_eq!(first, [ChangeEvent::UnreadMessages { count: 3 }]);
        assert_eq!(second, first);
    }

    #[test]
    fn generic_activity_needs_both_growth_and_a_keyword() {
        let config = WatchConfig::default();
        let prev = snapshot(&["1"], &[], 0, "Order #1");

        let grown_with_keyword = snapshot(&["1"], &[], 0, "Order #1 - new BID posted on the item");
        assert_eq!(
            diff(&prev, &grown_with_keyword, &config),
            [ChangeEvent::GenericActivity {
                keyword: "bid".to_string()
            }]
        );

        let grown_without_keyword =
            snapshot(&["1"], &[], 0, "Order #1 followed by harmless padding text");
        assert!(diff(&prev, &grown_without_keyword, &config).is_empty());

        // Keyword present but growth under the churn threshold.
        let barely_grown = snapshot(&["1"], &[], 0, "Order #1 bid now");
        assert!(diff(&prev, &barely_grown, &config).is_empty());
    }
}
