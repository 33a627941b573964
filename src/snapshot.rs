//! Point-in-time extraction of semantic facts from the watched subtree.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::WatchConfig;
use crate::dom::DomNode;

/// One order item as it appears in the panel at extraction time. Recomputed
/// on every extraction, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub title: Option<String>,
    pub customer_handle: Option<String>,
    pub stage: String,
    pub is_online: bool,
}

impl OrderRecord {
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Order #{}", self.order_id))
    }

    pub fn display_handle(&self) -> String {
        self.customer_handle.clone().unwrap_or_else(|| "Unknown".to_string())
    }

    /// Composite `handle|orderId` key, only for online items with a handle.
    pub fn online_key(&self) -> Option<String> {
        if !self.is_online {
            return None;
        }
        let handle = self.customer_handle.as_deref()?;
        Some(format!("{handle}|{}", self.order_id))
    }
}

/// Immutable facts captured at one instant. A fresh extraction always builds
/// a brand-new value; nothing here is updated incrementally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Every order item with an identity, any stage, document order.
    pub records: Vec<OrderRecord>,
    /// Tracked-stage identities, document order, duplicates collapsed.
    pub order_ids: Vec<String>,
    /// `handle|orderId` for currently-online customers among all stages.
    pub online_keys: Vec<String>,
    pub unread_total: u32,
    pub raw_text: String,
    /// Equals `order_ids.len()` for extracted snapshots; snapshots rebuilt
    /// from persisted reload state carry the value that was stored.
    pub auction_count: usize,
}

impl Snapshot {
    /// Extracts a snapshot from the watched subtree. Never panics: an absent
    /// root or missing attributes degrade to empty and zero values.
    pub fn extract(root: Option<&DomNode>, config: &WatchConfig) -> Snapshot {
        let Some(root) = root else {
            return Snapshot::default();
        };

        let mut records = Vec::new();
        let mut order_ids = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut online_keys = Vec::new();
        let mut seen_keys = HashSet::new();
        let mut unread_total = 0u32;

        for item in root.descendants().filter(|n| n.has_class(&config.item_class)) {
            let stage = item.attr(&config.stage_attr).unwrap_or_default();

            // Unread counters are gated on stage alone; an item can carry a
            // backlog before it carries an identity.
            if stage == config.tracked_stage {
                unread_total += unread_count(item, config);
            }

            let Some(order_id) = non_empty(item.attr(&config.id_attr)) else {
                // Without identity there is nothing else to track.
                continue;
            };

            let record = OrderRecord {
                order_id: order_id.to_string(),
                title: non_empty(item.attr(&config.title_attr)).map(str::to_string),
                customer_handle: non_empty(item.attr(&config.handle_attr)).map(str::to_string),
                stage: stage.to_string(),
                is_online: item.attr(&config.online_attr) == Some("online"),
            };

            if record.stage == config.tracked_stage && seen_ids.insert(record.order_id.clone()) {
                order_ids.push(record.order_id.clone());
            }

            if let Some(key) = record.online_key() {
                if seen_keys.insert(key.clone()) {
                    online_keys.push(key);
                }
            }

            records.push(record);
        }

        let auction_count = order_ids.len();
        Snapshot {
            records,
            order_ids,
            online_keys,
            unread_total,
            raw_text: root.inner_text(),
            auction_count,
        }
    }

    /// First record carrying the given identity, if any.
    pub fn record_for(&self, order_id: &str) -> Option<&OrderRecord> {
        self.records.iter().find(|r| r.order_id == order_id)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Parses the item's first unread-counter descendant against `\+(\d+)`.
/// No counter or no match contributes zero.
fn unread_count(item: &DomNode, config: &WatchConfig) -> u32 {
    static UNREAD_RE: OnceLock<Regex> = OnceLock::new();
    let re = UNREAD_RE.get_or_init(|| Regex::new(r"\+(\d+)").unwrap());

    let counter = item
        .descendants()
        .find(|n| n.attr("id").map(|id| id.starts_with(&config.unread_id_prefix)).unwrap_or(false));

    match counter {
        Some(node) => {
            let text = node.inner_text();
            re.captures(text.trim())
                .and_then(|caps| caps[1].parse().ok())
                .unwrap_or(0)
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, stage: &str) -> DomNode {
        DomNode::new("div")
            .with_attr("class", "messages__left_item")
            .with_attr("data-id", id)
            .with_attr("data-stage", stage)
    }

    #[test]
    fn absent_root_degrades_to_empty() {
        let snapshot = Snapshot::extract(None, &WatchConfig::default());
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn order_ids_track_only_the_configured_stage_and_collapse_duplicates() {
        let config = WatchConfig::default();
        let root = DomNode::new("div")
            .with_child(item("11", "Auction"))
            .with_child(item("12", "Draft"))
            .with_child(item("11", "Auction"))
            .with_child(item("13", "Auction"));

        let snapshot = Snapshot::extract(Some(&root), &config);
        assert_eq!(snapshot.order_ids, ["11", "13"]);
        assert_eq!(snapshot.auction_count, 2);
        // Records keep every identified item regardless of stage.
        assert_eq!(snapshot.records.len(), 4);
    }

    #[test]
    fn online_keys_require_online_status_and_a_handle() {
        let config = WatchConfig::default();
        let root = DomNode::new("div")
            .with_child(
                item("21", "Draft")
                    .with_attr("data-online", "online")
                    .with_attr("data-cutomer_nick_name", "alice"),
            )
            // Online but no handle: skipped silently.
            .with_child(item("22", "Auction").with_attr("data-online", "online"))
            // Handle but offline: skipped.
            .with_child(item("23", "Auction").with_attr("data-cutomer_nick_name", "bob"));

        let snapshot = Snapshot::extract(Some(&root), &config);
        assert_eq!(snapshot.online_keys, ["alice|21"]);
    }

    #[test]
    fn unread_totals_sum_over_tracked_items_only() {
        let config = WatchConfig::default();
        let counter = |text: &str| {
            DomNode::new("span")
                .with_attr("id", "unreadMessageCnt_x")
                .with_text(text)
        };
        let root = DomNode::new("div")
            .with_child(item("31", "Auction").with_child(counter("+3")))
            .with_child(item("32", "Auction").with_child(counter("no digits")))
            .with_child(item("33", "Draft").with_child(counter("+9")));

        let snapshot = Snapshot::extract(Some(&root), &config);
        assert_eq!(snapshot.unread_total, 3);
    }

    #[test]
    fn items_without_an_id_are_skipped_for_identity() {
        let config = WatchConfig::default();
        let root = DomNode::new("div").with_child(
            DomNode::new("div")
                .with_attr("class", "messages__left_item")
                .with_attr("data-stage", "Auction"),
        );

        let snapshot = Snapshot::extract(Some(&root), &config);
        assert!(snapshot.records.is_empty());
        assert!(snapshot.order_ids.is_empty());
    }

    #[test]
    fn unread_counters_count_even_without_an_id() {
        let config = WatchConfig::default();
        let anonymous = DomNode::new("div")
            .with_attr("class", "messages__left_item")
            .with_attr("data-stage", "Auction")
            .with_child(
                DomNode::new("span")
                    .with_attr("id", "unreadMessageCnt_x")
                    .with_text("+5"),
            );
        let root = DomNode::new("div").with_child(anonymous);

        let snapshot = Snapshot::extract(Some(&root), &config);
        assert_eq!(snapshot.unread_total, 5);
        assert!(snapshot.records.is_empty());
    }
}
