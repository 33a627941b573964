//! Semantic events and their notification text.
//!
//! Events are transient: rendered to text, handed to the notifier, dropped.
//! The payload stays complete even where rendering only names the first item.

use crate::snapshot::OrderRecord;

/// A customer that newly came online, with enough context for the message.
#[derive(Debug, Clone, PartialEq)]
pub struct OnlineEntry {
    pub handle: String,
    pub order_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    NewOrders {
        ids: Vec<String>,
        details: Vec<OrderRecord>,
    },
    NewOnlineUsers {
        entries: Vec<OnlineEntry>,
    },
    /// Fallback when identity extraction found no new ids but the tracked
    /// count still grew.
    NewAuctionCount {
        delta: usize,
    },
    /// Level-triggered: re-fires on every pass while the backlog is nonzero.
    UnreadMessages {
        count: u32,
    },
    GenericActivity {
        keyword: String,
    },
}

/// Whether the diff ran live or against a snapshot persisted before a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    Live,
    AfterRefresh,
}

impl EventOrigin {
    fn suffix(self) -> &'static str {
        match self {
            EventOrigin::Live => "",
            EventOrigin::AfterRefresh => " after refresh",
        }
    }
}

impl ChangeEvent {
    pub fn render(&self, origin: EventOrigin) -> String {
        match self {
            ChangeEvent::NewOrders { ids, details } => {
                let plural = if ids.len() > 1 { "S" } else { "" };
                let mut text = match origin {
                    EventOrigin::Live => format!("🔥 {} NEW AUCTION{plural}!", ids.len()),
                    EventOrigin::AfterRefresh => {
                        format!("🔥 {} NEW AUCTION{plural} after refresh!", ids.len())
                    }
                };
                if let Some(first) = details.first() {
                    text.push_str(&format!(
                        " #{} \"{}\" from {}",
                        first.order_id,
                        first.display_title(),
                        first.display_handle()
                    ));
                }
                if ids.len() > 1 {
                    text.push_str(&format!(" (+{} more)", ids.len() - 1));
                }
                text
            }
            ChangeEvent::NewOnlineUsers { entries } => {
                let lead = match origin {
                    EventOrigin::Live => "🟢 CUSTOMER ONLINE",
                    EventOrigin::AfterRefresh => "🟢 CUSTOMER CAME ONLINE",
                };
                let mut text = match entries.first() {
                    Some(first) => format!(
                        "{lead}: {} (#{} - \"{}\") - Engage now!",
                        first.handle, first.order_id, first.title
                    ),
                    None => format!("{lead}!"),
                };
                if entries.len() > 1 {
                    text.push_str(&format!(" (+{} more)", entries.len() - 1));
                }
                text
            }
            ChangeEvent::NewAuctionCount { delta } => {
                let plural = if *delta > 1 { "S" } else { "" };
                format!(
                    "🔥 {delta} NEW AUCTION{plural} AVAILABLE{}!",
                    origin.suffix()
                )
            }
            ChangeEvent::UnreadMessages { count } => {
                let plural = if *count > 1 { "s" } else { "" };
                format!(
                    "💬 {count} unread auction message{plural}{}!",
                    origin.suffix()
                )
            }
            ChangeEvent::GenericActivity { .. } => {
                format!("🎯 New auction-related activity detected{}!", origin.suffix())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: Option<&str>, handle: Option<&str>) -> OrderRecord {
        OrderRecord {
            order_id: id.to_string(),
            title: title.map(str::to_string),
            customer_handle: handle.map(str::to_string),
            stage: "Auction".to_string(),
            is_online: false,
        }
    }

    #[test]
    fn new_orders_name_the_first_and_summarize_the_rest() {
        let event = ChangeEvent::NewOrders {
            ids: vec!["7".into(), "8".into(), "9".into()],
            details: vec![record("7", Some("Essay"), Some("carol"))],
        };
        assert_eq!(
            event.render(EventOrigin::Live),
            "🔥 3 NEW AUCTIONS! #7 \"Essay\" from carol (+2 more)"
        );
    }

    #[test]
    fn after_refresh_phrasing_is_distinguishable() {
        let event = ChangeEvent::NewOrders {
            ids: vec!["7".into()],
            details: vec![record("7", None, None)],
        };
        assert_eq!(
            event.render(EventOrigin::AfterRefresh),
            "🔥 1 NEW AUCTION after refresh! #7 \"Order #7\" from Unknown"
        );
    }

    #[test]
    fn online_render_varies_by_origin() {
        let event = ChangeEvent::NewOnlineUsers {
            entries: vec![OnlineEntry {
                handle: "dave".into(),
                order_id: "4".into(),
                title: "Slides".into(),
            }],
        };
        assert_eq!(
            event.render(EventOrigin::Live),
            "🟢 CUSTOMER ONLINE: dave (#4 - \"Slides\") - Engage now!"
        );
        assert_eq!(
            event.render(EventOrigin::AfterRefresh),
            "🟢 CUSTOMER CAME ONLINE: dave (#4 - \"Slides\") - Engage now!"
        );
    }

    #[test]
    fn fallback_events_carry_after_refresh_phrasing() {
        assert_eq!(
            ChangeEvent::UnreadMessages { count: 3 }.render(EventOrigin::AfterRefresh),
            "💬 3 unread auction messages after refresh!"
        );
        assert_eq!(
            ChangeEvent::NewAuctionCount { delta: 1 }.render(EventOrigin::AfterRefresh),
            "🔥 1 NEW AUCTION AVAILABLE after refresh!"
        );
        assert_eq!(
            ChangeEvent::GenericActivity {
                keyword: "bid".to_string()
            }
            .render(EventOrigin::AfterRefresh),
            "🎯 New auction-related activity detected after refresh!"
        );
    }

    #[test]
    fn counts_pluralize() {
        assert_eq!(
            ChangeEvent::UnreadMessages { count: 1 }.render(EventOrigin::Live),
            "💬 1 unread auction message!"
        );
        assert_eq!(
            ChangeEvent::NewAuctionCount { delta: 2 }.render(EventOrigin::Live),
            "🔥 2 NEW AUCTIONS AVAILABLE!"
        );
    }
}
