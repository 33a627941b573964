use std::time::Duration;

/// Matching rules and timing for one watched region.
///
/// All rules are compiled in; there is no runtime configuration surface.
/// Hosts watching a differently-shaped panel construct their own value.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Class carried by every order item inside the panel.
    pub item_class: String,
    /// Stage whose items count toward order identity. Items in other stages
    /// are ignored for identity but still scanned for online status.
    pub tracked_stage: String,
    pub id_attr: String,
    pub stage_attr: String,
    pub online_attr: String,
    /// The site misspells this attribute; the default matches what it serves.
    pub handle_attr: String,
    pub title_attr: String,
    /// Unread counters are descendants whose id starts with this prefix.
    pub unread_id_prefix: String,
    /// Safety-net check for changes the mutation signal can miss.
    pub periodic_interval: Duration,
    /// Trailing debounce coalescing rapid mutation bursts.
    pub mutation_debounce: Duration,
    /// How long after the last keystroke the typing guard stays up.
    pub typing_idle: Duration,
    /// Wait after a reload before trusting the DOM enough to extract.
    pub settle_delay: Duration,
    /// Raw-text growth at or below this many chars is formatting churn.
    pub growth_threshold: usize,
    /// Lower-case keywords searched in newly grown text, first match wins.
    pub keywords: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            item_class: "messages__left_item".into(),
            tracked_stage: "Auction".into(),
            id_attr: "data-id".into(),
            stage_attr: "data-stage".into(),
            online_attr: "data-online".into(),
            handle_attr: "data-cutomer_nick_name".into(),
            title_attr: "data-title".into(),
            unread_id_prefix: "unreadMessageCnt_".into(),
            periodic_interval: Duration::from_secs(30),
            mutation_debounce: Duration::from_millis(500),
            typing_idle: Duration::from_secs(2),
            settle_delay: Duration::from_secs(1),
            growth_threshold: 20,
            keywords: vec![
                "auction".into(),
                "bid".into(),
                "offer".into(),
                "proposal".into(),
                "quote".into(),
                "deadline".into(),
            ],
        }
    }
}
