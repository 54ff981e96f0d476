// src/ingest/feeds.rs
//! Named query sets served by the dashboard news panels.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feed {
    SupplyChain,
    Hubs,
    Trade,
}

const SUPPLY_CHAIN_QUERIES: &[&str] = &[
    "supply chain disruption",
    "geopolitical risk trade",
    "red sea shipping",
    "port congestion",
    "tariff trade war",
    "critical materials shortage",
    "manufacturing production delay",
    "freight logistics",
];

const HUB_QUERIES: &[&str] = &[
    "port congestion",
    "airport cargo delays",
    "rail strike freight",
    "logistics hub disruption",
    "suez canal shipping",
    "infrastructure failure transport",
];

const TRADE_QUERIES: &[&str] = &[
    "tariffs",
    "trade war",
    "export controls",
    "sanctions trade",
    "customs import duties",
    "cobalt tungsten rare earth prices",
    "steel commodity prices",
];

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::SupplyChain, Feed::Hubs, Feed::Trade];

    pub fn from_slug(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supply-chain" => Some(Feed::SupplyChain),
            "hubs" => Some(Feed::Hubs),
            "trade" => Some(Feed::Trade),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Feed::SupplyChain => "supply-chain",
            Feed::Hubs => "hubs",
            Feed::Trade => "trade",
        }
    }

    pub fn queries(self) -> &'static [&'static str] {
        match self {
            Feed::SupplyChain => SUPPLY_CHAIN_QUERIES,
            Feed::Hubs => HUB_QUERIES,
            Feed::Trade => TRADE_QUERIES,
        }
    }

    /// Maximum articles returned for this feed.
    pub fn max_articles(self) -> usize {
        match self {
            Feed::SupplyChain => 25,
            Feed::Hubs | Feed::Trade => 20,
        }
    }
}
