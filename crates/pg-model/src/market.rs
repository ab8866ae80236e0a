use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live price snapshot. A symbol's entry is "invalid" — and will trip
/// SYS-001 — if it is missing, zero, or negative; this type does not
/// reject those values itself (market data from upstream may legitimately
/// be stale or absent), it only stores what it was given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub timestamp: DateTime<Utc>,
    pub prices: BTreeMap<String, f64>,
}

impl MarketSnapshot {
    pub fn new(timestamp: DateTime<Utc>, prices: BTreeMap<String, f64>) -> Self {
        Self { timestamp, prices }
    }

    /// `Some(price)` iff the symbol has a strictly positive quoted price.
    pub fn valid_price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied().filter(|p| *p > 0.0)
    }
}
