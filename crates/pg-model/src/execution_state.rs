use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One fired violation recorded for the sliding kill-switch window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub rule_id: String,
    pub timestamp_epoch_seconds: i64,
}

/// Execution/rate-limit and kill-switch state the stream runner evolves
/// between intents. The evaluator only reads this; only the runner mutates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub orders_last_minute_global: u32,
    pub orders_last_minute_by_strategy: BTreeMap<String, u32>,
    pub violations_in_window: Vec<ViolationRecord>,
    pub kill_switch_active: bool,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self {
            orders_last_minute_global: 0,
            orders_last_minute_by_strategy: BTreeMap::new(),
            violations_in_window: Vec::new(),
            kill_switch_active: false,
        }
    }

    pub fn orders_last_minute_for(&self, strategy_id: &str) -> u32 {
        self.orders_last_minute_by_strategy
            .get(strategy_id)
            .copied()
            .unwrap_or(0)
    }

    /// Append a fired violation and evict entries older than the window,
    /// relative to `now`.
    pub fn record_violation(&mut self, rule_id: &str, now_epoch_seconds: i64, window_seconds: i64) {
        self.violations_in_window.push(ViolationRecord {
            rule_id: rule_id.to_string(),
            timestamp_epoch_seconds: now_epoch_seconds,
        });
        self.evict_before(now_epoch_seconds - window_seconds);
    }

    pub fn evict_before(&mut self, cutoff_epoch_seconds: i64) {
        self.violations_in_window
            .retain(|v| v.timestamp_epoch_seconds >= cutoff_epoch_seconds);
    }
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self::new()
    }
}
