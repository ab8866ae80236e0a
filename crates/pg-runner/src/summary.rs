use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Count of each verdict kind over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionCounts {
    #[serde(rename = "ALLOW")]
    pub allow: u64,
    #[serde(rename = "MODIFY")]
    pub modify: u64,
    #[serde(rename = "DENY")]
    pub deny: u64,
}

/// Aggregate statistics a `run_stream` invocation returns once the intent
/// sequence is exhausted (or the run halts on a broker exception, with
/// whatever was accumulated up to that point).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub total_intents: u64,
    pub decisions: DecisionCounts,
    pub rule_histogram: BTreeMap<String, u64>,
    pub orders_submitted: u64,
    pub orders_filled: u64,
    pub final_equity: f64,
    pub final_positions: BTreeMap<String, f64>,
    pub kill_switch_active: bool,
}

impl RunSummary {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            total_intents: 0,
            decisions: DecisionCounts::default(),
            rule_histogram: BTreeMap::new(),
            orders_submitted: 0,
            orders_filled: 0,
            final_equity: 0.0,
            final_positions: BTreeMap::new(),
            kill_switch_active: false,
        }
    }

    pub fn record_rule(&mut self, rule_id: &str) {
        *self.rule_histogram.entry(rule_id.to_string()).or_insert(0) += 1;
    }
}
