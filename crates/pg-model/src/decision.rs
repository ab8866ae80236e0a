use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::OrderIntent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Crit,
}

/// A rule's finding that a limit was breached. `inputs`/`computed` are
/// `BTreeMap` (not `HashMap`) so their serialized key order — and thus the
/// byte-stable audit line — never depends on hash-map iteration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub inputs: BTreeMap<String, Value>,
    pub computed: BTreeMap<String, Value>,
}

/// A computed metric and the limit it is compared against, recorded for
/// every rule that can compute its metric whether or not it fired.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub metric: String,
    pub value: f64,
    pub limit: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionKind {
    Allow,
    Modify,
    Deny,
}

/// The evaluator's verdict for a single intent.
///
/// Invariant: `modified_intent.is_some() <=> decision == Modify`.
/// Enforced by construction — see [`Decision::allow`], [`Decision::deny`],
/// [`Decision::modify`] — there is no public constructor that can produce
/// an inconsistent pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: DecisionKind,
    pub intent_id: String,
    pub modified_intent: Option<OrderIntent>,
    pub violations: Vec<Violation>,
    pub evidence: Vec<Evidence>,
    pub kill_switch_triggered: bool,
}

impl Decision {
    pub fn allow(
        intent_id: impl Into<String>,
        violations: Vec<Violation>,
        evidence: Vec<Evidence>,
        kill_switch_triggered: bool,
    ) -> Self {
        Self {
            decision: DecisionKind::Allow,
            intent_id: intent_id.into(),
            modified_intent: None,
            violations,
            evidence,
            kill_switch_triggered,
        }
    }

    pub fn deny(
        intent_id: impl Into<String>,
        violations: Vec<Violation>,
        evidence: Vec<Evidence>,
        kill_switch_triggered: bool,
    ) -> Self {
        Self {
            decision: DecisionKind::Deny,
            intent_id: intent_id.into(),
            modified_intent: None,
            violations,
            evidence,
            kill_switch_triggered,
        }
    }

    pub fn modify(
        intent_id: impl Into<String>,
        modified_intent: OrderIntent,
        violations: Vec<Violation>,
        evidence: Vec<Evidence>,
        kill_switch_triggered: bool,
    ) -> Self {
        Self {
            decision: DecisionKind::Modify,
            intent_id: intent_id.into(),
            modified_intent: Some(modified_intent),
            violations,
            evidence,
            kill_switch_triggered,
        }
    }

    /// Compares two decisions the way replay determinism requires:
    /// every field, order-sensitive.
    pub fn matches(&self, other: &Decision) -> bool {
        self == other
    }
}
