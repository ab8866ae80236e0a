use pg_audit::AuditEvent;
use pg_engine::PolicyEngine;
use pg_model::Decision;

use crate::error::ReplayError;

/// The two decisions replay compares: the one the audit log already
/// carries, and the one freshly produced by re-evaluating the event's
/// recorded inputs against `engine`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayOutcome {
    pub original_decision: Decision,
    pub replayed_decision: Decision,
    /// `false` means the event was recorded under a different policy than
    /// `engine` is currently loaded with — a mismatch here, not an engine
    /// regression, is the likely explanation for a failed replay.
    pub policy_hash_matches: bool,
}

impl ReplayOutcome {
    pub fn matches(&self) -> bool {
        decisions_match(&self.original_decision, &self.replayed_decision)
    }
}

/// Reconstructs `intent`/`portfolio_state`/`market_snapshot`/`execution_state`
/// from `event` via the same model validators the input path runs, then
/// calls `PolicyEngine::evaluate` and pairs the result with the decision
/// already on record.
pub fn replay_event(event: &AuditEvent, engine: &PolicyEngine) -> Result<ReplayOutcome, ReplayError> {
    event
        .intent
        .validate()
        .map_err(ReplayError::InvalidIntent)?;
    event
        .portfolio_state
        .validate()
        .map_err(ReplayError::InvalidPortfolio)?;

    let result = engine.evaluate(
        &event.intent,
        &event.portfolio_state,
        &event.market_snapshot,
        &event.execution_state,
    );

    Ok(ReplayOutcome {
        original_decision: event.decision.clone(),
        replayed_decision: result.decision,
        policy_hash_matches: event.policy_hash == engine.policy_hash(),
    })
}

/// Full, order-sensitive equality of `decision`, `intent_id`, `violations`
/// (every field of every entry), `kill_switch_triggered`, and
/// `modified_intent`.
pub fn decisions_match(a: &Decision, b: &Decision) -> bool {
    a == b
}
