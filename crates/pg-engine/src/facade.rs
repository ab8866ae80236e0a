use std::path::Path;
use std::time::Instant;

use pg_model::{Decision, ExecutionState, MarketSnapshot, OrderIntent, PortfolioState};
use pg_policy::{CapitalPolicy, LoadedPolicy, PolicyError};

use crate::evaluator;

/// A single evaluation's verdict plus the wall-clock time the pipeline took,
/// in fractional milliseconds, for audit events that want to record `eval_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalResult {
    pub decision: Decision,
    pub eval_ms: f64,
}

/// Loads and hashes a policy once, then evaluates any number of intents
/// against it. `evaluate` is the sole entry point and is a pure function of
/// its four arguments plus the loaded policy — nothing here is mutated by
/// evaluation itself.
pub struct PolicyEngine {
    policy: CapitalPolicy,
    policy_hash: String,
}

impl PolicyEngine {
    pub fn from_bytes(source: &[u8]) -> Result<Self, PolicyError> {
        let LoadedPolicy { policy, policy_hash } = pg_policy::load_from_bytes(source)?;
        Ok(Self { policy, policy_hash })
    }

    pub fn from_str(source: &str) -> Result<Self, PolicyError> {
        Self::from_bytes(source.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let LoadedPolicy { policy, policy_hash } = pg_policy::load_from_path(path)?;
        Ok(Self { policy, policy_hash })
    }

    pub fn policy(&self) -> &CapitalPolicy {
        &self.policy
    }

    pub fn policy_hash(&self) -> &str {
        &self.policy_hash
    }

    pub fn evaluate(
        &self,
        intent: &OrderIntent,
        portfolio: &PortfolioState,
        market: &MarketSnapshot,
        execution: &ExecutionState,
    ) -> EvalResult {
        let start = Instant::now();
        let decision = evaluator::evaluate(intent, portfolio, market, execution, &self.policy);
        let eval_ms = start.elapsed().as_secs_f64() * 1_000.0;
        EvalResult { decision, eval_ms }
    }
}
