use chrono::{DateTime, Utc};
use pg_model::{Decision, ExecutionState, MarketSnapshot, OrderIntent, PortfolioState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One self-contained governance record: the inputs an evaluation saw plus
/// the verdict it produced. `policy_hash` pins which policy was in force;
/// `run_id` is only set for events written by the stream runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub engine_version: String,
    pub policy_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    pub intent: OrderIntent,
    pub portfolio_state: PortfolioState,
    pub market_snapshot: MarketSnapshot,
    pub execution_state: ExecutionState,
    pub decision: Decision,
}

impl AuditEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine_version: impl Into<String>,
        policy_hash: impl Into<String>,
        run_id: Option<Uuid>,
        intent: OrderIntent,
        portfolio_state: PortfolioState,
        market_snapshot: MarketSnapshot,
        execution_state: ExecutionState,
        decision: Decision,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: engine_version.into(),
            policy_hash: policy_hash.into(),
            run_id,
            intent,
            portfolio_state,
            market_snapshot,
            execution_state,
            decision,
        }
    }
}
