//! Data model for PolicyGate Capital: intents, portfolio/market/execution
//! state, and the Decision/Violation/Evidence types the evaluator produces.
//!
//! Every constructor validates its invariants and returns `InputError` on
//! a malformed value — rule functions and the evaluator never see bad data.

mod decision;
mod error;
mod execution_state;
mod intent;
mod market;
mod portfolio;

pub use decision::{Decision, DecisionKind, Evidence, Severity, Violation};
pub use error::InputError;
pub use execution_state::{ExecutionState, ViolationRecord};
pub use intent::{AssetClass, Instrument, OrderIntent, OrderType, Side};
pub use market::MarketSnapshot;
pub use portfolio::PortfolioState;
