use thiserror::Error;

/// Raised at evaluation entry when an intent or state snapshot is malformed.
///
/// Never raised by a rule function or the evaluator itself — by the time a
/// rule runs, its inputs have already passed construction-time validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid order intent: {0}")]
    InvalidIntent(String),

    #[error("invalid portfolio state: {0}")]
    InvalidPortfolio(String),

    #[error("invalid market snapshot: {0}")]
    InvalidMarket(String),
}
