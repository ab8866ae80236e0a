use pg_model::InputError;
use thiserror::Error;

/// Raised when an audit event's recorded intent or portfolio state fails
/// the same validators the input path runs at evaluation entry — a sign
/// the log line was truncated or otherwise corrupted.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("audit event carries an invalid intent: {0}")]
    InvalidIntent(#[source] InputError),

    #[error("audit event carries an invalid portfolio state: {0}")]
    InvalidPortfolio(#[source] InputError),
}
