use thiserror::Error;

/// The stream runner's only failure modes: a broker exception (fail-loud,
/// no retry — the partial audit log is left intact) or an I/O failure
/// writing one of the two event logs.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("audit log write failed: {0}")]
    Audit(#[from] pg_audit::AuditError),

    #[error("exec log write failed: {0}")]
    ExecLog(#[from] std::io::Error),

    #[error("broker error: {0}")]
    Broker(#[source] Box<dyn std::error::Error + Send + Sync>),
}
