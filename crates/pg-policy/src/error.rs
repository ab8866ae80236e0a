use thiserror::Error;

/// Raised only at policy load time — never once the engine starts evaluating.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy source: {0}")]
    Io(#[from] std::io::Error),

    #[error("policy is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("policy version must be \"0.1\", got {0:?}")]
    BadVersion(String),

    #[error("policy timezone must be \"UTC\", got {0:?}")]
    BadTimezone(String),

    #[error("{field} out of range: {detail}")]
    OutOfRange { field: String, detail: String },
}
