use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::PolicyError;
use crate::policy::CapitalPolicy;

/// A policy plus the SHA-256 hex digest of the exact source bytes it was
/// parsed from. `policy_hash` is what audit events pin so an operator can
/// tell, after the fact, which policy was in force.
#[derive(Debug, Clone)]
pub struct LoadedPolicy {
    pub policy: CapitalPolicy,
    pub policy_hash: String,
}

pub fn load_from_bytes(source: &[u8]) -> Result<LoadedPolicy, PolicyError> {
    let policy: CapitalPolicy = serde_yaml::from_slice(source)?;
    policy.validate()?;

    let mut hasher = Sha256::new();
    hasher.update(source);
    let policy_hash = hex::encode(hasher.finalize());

    Ok(LoadedPolicy {
        policy,
        policy_hash,
    })
}

pub fn load_from_str(source: &str) -> Result<LoadedPolicy, PolicyError> {
    load_from_bytes(source.as_bytes())
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<LoadedPolicy, PolicyError> {
    let bytes = fs::read(path.as_ref())?;
    load_from_bytes(&bytes)
}
