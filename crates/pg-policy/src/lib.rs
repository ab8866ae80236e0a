//! Policy model, strict schema validation, loading/hashing, and override
//! resolution.

mod error;
mod loader;
mod policy;

pub use error::PolicyError;
pub use loader::{load_from_bytes, load_from_path, load_from_str, LoadedPolicy};
pub use policy::{
    resolve, CapitalPolicy, DefaultDecision, Defaults, EffectiveLimits, ExecutionLimits,
    ExposureLimits, KillSwitchLimits, Limits, LossLimits, Mode, Overrides, PartialLimits,
};
