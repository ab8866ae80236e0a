//! Pure rule functions. Each rule is `(inputs) -> (Option<Violation>, Option<Evidence>)`
//! and never mutates anything it's given — except `sys_001`, which returns
//! `Result<f64, Violation>` so the valid price it confirms can be threaded
//! straight into the rules after it without re-deriving or assuming it. The
//! fixed evaluation order and the MODIFY/monitor-mode composition logic live
//! in `pg-engine`, not here — these functions know nothing about each other
//! or about verdict composition.

mod ids;
mod rules;

pub use ids::RuleId;
pub use rules::{
    exec_001, exec_002, exp_001, exp_002, exp_003, kill_001, loss_001, loss_002, sys_001,
    Exp001Outcome,
};
