//! Replay a recorded [`AuditEvent`] through the current engine and compare
//! the fresh decision against the one the log already carries.
//!
//! This is the determinism backstop: a non-matching replay means one of
//! policy drift (compare `policy_hash`), an engine regression, or a
//! corrupted log line — never a flaw in the replay machinery itself, since
//! replay does nothing but re-run the exact same pure function.

mod error;
mod outcome;

pub use error::ReplayError;
pub use outcome::{decisions_match, replay_event, ReplayOutcome};
