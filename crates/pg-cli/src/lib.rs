//! Shared plumbing for the `policygate-eval` and `policygate-run` binaries:
//! tracing init, JSON/YAML input loading, and the broker factory behind
//! `--broker sim|alpaca|tradier`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use pg_broker::{Broker, SimBroker};
use pg_model::MarketSnapshot;
use serde::de::DeserializeOwned;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Reads and deserializes a JSON file. Used for `--portfolio`,
/// `--market`, `--execution`, and (for `policygate-eval`) `--intent`.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {} as JSON", path.display()))
}

/// Reads a JSONL file of intents, one `OrderIntent` per non-empty line.
pub fn load_intents_jsonl(path: impl AsRef<Path>) -> Result<Vec<pg_model::OrderIntent>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    raw.lines()
        .filter(|l| !l.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("parsing intent at {}:{}", path.display(), i + 1))
        })
        .collect()
}

/// `--broker sim|alpaca|tradier`. Only `sim` resolves to a concrete
/// in-process broker here; the real venue adapters are out of tree and
/// this factory reports that plainly rather than pretending to support
/// them.
pub fn build_broker(kind: &str, market: &MarketSnapshot) -> Result<Box<dyn Broker>> {
    match kind {
        "sim" => Ok(Box::new(SimBroker::new(market.prices.clone()))),
        "alpaca" | "tradier" => bail!(
            "broker \"{kind}\" requires an out-of-tree adapter crate; only \"sim\" is wired into policygate-run"
        ),
        other => bail!("unknown broker \"{other}\", expected sim|alpaca|tradier"),
    }
}
