use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pg_model::{OrderType, Side};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecEventKind {
    OrderSubmitted,
    OrderFilled,
    OrderRejected,
}

/// One broker-lifecycle record, written to a sink separate from the audit
/// log. `intent_id` joins it back to the audit event that authorized the
/// order; `run_id` groups every event of one `run_stream` invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecEvent {
    pub ts: DateTime<Utc>,
    pub event: ExecEventKind,
    pub intent_id: String,
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ExecEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn submitted(
        intent_id: impl Into<String>,
        order_id: impl Into<String>,
        run_id: Uuid,
        policy_hash: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        qty: f64,
        order_type: OrderType,
    ) -> Self {
        Self {
            ts: Utc::now(),
            event: ExecEventKind::OrderSubmitted,
            intent_id: intent_id.into(),
            order_id: order_id.into(),
            run_id: Some(run_id),
            policy_hash: Some(policy_hash.into()),
            symbol: Some(symbol.into()),
            side: Some(side),
            qty: Some(qty),
            order_type: Some(order_type),
            price: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn filled(
        intent_id: impl Into<String>,
        order_id: impl Into<String>,
        run_id: Uuid,
        policy_hash: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        qty: f64,
        price: f64,
    ) -> Self {
        Self {
            ts: Utc::now(),
            event: ExecEventKind::OrderFilled,
            intent_id: intent_id.into(),
            order_id: order_id.into(),
            run_id: Some(run_id),
            policy_hash: Some(policy_hash.into()),
            symbol: Some(symbol.into()),
            side: Some(side),
            qty: Some(qty),
            order_type: None,
            price: Some(price),
        }
    }

    pub fn rejected(
        intent_id: impl Into<String>,
        order_id: impl Into<String>,
        run_id: Uuid,
        policy_hash: impl Into<String>,
    ) -> Self {
        Self {
            ts: Utc::now(),
            event: ExecEventKind::OrderRejected,
            intent_id: intent_id.into(),
            order_id: order_id.into(),
            run_id: Some(run_id),
            policy_hash: Some(policy_hash.into()),
            symbol: None,
            side: None,
            qty: None,
            order_type: None,
            price: None,
        }
    }
}

/// Append-only JSONL sink for execution events, mirroring
/// [`pg_audit::AuditWriter`]'s one-line-per-call, flush-before-return
/// discipline: a crash mid-write can only truncate the trailing line.
pub struct ExecEventWriter {
    path: PathBuf,
}

impl ExecEventWriter {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn append(&self, event: &ExecEvent) -> io::Result<()> {
        let line = pg_audit::canonical_json_line(event)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut f = OpenOptions::new().create(true).append(true).open(&self.path)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        f.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
