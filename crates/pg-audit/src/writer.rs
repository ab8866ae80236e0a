use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::AuditError;
use crate::event::AuditEvent;

/// Append-only JSONL sink. Every `append` call opens, writes one line, and
/// flushes before returning — a crash mid-line can only truncate the
/// trailing line, never corrupt an earlier one.
pub struct AuditWriter {
    path: PathBuf,
}

impl AuditWriter {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn append(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let line = canonical_json_line(event)?;
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

/// Serializes `v`, then recursively sorts every object's keys lexicographically
/// and re-emits compact JSON — the same bytes every time, on every platform,
/// for the same logical value.
pub fn canonical_json_line<T: Serialize>(v: &T) -> Result<String, AuditError> {
    let raw = serde_json::to_value(v)?;
    let sorted = sort_keys(&raw);
    Ok(serde_json::to_string(&sorted)?)
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}
