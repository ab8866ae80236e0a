use std::fs;
use std::path::Path;

use crate::error::AuditError;
use crate::event::AuditEvent;

/// Reads events back in file order.
///
/// A process crash mid-write can leave at most one truncated trailing line;
/// that line is skipped rather than treated as corruption. A parse failure
/// on any earlier line is a real error and is propagated.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<AuditEvent>, AuditError> {
    let content = fs::read_to_string(path.as_ref())?;
    let lines: Vec<&str> = content.split('\n').filter(|l| !l.is_empty()).collect();
    let last_index = lines.len().saturating_sub(1);

    let mut events = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        match serde_json::from_str::<AuditEvent>(line) {
            Ok(event) => events.push(event),
            Err(err) if i == last_index => {
                tracing::warn!(line = i + 1, error = %err, "skipping truncated trailing audit line");
            }
            Err(source) => return Err(AuditError::Parse { line: i + 1, source }),
        }
    }
    Ok(events)
}
