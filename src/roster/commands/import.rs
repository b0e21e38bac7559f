use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, RosterError};
use crate::model::Student;
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Candidates decoded from an import payload.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub candidates: Vec<Student>,
    /// Array elements that were not decodable student objects.
    pub rejected: usize,
}

pub fn run<B: StorageBackend>(
    store: &mut RecordStore<B>,
    path: &Path,
    preview_rows: usize,
) -> Result<CmdResult> {
    let raw = fs::read_to_string(path)?;
    import_payload(store, &raw, preview_rows)
}

/// Merges a raw JSON payload into the roster.
pub fn import_payload<B: StorageBackend>(
    store: &mut RecordStore<B>,
    raw: &str,
    preview_rows: usize,
) -> Result<CmdResult> {
    let batch = parse_payload(raw)?;
    let report = store.import_merge(batch.candidates)?;
    let skipped = report.skipped + batch.rejected;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {} new students.",
        report.added
    )));
    if skipped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {} entries (missing or duplicate student ID, or not a student object).",
            skipped
        )));
    }

    let preview = store.list_all().iter().take(preview_rows).cloned().collect();
    Ok(result.with_listed_students(preview, store.len()))
}

/// Decodes an import payload. Anything but a JSON array is rejected outright.
pub fn parse_payload(raw: &str) -> Result<ImportBatch> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| RosterError::ImportFormat(format!("could not parse JSON: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(RosterError::ImportFormat(
            "expected a JSON array of student objects".to_string(),
        ));
    };

    let mut batch = ImportBatch::default();
    for item in items {
        if !item.is_object() {
            batch.rejected += 1;
            continue;
        }
        match serde_json::from_value::<Student>(item) {
            Ok(student) => batch.candidates.push(student),
            Err(e) => {
                debug!(error = %e, "import entry is not a student record");
                batch.rejected += 1;
            }
        }
    }
    Ok(batch)
}
