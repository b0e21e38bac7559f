use crate::commands::{label, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;

/// Removes a student. Asking "are you sure?" is the caller's job.
pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, student_id: &str) -> Result<CmdResult> {
    let removed = store.delete(student_id.trim())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Student removed: {}",
        label(&removed)
    )));
    Ok(result.with_affected_students(vec![removed]))
}
