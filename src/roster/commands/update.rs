use crate::commands::{label, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::StudentPatch;
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(
    store: &mut RecordStore<B>,
    student_id: &str,
    patch: &StudentPatch,
) -> Result<CmdResult> {
    let student_id = student_id.trim();
    let mut result = CmdResult::default();

    if patch.is_empty() {
        // Still surfaces NotFound for unknown ids.
        let current = store.get(student_id)?.clone();
        result.add_message(CmdMessage::info(format!(
            "Nothing to update for {}",
            label(&current)
        )));
        return Ok(result);
    }

    let updated = store.update(student_id, patch)?;
    result.add_message(CmdMessage::success(format!(
        "Student updated: {}",
        label(&updated)
    )));
    Ok(result.with_affected_students(vec![updated]))
}
