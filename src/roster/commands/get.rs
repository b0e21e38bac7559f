use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &RecordStore<B>, student_id: &str) -> Result<CmdResult> {
    let student = store.get(student_id.trim())?.clone();
    Ok(CmdResult::default().with_listed_students(vec![student], store.len()))
}
