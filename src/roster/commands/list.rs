use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &RecordStore<B>) -> Result<CmdResult> {
    let students = store.list_all().to_vec();
    let total = students.len();
    Ok(CmdResult::default().with_listed_students(students, total))
}
