use crate::commands::CmdResult;
use crate::error::Result;
use crate::query::{self, StudentFilter};
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &RecordStore<B>, filter: &StudentFilter) -> Result<CmdResult> {
    let matches = query::search(store.list_all(), filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(CmdResult::default().with_listed_students(matches, store.len()))
}
