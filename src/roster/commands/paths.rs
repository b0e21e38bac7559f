use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &RecordStore<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_data_path(store.location()))
}
