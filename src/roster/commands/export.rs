use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::record_store::RecordStore;
use crate::store::{encode_snapshot, StorageBackend};
use std::fs;
use std::path::Path;

/// Default file name offered for exports.
pub const EXPORT_FILENAME: &str = "students.json";

/// Encodes the full roster in the storage format, unreadable entries included.
///
/// With `output`, the snapshot is written there; otherwise it is returned in
/// [`CmdResult::export`] for the caller to deliver.
pub fn run<B: StorageBackend>(store: &RecordStore<B>, output: Option<&Path>) -> Result<CmdResult> {
    let payload = encode_snapshot(store.snapshot())?;

    match output {
        Some(path) => {
            fs::write(path, &payload)?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::success(format!(
                "Exported {} students to {}",
                store.len(),
                path.display()
            )));
            Ok(result)
        }
        None => Ok(CmdResult::default().with_export(payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentDraft;
    use crate::store::decode_snapshot;
    use crate::store::memory::MemBackend;
    use tempfile::TempDir;

    fn store_with_two() -> RecordStore<MemBackend> {
        let mut store = RecordStore::open(MemBackend::new());
        store
            .add(&StudentDraft::new("Ann", "a@x.com", 20, "Math"))
            .unwrap();
        store
            .add(&StudentDraft::new("Bo", "b@x.com", 30, "Art"))
            .unwrap();
        store
    }

    #[test]
    fn export_matches_storage_format() {
        let store = store_with_two();
        let result = run(&store, None).unwrap();

        let payload = result.export.unwrap();
        assert_eq!(Some(payload.clone()), store.backend().raw());
        let decoded = decode_snapshot(&payload).unwrap();
        assert_eq!(decoded.students, store.list_all());
    }

    #[test]
    fn export_to_file() {
        let store = store_with_two();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(EXPORT_FILENAME);

        let result = run(&store, Some(&path)).unwrap();
        assert!(result.export.is_none());
        assert!(result.messages[0].content.contains("Exported 2 students"));

        let on_disk = fs::read_to_string(&path).unwrap();
        assert_eq!(decode_snapshot(&on_disk).unwrap().students.len(), 2);
    }
}
