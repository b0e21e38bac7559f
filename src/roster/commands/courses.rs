use crate::commands::CmdResult;
use crate::error::Result;
use crate::query::course_catalog;
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &RecordStore<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_courses(course_catalog(store.list_all())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentDraft;
    use crate::store::memory::MemBackend;

    #[test]
    fn collects_distinct_courses() {
        let mut store = RecordStore::open(MemBackend::new());
        store
            .add(&StudentDraft::new("Ann", "a@x.com", 20, "Math, Bio"))
            .unwrap();
        store
            .add(&StudentDraft::new("Bo", "b@x.com", 30, "bio, Art"))
            .unwrap();

        let result = run(&store).unwrap();
        assert_eq!(result.courses, ["Art", "Bio", "Math"]);
    }
}
