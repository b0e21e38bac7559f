use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::StudentDraft;
use crate::store::record_store::RecordStore;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, draft: &StudentDraft) -> Result<CmdResult> {
    let student = store.add(draft)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Student created: {} with ID {}",
        student.name, student.student_id
    )));
    result.add_message(CmdMessage::info(
        "Please note down the student ID, it is the only way to look this record up later.",
    ));
    Ok(result.with_affected_students(vec![student]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::RosterError;
    use crate::store::memory::MemBackend;

    #[test]
    fn reports_the_generated_id_once() {
        let mut store = RecordStore::open(MemBackend::new());
        let draft = StudentDraft::new("Ann", "a@x.com", 20, "Math, Bio");
        let result = run(&mut store, &draft).unwrap();

        let id = &result.affected_students[0].student_id;
        let mentions = result
            .messages
            .iter()
            .filter(|m| m.content.contains(id.as_str()))
            .count();
        assert_eq!(mentions, 1);
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert!(store.contains(id));
    }

    #[test]
    fn invalid_draft_is_an_error() {
        let mut store = RecordStore::open(MemBackend::new());
        let draft = StudentDraft::new("Ann", "a@x.com", 7, "Math");
        assert!(matches!(
            run(&mut store, &draft),
            Err(RosterError::Validation(_))
        ));
        assert!(store.is_empty());
    }
}
