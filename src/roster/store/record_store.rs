use super::{LoadStatus, Snapshot, StorageBackend};
use crate::error::{Result, RosterError, ValidationIssue};
use crate::model::{normalize_courses, Student, StudentDraft, StudentPatch, MIN_AGE};
use crate::student_id::{IdGenerator, RandomIds};
use chrono::Utc;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Upper bound on id regeneration inside a single `add`.
const MAX_ID_ATTEMPTS: usize = 64;

/// Outcome of merging an external batch into the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub skipped: usize,
}

/// The roster: an owned, ordered collection of students plus the backend it is
/// flushed to after every change. Unreadable entries found at load time ride
/// along in the snapshot and are written back with every save.
pub struct RecordStore<B: StorageBackend> {
    backend: B,
    snapshot: Snapshot,
    status: LoadStatus,
    ids: Box<dyn IdGenerator>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Loads the snapshot from `backend`. Never fails: see [`LoadStatus`].
    pub fn open(backend: B) -> Self {
        let (snapshot, status) = match backend.load() {
            Ok(Some(snapshot)) => {
                let loaded = snapshot.students.len();
                let unreadable = snapshot.unreadable.len();
                debug!(location = %backend.location().display(), loaded, "roster loaded");
                let status = if unreadable == 0 {
                    LoadStatus::Loaded(loaded)
                } else {
                    warn!(
                        location = %backend.location().display(),
                        unreadable,
                        "roster file holds records that could not be read"
                    );
                    LoadStatus::Partial { loaded, unreadable }
                };
                (snapshot, status)
            }
            Ok(None) => {
                let empty = Snapshot::default();
                match backend.save(&empty) {
                    Ok(()) => {
                        info!(location = %backend.location().display(), "initialized empty roster");
                        (empty, LoadStatus::Initialized)
                    }
                    Err(e) => {
                        warn!(error = %e, "could not initialize roster file");
                        (empty, LoadStatus::Degraded(e.to_string()))
                    }
                }
            }
            Err(e) => {
                warn!(
                    location = %backend.location().display(),
                    error = %e,
                    "could not read roster, starting empty"
                );
                (Snapshot::default(), LoadStatus::Degraded(e.to_string()))
            }
        };

        let store = Self {
            backend,
            snapshot,
            status,
            ids: Box::new(RandomIds),
        };
        store.warn_on_duplicate_ids();
        store
    }

    /// Replaces the id source. Mostly useful for deterministic tests.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn location(&self) -> PathBuf {
        self.backend.location()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.snapshot.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.students.is_empty()
    }

    /// All students in insertion order.
    pub fn list_all(&self) -> &[Student] {
        &self.snapshot.students
    }

    /// Everything the store writes, unreadable entries included.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn contains(&self, student_id: &str) -> bool {
        self.position(student_id).is_some()
    }

    pub fn get(&self, student_id: &str) -> Result<&Student> {
        self.position(student_id)
            .map(|i| &self.snapshot.students[i])
            .ok_or_else(|| RosterError::NotFound(student_id.to_string()))
    }

    /// Validates `draft`, assigns a fresh id and appends the new student.
    ///
    /// The returned record carries the generated id; it is the only handle the
    /// caller gets for later lookups.
    pub fn add(&mut self, draft: &StudentDraft) -> Result<Student> {
        validate(draft)?;
        let student_id = self.fresh_id()?;
        let student = Student::from_draft(student_id, draft, Utc::now());

        self.snapshot.students.push(student.clone());
        self.persist()?;
        info!(student_id = %student.student_id, "student added");
        Ok(student)
    }

    /// Applies the non-blank fields of `patch`. Age is not re-checked here.
    pub fn update(&mut self, student_id: &str, patch: &StudentPatch) -> Result<Student> {
        let idx = self
            .position(student_id)
            .ok_or_else(|| RosterError::NotFound(student_id.to_string()))?;

        self.snapshot.students[idx].apply(patch, Utc::now());
        let updated = self.snapshot.students[idx].clone();
        self.persist()?;
        info!(student_id, "student updated");
        Ok(updated)
    }

    /// Removes a student for good. Callers confirm with the user beforehand.
    pub fn delete(&mut self, student_id: &str) -> Result<Student> {
        let idx = self
            .position(student_id)
            .ok_or_else(|| RosterError::NotFound(student_id.to_string()))?;

        let removed = self.snapshot.students.remove(idx);
        self.persist()?;
        info!(student_id, "student deleted");
        Ok(removed)
    }

    /// Appends every candidate whose id is non-empty and not yet taken.
    ///
    /// Ids are checked against the roster and against the candidates already
    /// accepted from this batch, so repeats inside the batch keep only the
    /// first. Candidates are stored as given, without `add`'s validation. The
    /// snapshot is written once after the batch, even when nothing was added.
    pub fn import_merge(&mut self, candidates: Vec<Student>) -> Result<MergeReport> {
        let mut taken: HashSet<String> =
            self.snapshot.students.iter().map(|s| s.student_id.clone()).collect();
        let mut report = MergeReport::default();

        for candidate in candidates {
            if candidate.student_id.is_empty() {
                debug!("skipping import candidate without a student id");
                report.skipped += 1;
                continue;
            }
            if !taken.insert(candidate.student_id.clone()) {
                debug!(student_id = %candidate.student_id, "skipping duplicate student id");
                report.skipped += 1;
                continue;
            }
            self.snapshot.students.push(candidate);
            report.added += 1;
        }

        self.persist()?;
        info!(added = report.added, skipped = report.skipped, "import merged");
        Ok(report)
    }

    /// Writes the current collection again, e.g. after a failed save.
    pub fn flush(&self) -> Result<()> {
        self.persist()
    }

    fn position(&self, student_id: &str) -> Option<usize> {
        self.snapshot.students.iter().position(|s| s.student_id == student_id)
    }

    fn fresh_id(&mut self) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.generate();
            if !candidate.is_empty() && !self.contains(&candidate) {
                return Ok(candidate);
            }
            debug!(candidate = %candidate, "student id collision, regenerating");
        }
        Err(RosterError::IdExhausted(MAX_ID_ATTEMPTS))
    }

    fn persist(&self) -> Result<()> {
        self.backend.save(&self.snapshot).map_err(|e| {
            warn!(error = %e, "save failed, roster in memory is ahead of storage");
            e
        })
    }

    fn warn_on_duplicate_ids(&self) {
        let mut seen = HashSet::new();
        for s in &self.snapshot.students {
            if !seen.insert(s.student_id.as_str()) {
                warn!(student_id = %s.student_id, "roster file holds a duplicate student id");
            }
        }
    }
}

fn validate(draft: &StudentDraft) -> Result<()> {
    let issue = if draft.name.trim().is_empty() {
        Some(ValidationIssue::MissingName)
    } else if draft.email.trim().is_empty() {
        Some(ValidationIssue::MissingEmail)
    } else if normalize_courses(&draft.courses).is_empty() {
        Some(ValidationIssue::MissingCourses)
    } else if draft.age < MIN_AGE {
        Some(ValidationIssue::AgeBelowMinimum {
            age: draft.age,
            minimum: MIN_AGE,
        })
    } else {
        None
    };

    match issue {
        Some(issue) => Err(RosterError::Validation(issue)),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::memory::MemBackend;
    use std::collections::VecDeque;

    /// Hands out a fixed sequence of ids, then falls back to random ones.
    pub(crate) struct ScriptedIds(pub VecDeque<String>);

    impl ScriptedIds {
        pub(crate) fn new(ids: &[&str]) -> Self {
            Self(ids.iter().map(|s| s.to_string()).collect())
        }
    }

    impl IdGenerator for ScriptedIds {
        fn generate(&mut self) -> String {
            self.0
                .pop_front()
                .unwrap_or_else(|| RandomIds.generate())
        }
    }

    fn ann() -> StudentDraft {
        StudentDraft::new("Ann", "a@x.com", 20, "Math, Bio")
    }

    fn imported(id: &str, name: &str) -> Student {
        serde_json::from_value(serde_json::json!({ "studentid": id, "name": name })).unwrap()
    }

    #[test]
    fn open_initializes_missing_snapshot() {
        let store = RecordStore::open(MemBackend::new());
        assert_eq!(store.load_status(), &LoadStatus::Initialized);
        assert!(store.is_empty());
        assert_eq!(store.backend().raw().as_deref(), Some("[]"));
    }

    #[test]
    fn open_degrades_on_corrupt_snapshot() {
        let store = RecordStore::open(MemBackend::with_raw("{ not json"));
        assert!(store.load_status().is_degraded());
        assert!(store.is_empty());
    }

    #[test]
    fn degraded_store_stays_usable() {
        let mut store = RecordStore::open(MemBackend::with_raw("{\"a\": 1}"));
        assert!(store.load_status().is_degraded());
        let added = store.add(&ann()).unwrap();
        assert_eq!(store.get(&added.student_id).unwrap().name, "Ann");
    }

    #[test]
    fn blank_snapshot_loads_as_empty() {
        let store = RecordStore::open(MemBackend::with_raw("   \n"));
        assert_eq!(store.load_status(), &LoadStatus::Loaded(0));
    }

    #[test]
    fn unreadable_records_do_not_cost_the_rest() {
        let raw = r#"[
            {"name": "Ann", "studentid": "Aaaaaaa1111!", "age": 20},
            {"name": "Cy", "studentid": "Ccccccc3333#", "age": "15"},
            {"name": "Bo", "studentid": "Bbbbbbb2222@", "age": 30}
        ]"#;
        let mut store = RecordStore::open(MemBackend::with_raw(raw));
        assert_eq!(
            store.load_status(),
            &LoadStatus::Partial {
                loaded: 2,
                unreadable: 1
            }
        );
        assert!(store.load_status().is_degraded());
        assert_eq!(store.get("Bbbbbbb2222@").unwrap().name, "Bo");
        assert!(store.get("Ccccccc3333#").is_err());

        store.add(&StudentDraft::new("Di", "d@x.com", 40, "Art")).unwrap();

        let saved = store.backend().load().unwrap().unwrap();
        let names: Vec<_> = saved.students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Ann", "Bo", "Di"]);
        assert_eq!(saved.unreadable.len(), 1);
        assert_eq!(saved.unreadable[0]["age"], "15");
        assert_eq!(saved.unreadable[0]["name"], "Cy");
    }

    #[test]
    fn end_to_end_add_get_delete() {
        let mut store = RecordStore::open(MemBackend::new());
        let added = store.add(&ann()).unwrap();
        assert_eq!(added.student_id.len(), 12);

        let fetched = store.get(&added.student_id).unwrap();
        assert_eq!(fetched, &added);

        store.delete(&added.student_id).unwrap();
        assert!(matches!(
            store.get(&added.student_id),
            Err(RosterError::NotFound(_))
        ));
    }

    #[test]
    fn add_normalizes_and_stamps() {
        let mut store = RecordStore::open(MemBackend::new());
        let draft = StudentDraft::new("  Ann ", " a@x.com ", 20, " Math ,, Bio ").with_grades(" B+ ");
        let s = store.add(&draft).unwrap();
        assert_eq!(s.name, "Ann");
        assert_eq!(s.email, "a@x.com");
        assert_eq!(s.courses, "Math, Bio");
        assert_eq!(s.grades, "B+");
        assert!(s.created_at.is_some());
        assert!(s.updated_at.is_none());
    }

    #[test]
    fn add_enforces_minimum_age() {
        let mut store = RecordStore::open(MemBackend::new());
        let too_young = StudentDraft::new("Kid", "k@x.com", 7, "Art");
        assert!(matches!(
            store.add(&too_young),
            Err(RosterError::Validation(ValidationIssue::AgeBelowMinimum { age: 7, .. }))
        ));
        assert!(store.is_empty());

        let old_enough = StudentDraft::new("Kid", "k@x.com", 8, "Art");
        assert!(store.add(&old_enough).is_ok());
    }

    #[test]
    fn add_requires_name_email_and_courses() {
        let mut store = RecordStore::open(MemBackend::new());
        let cases = [
            (StudentDraft::new(" ", "a@x.com", 20, "Math"), ValidationIssue::MissingName),
            (StudentDraft::new("Ann", "", 20, "Math"), ValidationIssue::MissingEmail),
            (StudentDraft::new("Ann", "a@x.com", 20, " , "), ValidationIssue::MissingCourses),
        ];
        for (draft, expected) in cases {
            match store.add(&draft) {
                Err(RosterError::Validation(issue)) => assert_eq!(issue, expected),
                other => panic!("expected {:?}, got {:?}", expected, other),
            }
        }
        assert_eq!(store.backend().save_count(), 1); // only the initial `[]`
    }

    #[test]
    fn add_regenerates_on_collision() {
        let mut store = RecordStore::open(MemBackend::new())
            .with_id_generator(ScriptedIds::new(&["Aaaaaaa1111!", "Aaaaaaa1111!", "Bbbbbbb2222@"]));

        let first = store.add(&ann()).unwrap();
        let second = store.add(&StudentDraft::new("Bo", "b@x.com", 30, "Art")).unwrap();

        assert_eq!(first.student_id, "Aaaaaaa1111!");
        assert_eq!(second.student_id, "Bbbbbbb2222@");
        assert_eq!(store.get("Aaaaaaa1111!").unwrap().name, "Ann");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn add_gives_up_when_ids_keep_colliding() {
        let script: Vec<&str> = vec!["Same0000000!"; MAX_ID_ATTEMPTS + 1];
        let mut store =
            RecordStore::open(MemBackend::new()).with_id_generator(ScriptedIds::new(&script));
        store.add(&ann()).unwrap();

        let err = store.add(&ann()).unwrap_err();
        assert!(matches!(err, RosterError::IdExhausted(MAX_ID_ATTEMPTS)));
        assert!(!err.is_storage());
        assert_eq!(store.len(), 1);
    }

    /// Accepts every save without encoding, for bulk tests.
    struct NullBackend;

    impl StorageBackend for NullBackend {
        fn load(&self) -> Result<Option<Snapshot>> {
            Ok(Some(Snapshot::default()))
        }

        fn save(&self, _snapshot: &Snapshot) -> Result<()> {
            Ok(())
        }

        fn location(&self) -> PathBuf {
            PathBuf::from("null://")
        }
    }

    #[test]
    fn ten_thousand_adds_yield_unique_ids() {
        let mut store = RecordStore::open(NullBackend);
        let draft = ann();
        for _ in 0..10_000 {
            store.add(&draft).unwrap();
        }
        let ids: HashSet<&str> = store.list_all().iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn update_blank_name_is_skipped() {
        let mut store = RecordStore::open(MemBackend::new());
        let id = store.add(&ann()).unwrap().student_id;

        let blank = StudentPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        store.update(&id, &blank).unwrap();
        assert_eq!(store.get(&id).unwrap().name, "Ann");

        let rename = StudentPatch {
            name: Some("X".into()),
            ..Default::default()
        };
        let updated = store.update(&id, &rename).unwrap();
        assert_eq!(updated.name, "X");
        assert_eq!(updated.student_id, id);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_does_not_recheck_age() {
        let mut store = RecordStore::open(MemBackend::new());
        let id = store.add(&ann()).unwrap().student_id;
        let patch = StudentPatch {
            age: Some(5),
            ..Default::default()
        };
        assert_eq!(store.update(&id, &patch).unwrap().age, 5);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = RecordStore::open(MemBackend::new());
        let err = store.update("nope", &StudentPatch::default()).unwrap_err();
        assert!(matches!(err, RosterError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn delete_unknown_id_leaves_collection_alone() {
        let mut store = RecordStore::open(MemBackend::new());
        store.add(&ann()).unwrap();
        let before = store.list_all().to_vec();
        let saves = store.backend().save_count();

        assert!(matches!(
            store.delete("missing"),
            Err(RosterError::NotFound(_))
        ));
        assert_eq!(store.list_all(), before.as_slice());
        assert_eq!(store.backend().save_count(), saves);
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut store = RecordStore::open(MemBackend::new());
        for name in ["Cy", "Ann", "Bo"] {
            store.add(&StudentDraft::new(name, "x@x.com", 20, "Art")).unwrap();
        }
        let names: Vec<_> = store.list_all().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Cy", "Ann", "Bo"]);
    }

    #[test]
    fn mutations_are_persisted() {
        let mut store = RecordStore::open(MemBackend::new());
        let id = store.add(&ann()).unwrap().student_id;

        let reloaded = store.backend().load().unwrap().unwrap();
        assert_eq!(reloaded.students, store.list_all());
        assert_eq!(reloaded.students[0].student_id, id);
    }

    #[test]
    fn failed_save_is_reported_and_memory_kept() {
        let mut store = RecordStore::open(MemBackend::new());
        store.backend().set_simulate_write_error(true);

        let err = store.add(&ann()).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend().raw().as_deref(), Some("[]"));

        store.backend().set_simulate_write_error(false);
        store.flush().unwrap();
        assert_eq!(store.backend().load().unwrap().unwrap().students.len(), 1);
    }

    #[test]
    fn import_rejects_repeats_within_batch() {
        let mut store = RecordStore::open(MemBackend::new());
        let report = store
            .import_merge(vec![imported("New1234567!x", "First"), imported("New1234567!x", "Second")])
            .unwrap();
        assert_eq!(report, MergeReport { added: 1, skipped: 1 });
        assert_eq!(store.get("New1234567!x").unwrap().name, "First");
    }

    #[test]
    fn import_skips_existing_and_missing_ids() {
        let mut store = RecordStore::open(MemBackend::new());
        let existing = store.add(&ann()).unwrap();

        let report = store
            .import_merge(vec![
                imported(&existing.student_id, "Impostor"),
                imported("", "Nameless"),
                imported("Fresh000000@", "Fresh"),
            ])
            .unwrap();

        assert_eq!(report, MergeReport { added: 1, skipped: 2 });
        assert_eq!(store.get(&existing.student_id).unwrap().name, "Ann");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn import_keeps_whitespace_ids() {
        let mut store = RecordStore::open(MemBackend::new());
        let report = store
            .import_merge(vec![imported(" ", "Spacey"), imported(" ", "Again"), imported("", "None")])
            .unwrap();

        assert_eq!(report, MergeReport { added: 1, skipped: 2 });
        assert_eq!(store.get(" ").unwrap().name, "Spacey");
    }

    #[test]
    fn import_saves_even_when_nothing_is_added() {
        let mut store = RecordStore::open(MemBackend::new());
        let existing = store.add(&ann()).unwrap();
        let saves = store.backend().save_count();

        let report = store
            .import_merge(vec![imported(&existing.student_id, "Again"), imported("", "None")])
            .unwrap();

        assert_eq!(report.added, 0);
        assert_eq!(store.backend().save_count(), saves + 1);
    }

    #[test]
    fn import_bypasses_validation_and_saves_once() {
        let mut store = RecordStore::open(MemBackend::new());
        let saves = store.backend().save_count();

        let mut young = imported("Young000000#", "Tiny");
        young.age = 3;
        let report = store
            .import_merge(vec![young, imported("Other000000#", "")])
            .unwrap();

        assert_eq!(report.added, 2);
        assert_eq!(store.get("Young000000#").unwrap().age, 3);
        assert_eq!(store.backend().save_count(), saves + 1);
    }
}
