//! # Storage Layer
//!
//! The roster is persisted as a single **snapshot**: one JSON array holding every
//! student record. There is no log and no delta format; each save rewrites the
//! whole file.
//!
//! ## Backends
//!
//! Raw I/O sits behind the [`StorageBackend`] trait so the record store can run
//! against the filesystem in production and against memory in tests:
//!
//! - [`fs::FsBackend`]: the snapshot file on disk. Saves are atomic (write a
//!   temporary sibling, then rename it over the canonical file), so readers never
//!   see a half-written array.
//! - [`memory::MemBackend`]: keeps the encoded snapshot in memory and can simulate
//!   write failures or a corrupt payload.
//!
//! ## Record Store
//!
//! [`record_store::RecordStore`] owns the in-memory collection and all its
//! invariants (validation, unique ids, stable order). Every mutation is flushed
//! through the backend before it reports success. [`shared::SharedStore`] wraps
//! it in a mutex for callers on several threads.
//!
//! ## Loading
//!
//! Loading fails soft. A missing file is initialized with `[]`; an unreadable or
//! corrupt one leaves the store empty and marked [`LoadStatus::Degraded`] so the
//! caller can tell it apart from a genuinely empty roster.
//!
//! A well-formed array is decoded element by element. Elements that do not
//! decode as a student are kept verbatim in [`Snapshot::unreadable`] and written
//! back after the students on every save, so one bad record never costs the
//! rest of the file.

use crate::error::{Result, RosterError};
use crate::model::Student;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;

pub mod fs;
pub mod memory;
pub mod record_store;
pub mod shared;

/// Raw snapshot I/O.
pub trait StorageBackend {
    /// Read the snapshot. `Ok(None)` means no snapshot exists yet.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot with `snapshot`.
    /// MUST be atomic: the previous snapshot stays intact if this fails.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Where the snapshot lives. Virtual for non-file backends.
    fn location(&self) -> PathBuf;
}

/// Decoded contents of a snapshot file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub students: Vec<Student>,
    /// Array elements that are not valid student records, as found on disk.
    pub unreadable: Vec<Value>,
}

/// How the collection was obtained when the store was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No snapshot existed; an empty one was written.
    Initialized,
    /// The snapshot was read and held this many records.
    Loaded(usize),
    /// The snapshot was read but some elements were not valid records. Those
    /// are carried along untouched.
    Partial { loaded: usize, unreadable: usize },
    /// The snapshot could not be read; the store started empty.
    Degraded(String),
}

impl LoadStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadStatus::Degraded(_) | LoadStatus::Partial { .. })
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a> {
    Student(&'a Student),
    Raw(&'a Value),
}

/// Encodes a snapshot the way it is written to disk and exported: the students
/// in order, followed by any unreadable elements.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String> {
    let entries: Vec<Entry<'_>> = snapshot
        .students
        .iter()
        .map(Entry::Student)
        .chain(snapshot.unreadable.iter().map(Entry::Raw))
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Decodes a snapshot. Blank input is an empty roster. Anything but a JSON
/// array is an error; bad elements inside the array are set aside.
pub fn decode_snapshot(raw: &str) -> Result<Snapshot> {
    if raw.trim().is_empty() {
        return Ok(Snapshot::default());
    }
    let elements = match serde_json::from_str::<Value>(raw)? {
        Value::Array(elements) => elements,
        _ => {
            return Err(RosterError::Store(
                "snapshot is not a JSON array".to_string(),
            ))
        }
    };

    let mut snapshot = Snapshot::default();
    for (index, element) in elements.into_iter().enumerate() {
        match Student::deserialize(&element) {
            Ok(student) => snapshot.students.push(student),
            Err(e) => {
                warn!(index, error = %e, "unreadable record kept as is");
                snapshot.unreadable.push(element);
            }
        }
    }
    Ok(snapshot)
}
