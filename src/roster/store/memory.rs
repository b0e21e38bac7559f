use super::{decode_snapshot, encode_snapshot, Snapshot, StorageBackend};
use crate::error::{Result, RosterError};
use std::path::PathBuf;
use std::sync::Mutex;

/// In-memory backend for tests.
///
/// Holds the encoded snapshot exactly as the file backend would write it, so
/// tests exercise the same encode/decode path. A `Mutex` (rather than a
/// `RefCell`) keeps the backend `Send` for [`super::shared::SharedStore`].
#[derive(Default)]
pub struct MemBackend {
    snapshot: Mutex<Option<String>>,
    simulate_write_error: Mutex<bool>,
    saves: Mutex<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a raw payload, e.g. a corrupt file.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let backend = Self::default();
        *lock(&backend.snapshot) = Some(raw.into());
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *lock(&self.simulate_write_error) = simulate;
    }

    /// The raw snapshot, if one was written.
    pub fn raw(&self) -> Option<String> {
        lock(&self.snapshot).clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StorageBackend for MemBackend {
    fn load(&self) -> Result<Option<Snapshot>> {
        match lock(&self.snapshot).as_deref() {
            Some(raw) => decode_snapshot(raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if *lock(&self.simulate_write_error) {
            return Err(RosterError::Store("Simulated write error".to_string()));
        }
        let encoded = encode_snapshot(snapshot)?;
        *lock(&self.snapshot) = Some(encoded);
        *lock(&self.saves) += 1;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://students.json")
    }
}
