use super::record_store::RecordStore;
use super::StorageBackend;
use crate::error::{Result, RosterError};
use std::sync::{Arc, Mutex};

/// A [`RecordStore`] that several threads can hold at once.
///
/// Each call to [`SharedStore::with`] runs under one lock, so a whole
/// mutate-and-save cycle commits before the next caller sees the roster.
pub struct SharedStore<B: StorageBackend> {
    inner: Arc<Mutex<RecordStore<B>>>,
}

impl<B: StorageBackend> Clone for SharedStore<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: StorageBackend> SharedStore<B> {
    pub fn new(store: RecordStore<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut RecordStore<B>) -> Result<R>) -> Result<R> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| RosterError::Store("record store lock poisoned".to_string()))?;
        f(&mut *guard)
    }
}
