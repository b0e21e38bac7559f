//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every roster operation, whatever the UI.
//!
//! The facade:
//! - **Owns** the [`RecordStore`] for the lifetime of the client
//! - **Dispatches** each call to its command module
//! - **Returns structured types** (`Result<CmdResult>`), never strings or output
//!
//! Business rules live in the record store and the command modules; the facade
//! only wires them together. It is generic over [`StorageBackend`] so tests can
//! drive it with [`crate::store::memory::MemBackend`].

use crate::commands;
use crate::error::Result;
use crate::model::{StudentDraft, StudentPatch};
use crate::query::StudentFilter;
use crate::store::record_store::RecordStore;
use crate::store::{LoadStatus, StorageBackend};
use std::path::Path;

/// The main API facade for roster operations.
pub struct RosterApi<B: StorageBackend> {
    store: RecordStore<B>,
    paths: commands::RosterPaths,
}

impl<B: StorageBackend> RosterApi<B> {
    pub fn new(store: RecordStore<B>, paths: commands::RosterPaths) -> Self {
        Self { store, paths }
    }

    pub fn add_student(&mut self, draft: &StudentDraft) -> Result<commands::CmdResult> {
        commands::add::run(&mut self.store, draft)
    }

    pub fn get_student(&self, student_id: &str) -> Result<commands::CmdResult> {
        commands::get::run(&self.store, student_id)
    }

    pub fn update_student(
        &mut self,
        student_id: &str,
        patch: &StudentPatch,
    ) -> Result<commands::CmdResult> {
        commands::update::run(&mut self.store, student_id, patch)
    }

    pub fn delete_student(&mut self, student_id: &str) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store, student_id)
    }

    pub fn list_students(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn search_students(&self, filter: &StudentFilter) -> Result<commands::CmdResult> {
        commands::search::run(&self.store, filter)
    }

    pub fn courses(&self) -> Result<commands::CmdResult> {
        commands::courses::run(&self.store)
    }

    pub fn export_students(&self, output: Option<&Path>) -> Result<commands::CmdResult> {
        commands::export::run(&self.store, output)
    }

    pub fn import_students(
        &mut self,
        path: &Path,
        preview_rows: usize,
    ) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.store, path, preview_rows)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn data_path(&self) -> Result<commands::CmdResult> {
        commands::paths::run(&self.store)
    }

    pub fn load_status(&self) -> &LoadStatus {
        self.store.load_status()
    }

    pub fn paths(&self) -> &commands::RosterPaths {
        &self.paths
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel, RosterPaths};
