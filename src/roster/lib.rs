//! # Roster Architecture
//!
//! Roster keeps a small school's student records in a single JSON file. Like any
//! client of this crate, the `roster` binary is only a front end: every rule about
//! what a valid record is, how ids are minted and how the file is written lives
//! in the library.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, formats output                │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, builds a CmdResult             │
//! │  - No terminal I/O                                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore: validation, unique ids, persist-on-mutate   │
//! │  - StorageBackend: FsBackend (production), MemBackend (test)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Student IDs
//!
//! Ids are 12 characters: seven letters, four digits and one symbol from
//! `!@#$%&`, shuffled, with the first character upper-cased. They are the only
//! handle a user has on a record, so the CLI prints a new id exactly once, when
//! the record is created. See [`student_id`].
//!
//! ## Durability
//!
//! Each successful mutation rewrites the whole snapshot before returning, through
//! an atomic temp-file-and-rename. A failed write leaves the previous file in
//! place. Loading never aborts: a missing file is created empty and a corrupt one
//! opens as an empty, [`store::LoadStatus::Degraded`] store. Single records that
//! do not decode are set aside and written back untouched
//! ([`store::LoadStatus::Partial`]).
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`store`]: Storage backends and the record store
//! - [`model`]: `Student`, drafts and patches
//! - [`query`]: Search filters and the course catalog
//! - [`student_id`]: Id generation
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod store;
pub mod student_id;
