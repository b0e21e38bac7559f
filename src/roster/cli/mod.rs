//! # CLI Behavior
//!
//! This is **one possible UI client** for roster, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Resolution
//!
//! The roster home is `ROSTER_HOME` when set, otherwise the platform data
//! directory. `config.json` lives there, and so does the data file unless
//! `--data` (or `ROSTER_DATA`) names another one.
//!
//! ## Naked Execution
//!
//! Running `roster` with no subcommand lists every student.
//!
//! ## Confirmation
//!
//! `delete` asks `y/N` on stdin. Anything other than `y`/`yes` keeps the record.
//! `--yes` skips the question.
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. The default level is `warn`;
//! `-v` raises it to `debug` and `ROSTER_LOG` takes any `EnvFilter` directive.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `print`: Output formatting (tables, cards, colored messages)
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;
