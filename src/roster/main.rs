//! # Roster CLI
//!
//! The binary is intentionally thin: argument parsing, context wiring and
//! printing live in `cli/`, and this file only invokes `cli::run()` and turns a
//! failure into `Error: ...` on stderr with exit code 1.
//!
//! For the layering behind the CLI, see the library docs in `lib.rs`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
