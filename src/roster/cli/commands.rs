//! # CLI Layer
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the roster home, config and data file, opens the store
//! - `handle_*()`: Per-command handlers that call the API and print the result
//!
//! Handlers never apply business rules; a `CmdResult` comes back from the API and
//! is handed to `print`.

use super::print::{
    print_lines, print_messages, print_showing, print_student_card, print_students,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use roster::api::{ConfigAction, RosterApi, RosterPaths};
use roster::config::{RosterConfig, CONFIG_KEYS};
use roster::error::{Result, RosterError};
use roster::model::{StudentDraft, StudentPatch};
use roster::query::StudentFilter;
use roster::store::fs::FsBackend;
use roster::store::record_store::RecordStore;
use roster::store::LoadStatus;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: RosterApi<FsBackend>,
    data_path: PathBuf,
    preview_rows: usize,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    let outcome = dispatch(&mut ctx, cli.command);
    if let Err(e) = &outcome {
        if e.is_storage() {
            eprintln!(
                "{}",
                format!("Data file: {}", ctx.data_path.display()).dimmed()
            );
        }
    }
    outcome
}

fn dispatch(ctx: &mut AppContext, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Add {
            name,
            email,
            age,
            courses,
            grades,
        }) => {
            let draft = StudentDraft::new(name, email, age, courses).with_grades(grades);
            handle_add(ctx, draft)
        }
        Some(Commands::Get { id }) => handle_get(ctx, &id),
        Some(Commands::Update {
            id,
            name,
            email,
            age,
            courses,
            grades,
        }) => {
            let patch = StudentPatch {
                name,
                email,
                age,
                courses,
                grades,
            };
            handle_update(ctx, &id, patch)
        }
        Some(Commands::Delete { id, yes }) => handle_delete(ctx, &id, yes),
        Some(Commands::List) | None => handle_list(ctx),
        Some(Commands::Search {
            text,
            min_age,
            courses,
        }) => {
            let filter = StudentFilter {
                text: text.unwrap_or_default(),
                min_age,
                courses,
            };
            handle_search(ctx, &filter)
        }
        Some(Commands::Courses) => handle_courses(ctx),
        Some(Commands::Export { output }) => handle_export(ctx, output.as_deref()),
        Some(Commands::Import { file }) => handle_import(ctx, &file),
        Some(Commands::Config { key, value }) => handle_config(ctx, key, value),
        Some(Commands::Path) => handle_path(ctx),
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "roster=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ROSTER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn roster_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("ROSTER_HOME") {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "roster", "roster")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| RosterError::Config("could not determine a data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = roster_home()?;
    let config = RosterConfig::load(&home)?;
    let data_path = cli
        .data
        .clone()
        .unwrap_or_else(|| config.data_path(&home));

    let store = RecordStore::open(FsBackend::new(&data_path));
    match store.load_status() {
        LoadStatus::Degraded(reason) => eprintln!(
            "{}",
            format!(
                "Could not read {} ({}); starting with an empty roster.",
                store.location().display(),
                reason
            )
            .yellow()
        ),
        LoadStatus::Partial { unreadable, .. } => eprintln!(
            "{}",
            format!(
                "{} record(s) could not be read in {}; they are kept in the file as is.",
                unreadable,
                store.location().display()
            )
            .yellow()
        ),
        _ => {}
    }

    Ok(AppContext {
        api: RosterApi::new(store, RosterPaths::new(home)),
        data_path,
        preview_rows: config.preview_rows,
    })
}

fn handle_add(ctx: &mut AppContext, draft: StudentDraft) -> Result<()> {
    let result = ctx.api.add_student(&draft)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_get(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.get_student(id)?;
    for student in &result.listed_students {
        print_student_card(student);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_update(ctx: &mut AppContext, id: &str, patch: StudentPatch) -> Result<()> {
    let result = ctx.api.update_student(id, &patch)?;
    print_messages(&result.messages);
    for student in &result.affected_students {
        print_student_card(student);
    }
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let found = ctx.api.get_student(id)?;
        let name = found
            .listed_students
            .first()
            .map(|s| s.name.clone())
            .unwrap_or_default();
        if !confirm(&format!("Delete {} ({})?", name, id.trim()))? {
            println!("{}", "Aborted.".dimmed());
            return Ok(());
        }
    }

    let result = ctx.api.delete_student(id)?;
    print_messages(&result.messages);
    Ok(())
}

/// Asks a y/N question on stdin. End of input counts as no.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_students()?;
    print_students(&result.listed_students);
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &AppContext, filter: &StudentFilter) -> Result<()> {
    let result = ctx.api.search_students(filter)?;
    print_students(&result.listed_students);
    print_showing(result.listed_students.len(), result.roster_size);
    print_messages(&result.messages);
    Ok(())
}

fn handle_courses(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.courses()?;
    print_lines(&result.courses, "No courses yet.");
    Ok(())
}

fn handle_export(ctx: &AppContext, output: Option<&Path>) -> Result<()> {
    let result = ctx.api.export_students(output)?;
    if let Some(payload) = &result.export {
        println!("{}", payload);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let result = ctx.api.import_students(file, ctx.preview_rows)?;
    print_messages(&result.messages);
    if !result.listed_students.is_empty() {
        println!();
        print_students(&result.listed_students);
        print_showing(result.listed_students.len(), result.roster_size);
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            let lines: Vec<String> = CONFIG_KEYS
                .iter()
                .filter_map(|k| config.get(k).map(|v| format!("{} = {}", k, v)))
                .collect();
            print_lines(&lines, "No configuration values.");
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_path(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.data_path()?;
    if let Some(path) = &result.data_path {
        println!("{}", path.display());
    }
    Ok(())
}
