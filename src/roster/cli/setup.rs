use clap::{Parser, Subcommand};
use roster::commands::export::EXPORT_FILENAME;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("ROSTER_GIT_HASH");
    const COMMIT_DATE: &str = env!("ROSTER_COMMIT_DATE");
    const IS_RELEASE: &str = env!("ROSTER_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "roster", bin_name = "roster", version = get_version())]
#[command(about = "Keep student records in a JSON file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Student data file (overrides the configured one)
    #[arg(long, global = true, env = "ROSTER_DATA", value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a student and print their new ID
    #[command(alias = "new", display_order = 1)]
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        age: u32,

        /// Comma-separated course names
        #[arg(long)]
        courses: String,

        #[arg(long, default_value = "")]
        grades: String,
    },

    /// Show one student
    #[command(alias = "show", display_order = 2)]
    Get {
        /// Student ID (quote it: IDs contain shell symbols)
        id: String,
    },

    /// Change fields of a student; omitted or blank fields are kept
    #[command(alias = "edit", display_order = 3)]
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        #[arg(long)]
        courses: Option<String>,

        #[arg(long)]
        grades: Option<String>,
    },

    /// Remove a student
    #[command(alias = "rm", display_order = 4)]
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List every student
    #[command(alias = "ls", display_order = 5)]
    List,

    /// Filter students by text, age and courses
    #[command(display_order = 6)]
    Search {
        /// Matched against name, email and ID (case-insensitive)
        text: Option<String>,

        /// Only students at least this old
        #[arg(long, default_value_t = 0)]
        min_age: u32,

        /// Required course; repeat for several
        #[arg(long = "course", value_name = "COURSE")]
        courses: Vec<String>,
    },

    /// List every course on the roster
    #[command(display_order = 7)]
    Courses,

    /// Write all students as JSON
    #[command(display_order = 10)]
    Export {
        /// Write to this file instead of stdout (`-o` alone writes students.json)
        #[arg(long, short, num_args = 0..=1, default_missing_value = EXPORT_FILENAME)]
        output: Option<PathBuf>,
    },

    /// Merge students from a JSON file, skipping IDs already present
    #[command(display_order = 11)]
    Import { file: PathBuf },

    /// Get or set configuration
    #[command(display_order = 20)]
    Config {
        /// Configuration key (data-file, preview-rows)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print the location of the data file
    #[command(display_order = 21)]
    Path,
}
