use crate::config::RosterConfig;
use crate::model::Student;
use std::path::PathBuf;

pub mod add;
pub mod config;
pub mod courses;
pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod list;
pub mod paths;
pub mod search;
pub mod update;

/// Where roster keeps its configuration (and, by default, its data file).
#[derive(Debug, Clone)]
pub struct RosterPaths {
    pub home: PathBuf,
}

impl RosterPaths {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Records created, changed or removed by the command.
    pub affected_students: Vec<Student>,
    /// Records to display.
    pub listed_students: Vec<Student>,
    /// Size of the whole roster, for "showing X of Y" style output.
    pub roster_size: usize,
    pub courses: Vec<String>,
    /// Encoded snapshot, when an export was not written to a file.
    pub export: Option<String>,
    pub data_path: Option<PathBuf>,
    pub config: Option<RosterConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_students(mut self, students: Vec<Student>) -> Self {
        self.affected_students = students;
        self
    }

    pub fn with_listed_students(mut self, students: Vec<Student>, roster_size: usize) -> Self {
        self.listed_students = students;
        self.roster_size = roster_size;
        self
    }

    pub fn with_courses(mut self, courses: Vec<String>) -> Self {
        self.courses = courses;
        self
    }

    pub fn with_export(mut self, payload: String) -> Self {
        self.export = Some(payload);
        self
    }

    pub fn with_data_path(mut self, path: PathBuf) -> Self {
        self.data_path = Some(path);
        self
    }

    pub fn with_config(mut self, config: RosterConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Short "Name (id)" label used in command messages.
pub(crate) fn label(student: &Student) -> String {
    if student.name.is_empty() {
        student.student_id.clone()
    } else {
        format!("{} ({})", student.name, student.student_id)
    }
}
