use std::fmt;
use thiserror::Error;

/// The rule a draft broke when `add` rejected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingName,
    MissingEmail,
    MissingCourses,
    AgeBelowMinimum { age: u32, minimum: u32 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingName => write!(f, "name is required"),
            ValidationIssue::MissingEmail => write!(f, "email is required"),
            ValidationIssue::MissingCourses => write!(f, "at least one course is required"),
            ValidationIssue::AgeBelowMinimum { age, minimum } => {
                write!(f, "age must be {} or above (got {})", minimum, age)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Invalid student: {0}")]
    Validation(ValidationIssue),

    #[error("Student not found: {0}")]
    NotFound(String),

    #[error("Could not allocate a unique student id after {0} attempts")]
    IdExhausted(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Import rejected: {0}")]
    ImportFormat(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl RosterError {
    /// True for failures of the underlying storage (read, write or encode).
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            RosterError::Io(_) | RosterError::Serialization(_) | RosterError::Store(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
