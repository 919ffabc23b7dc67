use thiserror::Error;

/// Coarse classification of an [`Error`], used by callers to decide whether a
/// failure is recoverable (rejected edit) or points at broken data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An id did not resolve to a task. Ids are expected to always resolve.
    Lookup,
    /// The edit was rejected; the displayed snapshot stays untouched.
    InvalidEdit,
    /// The snapshot itself is inconsistent or contains unsupported data.
    DataIntegrity,
    Io,
    Session,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse task graph JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Task '{0}' not found in task graph")]
    TaskNotFound(String),

    #[error("Cannot modify {task_type} field '{field}'")]
    InvalidField { task_type: String, field: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Unsupported task type '{task_type}' (task '{task_id}')")]
    UnsupportedTaskType { task_type: String, task_id: String },

    #[error("Task id '{0}' is used by more than one task")]
    DuplicateTaskId(String),

    #[error("'{owner}' references unknown task '{reference}' via {via}")]
    DanglingReference {
        owner: String,
        reference: String,
        via: &'static str,
    },

    #[error("Dependency cycle detected through task '{0}'")]
    DependencyCycle(String),

    #[error("No task graph snapshot has been received yet")]
    NoSnapshot,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IoError(_) | Error::DeserializationError(_) => ErrorKind::Io,
            Error::TaskNotFound(_) => ErrorKind::Lookup,
            Error::InvalidField { .. } | Error::InvalidFieldValue { .. } => ErrorKind::InvalidEdit,
            Error::UnsupportedTaskType { .. }
            | Error::DuplicateTaskId(_)
            | Error::DanglingReference { .. }
            | Error::DependencyCycle(_) => ErrorKind::DataIntegrity,
            Error::NoSnapshot => ErrorKind::Session,
        }
    }

    /// True for errors that reject an edit without touching the snapshot.
    pub fn is_rejected_edit(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidEdit | ErrorKind::Lookup)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
