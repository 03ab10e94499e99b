use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Task '{0}' is not a recurring template")]
    NotATemplate(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, Subject)

    #[error("Invalid import: {0}")]
    InvalidImport(String),
}
