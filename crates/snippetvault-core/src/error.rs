use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised by the zip library while building an export archive.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Snippet {0} not found")]
    SnippetNotFound(u64),

    #[error("File '{0}' not found in snippet")]
    FileNotFound(String),

    #[error("Variable '{0}' not found in snippet")]
    VariableNotFound(String),

    #[error("Invalid variable name '{0}': only letters, digits and '_' are allowed")]
    InvalidVariableName(String),

    #[error("Invalid assignment '{0}': expected NAME=value")]
    InvalidAssignment(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;
