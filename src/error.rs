//! Error handling for the movie agent
//!
//! Two layers of errors exist:
//! - [`SourceError`] for failures of external collaborators (graph, vectors,
//!   recognizer, ...). These are caught where the collaborator is used,
//!   logged, and treated as "no answer from this source".
//! - [`AgentError`] for library-level failures (bad arguments, config and
//!   dataset loading). These never reach the conversation transport from
//!   `handle_message`.

use thiserror::Error;

/// Failure reported by an external collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Source '{source_name}' is unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("Query failed: {0}")]
    Query(String),

    #[error("No vector stored for '{0}'")]
    MissingVector(String),

    #[error("Rewrite failed: {0}")]
    Rewrite(String),

    #[error("Classification failed: {0}")]
    Classification(String),
}

impl SourceError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Unavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for the movie agent
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid kind '{0}' specified. Must be one of 'movie', 'person' or 'relation'")]
    InvalidKind(String),

    #[error("Invalid question category '{0}'")]
    InvalidCategory(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, AgentError>;
