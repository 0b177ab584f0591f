//! Error types for puzzlecron
//!
//! Centralized error handling using thiserror. Validation issues are never
//! errors; they travel as data in a `ValidationReport`. These variants cover
//! the collaborators (generator, storage, alerting) and unparseable output.

use thiserror::Error;

/// All error types that can occur in puzzlecron
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// Generator output could not be turned into a JSON record
    #[error("Parse error: {0}")]
    Parse(String),

    /// A candidate puzzle broke a rule (fail-fast path)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generator (LLM) call failed
    #[error("Generator error: {0}")]
    Generator(String),

    /// Attempt budget exhausted in the generation loop
    #[error("Failed to generate valid puzzle after {attempts} attempts. Last error: {last_error}")]
    GenerationFailed { attempts: u32, last_error: String },

    /// Invalid input from the caller (bad date, unknown tier, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl PuzzleError {
    /// Whether the generation loop should spend another attempt on this error
    pub fn is_retryable(&self) -> bool {
        !matches!(self, PuzzleError::InvalidInput(_) | PuzzleError::GenerationFailed { .. })
    }
}

/// Result type alias for puzzlecron operations
pub type Result<T> = std::result::Result<T, PuzzleError>;
