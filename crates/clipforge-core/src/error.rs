//! Error types for clipforge.

use thiserror::Error;

/// Main error type for clipforge operations.
#[derive(Error, Debug)]
pub enum ClipforgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field was malformed or out of range at construction or load time.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An action name was not registered with the engine.
    #[error("Unknown action '{name}'. Available: {}", available.join(", "))]
    UnknownAction {
        name: String,
        available: Vec<String>,
    },

    /// A registered action's preconditions failed.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for clipforge operations.
pub type Result<T> = std::result::Result<T, ClipforgeError>;
