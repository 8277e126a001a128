//! PolyAssist Error Types
//!
//! Centralized error handling for the library and daemon.

use thiserror::Error;

/// Central error type for PolyAssist
#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Action engine error: {0}")]
    Engine(#[from] crate::core::engine::EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IPC error: {0}")]
    Ipc(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for PolyAssist operations
pub type AssistResult<T> = Result<T, AssistError>;
