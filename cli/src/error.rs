//! Error types for the CLI

use inscribe_core::{QueryError, StoreError};
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The database could not be opened
    #[error("Database error: {0}")]
    Database(#[from] inscribe_sqlite::rusqlite::Error),

    /// A statement failed outside of a query
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The engine rejected or failed the request
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: request problems are distinguished from failures.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Query(err) => exit_code(err.status()),
            _ => 1,
        }
    }
}

/// Maps a response status to the process exit code.
pub const fn exit_code(status: u16) -> u8 {
    match status {
        404 => 3,
        400..=499 => 2,
        _ => 1,
    }
}
