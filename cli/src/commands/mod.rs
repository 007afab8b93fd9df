//! CLI command implementations
//!
//! Each command module implements one `inscribe` subcommand.

pub mod check;
pub mod explain;
pub mod get;
pub mod query;

use std::path::Path;

use inscribe_sqlite::SqliteStore;

use crate::error::CliError;

/// Opens `path` read-only; queries never write.
pub fn open_store(path: &Path) -> Result<SqliteStore, CliError> {
    let store = SqliteStore::open(path)?;
    tracing::debug!(path = %path.display(), "opened database");
    Ok(store)
}
