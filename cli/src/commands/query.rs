//! Query command - lists an entity

use inscribe_core::{Engine, RawParams};
use inscribe_sqlite::SqliteStore;
use serde_json::Value;

use crate::config::Config;
use crate::error::CliError;

/// Runs `query` (a URL query string) against `entity` and returns the page body.
pub fn run(config: &Config, store: &SqliteStore, entity: &str, query: &str) -> Result<Value, CliError> {
    let schema = config.entity(entity)?;
    let params = RawParams::from_query_string(query);

    let page = Engine::new(config.engine).list(store, schema, &params)?;
    tracing::info!(
        entity,
        rows = page.data.len(),
        total = page.pagination.total(),
        "listed"
    );
    Ok(serde_json::to_value(page)?)
}
