//! Get command - fetches one record by id

use inscribe_core::{Engine, RawParams};
use inscribe_sqlite::SqliteStore;
use serde_json::Value;

use crate::config::Config;
use crate::error::CliError;

pub fn run(
    config: &Config,
    store: &SqliteStore,
    entity: &str,
    id: &str,
    query: &str,
) -> Result<Value, CliError> {
    let schema = config.entity(entity)?;
    let params = RawParams::from_query_string(query);
    Ok(Engine::new(config.engine).find_one(store, schema, id, &params)?)
}
