//! Explain command - shows the statement a query would run

use inscribe_core::{Engine, RawParams, page};
use inscribe_sqlite::SQLiteValue;

use crate::config::Config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explained {
    pub sql: String,
    pub params: Vec<String>,
}

/// Parses and plans `query` without touching the database.
pub fn run(config: &Config, entity: &str, query: &str) -> Result<Explained, CliError> {
    let schema = config.entity(entity)?;
    let request = Engine::new(config.engine).parse(schema, &RawParams::from_query_string(query))?;
    let planned = page::plan(schema, &request)?;

    let statement = inscribe_sqlite::render(&planned);
    let (sql, params) = statement.build();
    Ok(Explained {
        sql,
        params: params.iter().map(|p| literal(p)).collect(),
    })
}

pub fn print(explained: &Explained) {
    println!("{}", output::heading("Statement"));
    println!("{}", explained.sql);
    println!();
    println!("{}", output::heading("Parameters"));
    for (i, param) in explained.params.iter().enumerate() {
        println!("  {} {}", output::muted(&format!("?{}", i + 1)), param);
    }
}

fn literal(value: &SQLiteValue<'_>) -> String {
    match value {
        SQLiteValue::Text(text) => format!("'{}'", text.replace('\'', "''")),
        SQLiteValue::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}
