//! inscribe CLI - runs list and lookup requests against a SQLite database
//!
//! Entities are described in an `inscribe.toml` file instead of Rust code,
//! and requests are given as URL query strings, exactly as an HTTP handler
//! would receive them.
//!
//! # Commands
//!
//! - `inscribe query <entity> "<query>"` - list a page of records
//! - `inscribe get <entity> <id> "<query>"` - fetch one record
//! - `inscribe explain <entity> "<query>"` - print the SQL a query would run
//! - `inscribe check` - validate the configuration against the database
//!
//! Results and error bodies are printed as JSON on stdout. Invalid requests
//! exit with status 2, lookups that match nothing with 3.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use config::{Config, Error as ConfigError};
pub use error::CliError;
