//! SQLite store for inscribe
//!
//! Renders planned queries into one SQLite statement with a small
//! chunk-based SQL builder and executes them with `rusqlite`.

pub mod render;
pub mod sql;
pub mod values;

#[cfg(feature = "rusqlite")]
mod store;

pub use render::render;
pub use sql::{SQL, SQLChunk, Token};
pub use values::SQLiteValue;

#[cfg(feature = "rusqlite")]
pub use store::SqliteStore;

#[cfg(feature = "rusqlite")]
pub use rusqlite;
