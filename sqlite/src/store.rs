//! [`Store`] implementation backed by a rusqlite connection.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use inscribe_core::{JoinSpec, Record, StoreError, StoreQuery, StoreRows};
use rusqlite::{Connection, InterruptHandle, OpenFlags, Row};
use serde_json::{Map, Value};

use crate::render::{self, PRESENT, REMAINING, TOTAL};
use crate::values::SQLiteValue;

/// Executes planned queries against one SQLite connection.
///
/// The connection is serialized behind a mutex. A query running on another
/// thread can be cancelled through [`SqliteStore::interrupt`]; it then fails
/// with a store error and no partial page is returned.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    interrupt: InterruptHandle,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        let interrupt = conn.get_interrupt_handle();
        Self {
            conn: Mutex::new(conn),
            interrupt,
        }
    }

    /// Opens an existing database read-only. `path` may be a `file:` URI.
    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map(Self::new)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Connection::open_in_memory().map(Self::new)
    }

    /// Handle that aborts whatever statement the connection is running.
    pub fn interrupt_handle(&self) -> &InterruptHandle {
        &self.interrupt
    }

    pub fn interrupt(&self) {
        self.interrupt.interrupt();
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let conn = self.lock()?;
        f(&conn).map_err(store_error)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::execution("connection mutex poisoned"))
    }
}

impl inscribe_core::Store for SqliteStore {
    fn execute(&self, query: &StoreQuery) -> Result<StoreRows, StoreError> {
        let statement = render::render(query);
        let (sql, params) = statement.build();

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql).map_err(store_error)?;
        let layout = RowLayout::new(&stmt.column_names(), &query.joins);
        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter().copied()))
            .map_err(store_error)?;

        let mut out = StoreRows::default();
        while let Some(row) = rows.next().map_err(store_error)? {
            out.total = count(row, 0)?;
            out.remaining = count(row, 1)?;
            let present: Option<i64> = row.get(2).map_err(store_error)?;
            if present.is_some() {
                out.rows.push(layout.record(row)?);
            }
        }
        Ok(out)
    }
}

fn count(row: &Row<'_>, idx: usize) -> Result<u64, StoreError> {
    let n: i64 = row.get(idx).map_err(store_error)?;
    Ok(n.unsigned_abs())
}

fn store_error(err: rusqlite::Error) -> StoreError {
    match err.sqlite_error_code() {
        Some(rusqlite::ErrorCode::OperationInterrupted) => StoreError::new("query interrupted", err.to_string()),
        _ => StoreError::execution(err),
    }
}

/// Where each output field lives in a result row.
struct RowLayout {
    columns: Vec<(usize, String)>,
    joins: Vec<JoinLayout>,
}

struct JoinLayout {
    name: String,
    marker: Option<usize>,
    columns: Vec<(usize, String)>,
}

impl RowLayout {
    fn new(names: &[&str], joins: &[JoinSpec]) -> Self {
        let fixed = [TOTAL, REMAINING, PRESENT];
        let mut layout = Self {
            columns: Vec::new(),
            joins: joins
                .iter()
                .map(|join| JoinLayout {
                    name: join.alias.clone(),
                    marker: None,
                    columns: Vec::new(),
                })
                .collect(),
        };

        for (idx, name) in names.iter().enumerate().skip(fixed.len()) {
            let joined = name.split_once('.').and_then(|(relation, column)| {
                layout
                    .joins
                    .iter_mut()
                    .find(|j| j.name == relation)
                    .map(|j| (j, column))
            });
            match joined {
                Some((join, "")) => join.marker = Some(idx),
                Some((join, column)) => join.columns.push((idx, column.to_string())),
                None => layout.columns.push((idx, name.to_string())),
            }
        }
        layout
    }

    fn record(&self, row: &Row<'_>) -> Result<Record, StoreError> {
        let mut record = Map::with_capacity(self.columns.len() + self.joins.len());
        for (idx, name) in &self.columns {
            record.insert(name.clone(), value(row, *idx)?);
        }

        for join in &self.joins {
            let matched = match join.marker {
                Some(idx) => !value(row, idx)?.is_null(),
                None => false,
            };
            let sub = if matched {
                let mut sub = Map::with_capacity(join.columns.len());
                for (idx, name) in &join.columns {
                    sub.insert(name.clone(), value(row, *idx)?);
                }
                Value::Object(sub)
            } else {
                Value::Null
            };
            record.insert(join.name.clone(), sub);
        }
        Ok(record)
    }
}

fn value(row: &Row<'_>, idx: usize) -> Result<Value, StoreError> {
    row.get::<_, SQLiteValue<'static>>(idx)
        .map(SQLiteValue::into_json)
        .map_err(store_error)
}
