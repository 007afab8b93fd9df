//! In-memory store over JSON rows.
//!
//! Evaluates the same predicate clauses as a SQL store, with the same null
//! and ordering rules, so it can stand in for a database in tests or serve
//! small embedded datasets.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::expand::JoinSpec;
use crate::query::SortDirection;

use super::{PageBound, Record, Store, StoreQuery, StoreRows, compare_values, keyset_of};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row to `table`, creating the table on first use.
    ///
    /// Non-object values are ignored.
    pub fn insert(&mut self, table: &str, row: Value) {
        if let Value::Object(row) = row {
            self.tables.entry(table.to_string()).or_default().push(row);
        }
    }

    pub fn with_table<I>(mut self, table: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.tables.entry(table.to_string()).or_default();
        for row in rows {
            self.insert(table, row);
        }
        self
    }

    pub fn rows(&self, table: &str) -> Option<&[Record]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    fn table(&self, name: &str) -> Result<&[Record], StoreError> {
        self.rows(name)
            .ok_or_else(|| StoreError::execution(format!("no such table: {name}")))
    }

    /// First row of the joined table whose foreign key equals the local key.
    fn lookup<'a>(&'a self, join: &JoinSpec, record: &Record) -> Result<Option<&'a Record>, StoreError> {
        let related = self.table(&join.table)?;
        let local = record.get(&join.local_key).unwrap_or(&Value::Null);
        if local.is_null() {
            return Ok(None);
        }
        Ok(related.iter().find(|row| {
            row.get(&join.foreign_key)
                .is_some_and(|foreign| compare_values(foreign, local).is_eq())
        }))
    }
}

impl Store for MemoryStore {
    fn execute(&self, query: &StoreQuery) -> Result<StoreRows, StoreError> {
        let source = self.table(&query.table)?;

        let mut filtered: Vec<&Record> = source
            .iter()
            .filter(|record| query.predicates.iter().all(|p| p.matches(record)))
            .collect();
        let total = filtered.len() as u64;

        let direction = query.sort.direction;
        filtered.sort_by(|a, b| {
            let ordering = query
                .sort
                .fields
                .iter()
                .map(|field| {
                    compare_values(
                        a.get(field).unwrap_or(&Value::Null),
                        b.get(field).unwrap_or(&Value::Null),
                    )
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(core::cmp::Ordering::Equal);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let bounded: Vec<&Record> = match &query.bound {
            PageBound::Offset(offset) => filtered
                .into_iter()
                .skip(usize::try_from(*offset).unwrap_or(usize::MAX))
                .collect(),
            PageBound::Keyset(bound) => filtered
                .into_iter()
                .filter(|record| {
                    keyset_of(record, &bound.primary, &bound.secondary).is_some_and(|key| bound.admits(key))
                })
                .collect(),
        };
        let remaining = bounded.len() as u64;

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let mut rows = Vec::with_capacity(limit.min(bounded.len()));
        for record in bounded.into_iter().take(limit) {
            rows.push(self.shape(query, record)?);
        }

        Ok(StoreRows {
            rows,
            total,
            remaining,
        })
    }
}

impl MemoryStore {
    /// Selects the requested columns and attaches one sub-object per join.
    fn shape(&self, query: &StoreQuery, record: &Record) -> Result<Record, StoreError> {
        let mut out = if query.columns.is_empty() {
            record.clone()
        } else {
            query
                .columns
                .iter()
                .map(|column| (column.clone(), record.get(column).cloned().unwrap_or(Value::Null)))
                .collect()
        };

        for join in &query.joins {
            let sub = match self.lookup(join, record)? {
                Some(related) => Value::Object(
                    join.columns
                        .iter()
                        .map(|column| (column.clone(), related.get(column).cloned().unwrap_or(Value::Null)))
                        .collect::<Map<_, _>>(),
                ),
                None => Value::Null,
            };
            out.insert(join.alias.clone(), sub);
        }
        Ok(out)
    }
}
