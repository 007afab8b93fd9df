//! The store capability the engine executes against.
//!
//! A [`StoreQuery`] is fully planned before it reaches a store: predicates are
//! compiled, joins resolved and the page boundary fixed. A store runs it in a
//! single round trip and reports the filtered total alongside the page.

mod memory;

pub use memory::MemoryStore;

use core::cmp::Ordering;

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::expand::JoinSpec;
use crate::filter::Predicate;
use crate::query::{SortDirection, SortSpec};

/// One result record: column name → value, plus one key per expansion.
pub type Record = Map<String, Value>;

/// Composite keyset position. Rows strictly past `after` in `direction` are
/// eligible for the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeysetBound {
    pub primary: String,
    pub secondary: String,
    pub after: (i64, i64),
    pub direction: SortDirection,
}

impl KeysetBound {
    /// Whether `key` lies strictly past the bound.
    pub fn admits(&self, key: (i64, i64)) -> bool {
        match self.direction {
            SortDirection::Asc => key > self.after,
            SortDirection::Desc => key < self.after,
        }
    }
}

/// Where a page starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageBound {
    /// Skip this many filtered rows
    Offset(u64),
    /// Keyset predicate ANDed with the filters, no skip
    Keyset(KeysetBound),
}

/// A bounded, fully planned read of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreQuery {
    pub entity: String,
    pub table: String,
    /// Columns of the primary entity to return; empty selects every column
    pub columns: Vec<String>,
    pub joins: Vec<JoinSpec>,
    /// ANDed together
    pub predicates: Vec<Predicate>,
    pub sort: SortSpec,
    pub limit: u64,
    pub bound: PageBound,
}

/// Rows of one page plus the aggregates computed in the same pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreRows {
    pub rows: Vec<Record>,
    /// Rows matching the predicates, ignoring the page bound
    pub total: u64,
    /// Rows matching the predicates and the page bound, before the limit
    pub remaining: u64,
}

/// Executes planned queries. Implementations must be safe to share between
/// requests.
pub trait Store: Send + Sync {
    fn execute(&self, query: &StoreQuery) -> Result<StoreRows, StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn execute(&self, query: &StoreQuery) -> Result<StoreRows, StoreError> {
        (**self).execute(query)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn execute(&self, query: &StoreQuery) -> Result<StoreRows, StoreError> {
        (**self).execute(query)
    }
}

/// Total order over stored JSON scalars matching SQLite's `ORDER BY`:
/// `null` sorts first, then numbers, then text, then anything else.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) | Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::Array(_) | Value::Object(_) => 3,
        }
    }

    fn number(value: &Value) -> Option<f64> {
        match value {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => number(a).partial_cmp(&number(b)).unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ if rank(a) == 1 && rank(b) == 1 => number(a).partial_cmp(&number(b)).unwrap_or(Ordering::Equal),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Reads the `(primary, secondary)` keyset position of a record.
pub fn keyset_of(record: &Record, primary: &str, secondary: &str) -> Option<(i64, i64)> {
    Some((record.get(primary)?.as_i64()?, record.get(secondary)?.as_i64()?))
}
