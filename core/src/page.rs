//! Pagination Engine
//!
//! Plans the bounded store query for a request and derives the pagination
//! metadata from what the store returns.
//!
//! Offset mode skips `(page - 1) * page_size` filtered rows. Cursor mode adds a
//! strict keyset bound on the composite `(primary, secondary)` key and never
//! skips. Both report `total` over the full filtered set.

use serde::Serialize;
use serde_json::Value;

use crate::error::{QueryError, Result};
use crate::expand;
use crate::query::{CursorSpec, OffsetSpec, Pagination, QueryRequest};
use crate::schema::{CursorKey, EntitySchema};
use crate::store::{KeysetBound, PageBound, StoreQuery, StoreRows, keyset_of};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OffsetMeta {
    pub total: u64,
    pub page_size: u64,
    pub pages: u64,
    pub page: u64,
    pub prev: Option<u64>,
    pub next: Option<u64>,
    pub has_more: bool,
}

impl OffsetMeta {
    pub fn new(spec: &OffsetSpec, total: u64) -> Self {
        let next = (total > spec.offset().saturating_add(spec.page_size)).then_some(spec.page + 1);
        Self {
            total,
            page_size: spec.page_size,
            pages: total.div_ceil(spec.page_size),
            page: spec.page,
            prev: (spec.page > 1).then(|| spec.page - 1),
            next,
            has_more: next.is_some(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CursorMeta {
    pub total: u64,
    pub page_size: u64,
    /// Position of the last returned row, only when more rows follow it
    pub page_key: Option<String>,
    pub has_more: bool,
}

impl CursorMeta {
    pub fn new(spec: &CursorSpec, key: &CursorKey, rows: &StoreRows) -> Self {
        let has_more = rows.remaining > rows.rows.len() as u64;
        let page_key = has_more
            .then(|| rows.rows.last())
            .flatten()
            .and_then(|last| keyset_of(last, &key.primary, &key.secondary))
            .map(|(primary, secondary)| CursorSpec::encode(primary, secondary));
        Self {
            total: rows.total,
            page_size: spec.page_size,
            page_key,
            has_more,
        }
    }
}

/// Metadata for whichever pagination mode the request used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PaginationMeta {
    Offset(OffsetMeta),
    Cursor(CursorMeta),
}

impl PaginationMeta {
    pub fn from_rows(pagination: &Pagination, key: &CursorKey, rows: &StoreRows) -> Self {
        match pagination {
            Pagination::Offset(spec) => Self::Offset(OffsetMeta::new(spec, rows.total)),
            Pagination::Cursor(spec) => Self::Cursor(CursorMeta::new(spec, key, rows)),
        }
    }

    pub const fn total(&self) -> u64 {
        match self {
            Self::Offset(meta) => meta.total,
            Self::Cursor(meta) => meta.total,
        }
    }

    pub const fn has_more(&self) -> bool {
        match self {
            Self::Offset(meta) => meta.has_more,
            Self::Cursor(meta) => meta.has_more,
        }
    }
}

/// `{"pagination": {...}, "data": [...]}`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultPage {
    pub pagination: PaginationMeta,
    pub data: Vec<Value>,
}

/// Builds the store query for `request`.
///
/// The cursor key columns are always selected so the next `page_key` can be
/// read from the last row.
pub fn plan(schema: &EntitySchema, request: &QueryRequest) -> Result<StoreQuery> {
    let joins = expand::resolve(schema, &request.expansions).map_err(QueryError::Validation)?;

    let mut columns = schema.columns.clone();
    if !columns.is_empty() {
        for key in [&schema.cursor_key.primary, &schema.cursor_key.secondary] {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let bound = match &request.pagination {
        Pagination::Offset(spec) => PageBound::Offset(spec.offset()),
        Pagination::Cursor(spec) => PageBound::Keyset(KeysetBound {
            primary: schema.cursor_key.primary.clone(),
            secondary: schema.cursor_key.secondary.clone(),
            after: (spec.primary, spec.secondary),
            direction: request.sort.direction,
        }),
    };

    Ok(StoreQuery {
        entity: schema.name.clone(),
        table: schema.table.clone(),
        columns,
        joins,
        predicates: request.predicates(),
        sort: request.sort.clone(),
        limit: request.pagination.page_size(),
        bound,
    })
}
