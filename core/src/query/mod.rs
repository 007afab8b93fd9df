//! The validated, typed form of one read request.

mod parse;

pub use parse::parse;

use core::fmt;

use serde::Serialize;

use crate::filter::{self, FilterSpec, Predicate};
use crate::projection::PathPattern;

/// Sort direction, shared by the ORDER BY and the keyset comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered sort fields, all sorted in the same direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub fields: Vec<String>,
    pub direction: SortDirection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetSpec {
    /// 1-based
    pub page: u64,
    pub page_size: u64,
}

impl OffsetSpec {
    /// Rows skipped before this page, saturating at `u64::MAX`.
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Keyset position decoded from a `page_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorSpec {
    pub primary: i64,
    pub secondary: i64,
    pub page_size: u64,
}

impl CursorSpec {
    /// Decodes `"{primary}_{secondary}"`, splitting on the first `_`.
    pub fn decode(raw: &str) -> Option<(i64, i64)> {
        let (primary, secondary) = raw.split_once('_')?;
        Some((primary.parse().ok()?, secondary.parse().ok()?))
    }

    pub fn encode(primary: i64, secondary: i64) -> String {
        format!("{primary}_{secondary}")
    }
}

/// Exactly one pagination mode per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pagination {
    Offset(OffsetSpec),
    Cursor(CursorSpec),
}

impl Pagination {
    pub const fn page_size(&self) -> u64 {
        match self {
            Self::Offset(spec) => spec.page_size,
            Self::Cursor(spec) => spec.page_size,
        }
    }

    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Offset(_) => "offset",
            Self::Cursor(_) => "cursor",
        }
    }
}

/// All filters targeting one field, ANDed together.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub specs: Vec<FilterSpec>,
}

/// One parsed read request. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
    pub entity: String,
    /// In the order fields first appeared in the request
    pub filters: Vec<FieldFilter>,
    pub pagination: Pagination,
    pub sort: SortSpec,
    /// Requested relations, deduplicated, in request order
    pub expansions: Vec<String>,
    pub include: Vec<PathPattern>,
    pub exclude: Vec<PathPattern>,
}

impl QueryRequest {
    pub fn filters_for(&self, field: &str) -> Option<&[FilterSpec]> {
        self.filters
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.specs.as_slice())
    }

    /// Compiles the filters into predicate clauses.
    pub fn predicates(&self) -> Vec<Predicate> {
        filter::compile(
            self.filters
                .iter()
                .map(|f| (f.field.as_str(), f.specs.as_slice())),
        )
    }
}
