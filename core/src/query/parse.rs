//! Query Parser: raw parameters → [`QueryRequest`].
//!
//! Every problem is collected into one [`ValidationErrors`] so a caller sees
//! all offending parameters at once. Nothing here touches a store.

use crate::config::EngineConfig;
use crate::error::{Issue, IssueCode, QueryError, Result, ValidationErrors};
use crate::filter::{FilterOperator, FilterSpec};
use crate::params::{RawParams, split_bracket_key};
use crate::projection::PathPattern;
use crate::schema::EntitySchema;

use super::{CursorSpec, FieldFilter, OffsetSpec, Pagination, QueryRequest, SortDirection, SortSpec};

const PAGE: &str = "page";
const PAGE_SIZE: &str = "page_size";
const PAGE_KEY: &str = "page_key";
const ORDER: &str = "order";
const EXPAND: &str = "expand";
const INCLUDE: &str = "include";
const EXCLUDE: &str = "exclude";
const WHERE: &str = "where";

/// Parses and validates `params` against `schema`.
pub fn parse(schema: &EntitySchema, params: &RawParams, config: &EngineConfig) -> Result<QueryRequest> {
    let mut issues = ValidationErrors::new();
    let mut top_level: Vec<FieldFilter> = Vec::new();
    let mut nested: Vec<FieldFilter> = Vec::new();

    let mut page = None;
    let mut page_size = None;
    let mut page_key = None;
    let mut order = None;
    let mut expand = Vec::new();
    let mut include = Vec::new();
    let mut exclude = Vec::new();

    for (key, value) in params.iter() {
        match key {
            PAGE => page = Some(value),
            PAGE_SIZE => page_size = Some(value),
            PAGE_KEY => page_key = Some(value),
            ORDER => order = Some(value),
            EXPAND => expand.push(value),
            INCLUDE => include.push(value),
            EXCLUDE => exclude.push(value),
            _ => match split_bracket_key(key) {
                Some((WHERE, segments)) => {
                    if let Some((field, spec)) = parse_where(schema, &segments, value, &mut issues) {
                        push_spec(&mut nested, field, spec);
                    }
                }
                Some(_) => issues.push(Issue::new(
                    IssueCode::UnknownField,
                    format!("unknown parameter '{key}'"),
                    [key],
                )),
                None => {
                    if let Some(spec) = parse_top_level(schema, key, value, &mut issues) {
                        push_spec(&mut top_level, key, spec);
                    }
                }
            },
        }
    }

    let filters = merge_filters(top_level, nested);
    let direction = parse_order(order, &mut issues);
    let pagination = parse_pagination(page, page_size, page_key, config, &mut issues);
    let expansions = parse_expansions(schema, &expand, &mut issues);
    let include = parse_patterns(INCLUDE, &include, &mut issues);
    let exclude = parse_patterns(EXCLUDE, &exclude, &mut issues);

    if !issues.is_empty() {
        crate::inscribe_trace_invalid!(schema.name, issues.len());
    }

    // Every path that leaves pagination unset has recorded an issue.
    let Some(pagination) = pagination else {
        return Err(QueryError::Validation(issues));
    };

    issues.finish(QueryRequest {
        entity: schema.name.clone(),
        filters,
        pagination,
        sort: SortSpec {
            fields: vec![
                schema.cursor_key.primary.clone(),
                schema.cursor_key.secondary.clone(),
            ],
            direction,
        },
        expansions,
        include,
        exclude,
    })
}

/// `field=value`, `field=op:value` or `field=range:min,max`.
fn parse_top_level(
    schema: &EntitySchema,
    field: &str,
    raw: &str,
    issues: &mut ValidationErrors,
) -> Option<FilterSpec> {
    let Some(kind) = schema.field_kind(field) else {
        issues.push(Issue::new(
            IssueCode::UnknownField,
            format!("'{field}' is not a filterable field of {}", schema.name),
            [field],
        ));
        return None;
    };

    let (op, value) = split_operator(raw);
    FilterSpec::build(kind, op, value, &[field])
        .map_err(|issue| issues.push(issue))
        .ok()
}

/// `where[field][op]=value` or `where[field]=value`.
fn parse_where<'a>(
    schema: &EntitySchema,
    segments: &[&'a str],
    raw: &str,
    issues: &mut ValidationErrors,
) -> Option<(&'a str, FilterSpec)> {
    let (field, op_name) = match segments {
        [field] => (*field, None),
        [field, op] => (*field, Some(*op)),
        _ => {
            issues.push(Issue::new(
                IssueCode::UnknownField,
                "expected where[field] or where[field][op]",
                core::iter::once(WHERE).chain(segments.iter().copied()),
            ));
            return None;
        }
    };

    let Some(kind) = schema.field_kind(field) else {
        issues.push(Issue::new(
            IssueCode::UnknownField,
            format!("'{field}' is not a filterable field of {}", schema.name),
            [WHERE, field],
        ));
        return None;
    };

    let spec = match op_name {
        None => {
            let (op, value) = split_operator(raw);
            FilterSpec::build(kind, op, value, &[WHERE, field])
        }
        Some(name) => match FilterOperator::parse(name) {
            Some(op) => FilterSpec::build(kind, op, raw, &[WHERE, field, name]),
            None => Err(Issue::new(
                IssueCode::UnknownOperator,
                format!("unknown operator '{name}' for field '{field}'"),
                [WHERE, field, name],
            )),
        },
    };

    spec.map(|spec| (field, spec))
        .map_err(|issue| issues.push(issue))
        .ok()
}

/// Splits an explicit `op:` prefix. A prefix that is not an operator name is
/// part of the literal.
fn split_operator(raw: &str) -> (FilterOperator, &str) {
    raw.split_once(':')
        .and_then(|(prefix, rest)| FilterOperator::parse(prefix).map(|op| (op, rest)))
        .unwrap_or((FilterOperator::Eq, raw))
}

fn push_spec(filters: &mut Vec<FieldFilter>, field: &str, spec: FilterSpec) {
    match filters.iter_mut().find(|f| f.field == field) {
        Some(existing) => existing.specs.push(spec),
        None => filters.push(FieldFilter {
            field: field.to_string(),
            specs: vec![spec],
        }),
    }
}

/// `where` filters replace every top-level filter on the same field.
fn merge_filters(top_level: Vec<FieldFilter>, mut nested: Vec<FieldFilter>) -> Vec<FieldFilter> {
    let mut merged = Vec::with_capacity(top_level.len() + nested.len());
    for filter in top_level {
        match nested.iter().position(|n| n.field == filter.field) {
            Some(i) => merged.push(nested.remove(i)),
            None => merged.push(filter),
        }
    }
    merged.extend(nested);
    merged
}

fn parse_order(raw: Option<&str>, issues: &mut ValidationErrors) -> SortDirection {
    let Some(raw) = raw else {
        return SortDirection::default();
    };
    SortDirection::parse(raw).unwrap_or_else(|| {
        issues.push(Issue::new(
            IssueCode::InvalidOrder,
            format!("order must be 'asc' or 'desc', got '{raw}'"),
            [ORDER],
        ));
        SortDirection::default()
    })
}

fn parse_positive(name: &str, raw: &str, issues: &mut ValidationErrors) -> Option<u64> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Some(n.unsigned_abs()),
        Ok(n) => {
            issues.push(Issue::new(
                IssueCode::OutOfRange,
                format!("{name} must be at least 1, got {n}"),
                [name],
            ));
            None
        }
        Err(_) => {
            issues.push(Issue::new(
                IssueCode::InvalidInteger,
                format!("{name} must be an integer, got '{raw}'"),
                [name],
            ));
            None
        }
    }
}

fn parse_pagination(
    page: Option<&str>,
    page_size: Option<&str>,
    page_key: Option<&str>,
    config: &EngineConfig,
    issues: &mut ValidationErrors,
) -> Option<Pagination> {
    let page_size = match page_size {
        None => Some(config.default_page_size),
        Some(raw) => match parse_positive(PAGE_SIZE, raw, issues) {
            Some(size) if size > config.max_page_size => {
                issues.push(Issue::new(
                    IssueCode::OutOfRange,
                    format!("page_size must be at most {}, got {size}", config.max_page_size),
                    [PAGE_SIZE],
                ));
                None
            }
            size => size,
        },
    };

    // `page_key` wins over `page` whenever it is non-empty.
    if let Some(key) = page_key.filter(|key| !key.is_empty()) {
        let Some((primary, secondary)) = CursorSpec::decode(key) else {
            issues.push(Issue::new(
                IssueCode::InvalidCursor,
                format!("page_key must look like '<integer>_<integer>', got '{key}'"),
                [PAGE_KEY],
            ));
            return None;
        };
        return Some(Pagination::Cursor(CursorSpec {
            primary,
            secondary,
            page_size: page_size?,
        }));
    }

    let page = match page {
        None => Some(1),
        Some(raw) => parse_positive(PAGE, raw, issues),
    };
    let (page, page_size) = (page?, page_size?);

    // The end of the window must stay representable as a store offset.
    if page.checked_mul(page_size).is_none_or(|end| end > i64::MAX as u64) {
        issues.push(Issue::new(
            IssueCode::OutOfRange,
            format!("page {page} is out of range for page_size {page_size}"),
            [PAGE],
        ));
        return None;
    }

    Some(Pagination::Offset(OffsetSpec { page, page_size }))
}

fn comma_separated<'a>(raw: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
    raw.iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn parse_expansions(schema: &EntitySchema, raw: &[&str], issues: &mut ValidationErrors) -> Vec<String> {
    let mut expansions: Vec<String> = Vec::new();
    for name in comma_separated(raw) {
        if schema.relation_named(name).is_none() {
            issues.push(Issue::new(
                IssueCode::UnknownRelation,
                format!("'{name}' is not an expandable relation of {}", schema.name),
                [EXPAND, name],
            ));
        } else if !expansions.iter().any(|e| e == name) {
            expansions.push(name.to_string());
        }
    }
    expansions
}

fn parse_patterns(param: &str, raw: &[&str], issues: &mut ValidationErrors) -> Vec<PathPattern> {
    comma_separated(raw)
        .filter_map(|path| match PathPattern::new(path) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                issues.push(Issue::new(
                    IssueCode::InvalidPattern,
                    format!("invalid pattern '{path}': {}", err.msg),
                    [param, path],
                ));
                None
            }
        })
        .collect()
}
