//! Renders a planned [`StoreQuery`] into a single SQLite statement.
//!
//! ```text
//! WITH "filtered" AS (SELECT <columns>, <joined columns> FROM <table> <joins> WHERE <predicates>),
//!      "counted" AS (SELECT COUNT(*) AS "__total", <remaining> AS "__remaining" FROM "filtered")
//! SELECT "counted"."__total", "counted"."__remaining", "page".*
//! FROM "counted" LEFT JOIN (SELECT 1 AS "__present", * FROM "filtered" <bound> ORDER BY .. LIMIT ..) AS "page" ON 1
//! ```
//!
//! The outer LEFT JOIN yields exactly one row with a NULL `__present` when the
//! page is empty, so the counts always come back in the same round trip.
//! Joined columns are aliased `"<relation>.<column>"`; the relation's foreign
//! key is also selected as `"<relation>."` and is NULL only when no related
//! row matched.

use inscribe_core::filter::like_to_glob;
use inscribe_core::query::SortDirection;
use inscribe_core::{Comparison, JoinSpec, KeysetBound, PageBound, Predicate, StoreQuery};

use crate::sql::{SQL, Token};
use crate::values::SQLiteValue;

pub(crate) const TOTAL: &str = "__total";
pub(crate) const REMAINING: &str = "__remaining";
pub(crate) const PRESENT: &str = "__present";

const FILTERED: &str = "filtered";
const COUNTED: &str = "counted";
const PAGE: &str = "page";

/// Alias of the marker column that is NULL when `relation` matched nothing.
pub(crate) fn marker_alias(relation: &str) -> String {
    format!("{relation}.")
}

fn joined_alias(relation: &str, column: &str) -> String {
    format!("{relation}.{column}")
}

pub fn render(query: &StoreQuery) -> SQL<'_> {
    SQL::token(Token::WITH)
        .append(SQL::ident(FILTERED))
        .push(Token::AS)
        .append(filtered(query).parens())
        .push(Token::COMMA)
        .append(SQL::ident(COUNTED))
        .push(Token::AS)
        .append(counted(query).parens())
        .push(Token::SELECT)
        .append(SQL::join(
            [
                SQL::qualified(COUNTED, TOTAL),
                SQL::qualified(COUNTED, REMAINING),
                SQL::ident(PAGE).push(Token::DOT).push(Token::STAR),
            ],
            Token::COMMA,
        ))
        .push(Token::FROM)
        .append(SQL::ident(COUNTED))
        .push(Token::LEFT)
        .push(Token::JOIN)
        .append(page(query).parens())
        .push(Token::AS)
        .append(SQL::ident(PAGE))
        .push(Token::ON)
        .append(SQL::raw("1"))
        .append(order_by(query, Some(PAGE)))
}

fn filtered(query: &StoreQuery) -> SQL<'_> {
    let table = query.table.as_str();

    let mut columns: Vec<SQL<'_>> = if query.columns.is_empty() {
        vec![SQL::ident(table).push(Token::DOT).push(Token::STAR)]
    } else {
        query
            .columns
            .iter()
            .map(|column| SQL::qualified(table, column.as_str()).alias(column.as_str()))
            .collect()
    };
    for join in &query.joins {
        let alias = join.alias.as_str();
        columns.push(SQL::qualified(alias, join.foreign_key.as_str()).alias(marker_alias(alias)));
        columns.extend(
            join.columns
                .iter()
                .map(|column| SQL::qualified(alias, column.as_str()).alias(joined_alias(alias, column))),
        );
    }

    let mut sql = SQL::token(Token::SELECT)
        .append(SQL::join(columns, Token::COMMA))
        .push(Token::FROM)
        .append(SQL::ident(table));
    for join in &query.joins {
        sql.append_mut(join_clause(table, join));
    }
    if !query.predicates.is_empty() {
        sql = sql.push(Token::WHERE).append(SQL::join(
            query.predicates.iter().map(|p| predicate(table, p)),
            Token::AND,
        ));
    }
    sql
}

fn join_clause<'a>(table: &'a str, join: &'a JoinSpec) -> SQL<'a> {
    SQL::token(Token::LEFT)
        .push(Token::JOIN)
        .append(SQL::ident(join.table.as_str()))
        .push(Token::AS)
        .append(SQL::ident(join.alias.as_str()))
        .push(Token::ON)
        .append(SQL::qualified(table, join.local_key.as_str()))
        .push(Token::EQ)
        .append(SQL::qualified(join.alias.as_str(), join.foreign_key.as_str()))
}

fn predicate<'a>(table: &'a str, predicate: &'a Predicate) -> SQL<'a> {
    let column = SQL::qualified(table, predicate.field());
    match predicate {
        Predicate::Compare { cmp, value, .. } => column
            .push(comparison(*cmp))
            .append(SQL::param(SQLiteValue::from(value))),
        Predicate::Like { pattern, .. } => column
            .push(Token::GLOB)
            .append(SQL::param(like_to_glob(pattern))),
        Predicate::IsNull { .. } => column.push(Token::IS).push(Token::NULL),
        Predicate::IsNotNull { .. } => column.push(Token::IS).push(Token::NOT).push(Token::NULL),
    }
}

const fn comparison(cmp: Comparison) -> Token {
    match cmp {
        Comparison::Eq => Token::EQ,
        Comparison::Gt => Token::GT,
        Comparison::Lt => Token::LT,
        Comparison::Gte => Token::GE,
        Comparison::Lte => Token::LE,
    }
}

/// `("primary", "secondary") > (?, ?)`, or `<` when descending.
fn keyset(bound: &KeysetBound) -> SQL<'_> {
    let op = match bound.direction {
        SortDirection::Asc => Token::GT,
        SortDirection::Desc => Token::LT,
    };
    SQL::join(
        [SQL::ident(bound.primary.as_str()), SQL::ident(bound.secondary.as_str())],
        Token::COMMA,
    )
    .parens()
    .push(op)
    .append(SQL::join([SQL::param(bound.after.0), SQL::param(bound.after.1)], Token::COMMA).parens())
}

fn counted(query: &StoreQuery) -> SQL<'_> {
    let remaining = match &query.bound {
        PageBound::Offset(offset) => SQL::raw("MAX").append(
            SQL::raw("COUNT(*)")
                .push(Token::MINUS)
                .append(SQL::param(*offset))
                .push(Token::COMMA)
                .append(SQL::raw("0"))
                .parens(),
        ),
        PageBound::Keyset(bound) => SQL::token(Token::SELECT)
            .append(SQL::raw("COUNT(*)"))
            .push(Token::FROM)
            .append(SQL::ident(FILTERED))
            .push(Token::WHERE)
            .append(keyset(bound))
            .parens(),
    };

    SQL::token(Token::SELECT)
        .append(SQL::raw("COUNT(*)").alias(TOTAL))
        .push(Token::COMMA)
        .append(remaining.alias(REMAINING))
        .push(Token::FROM)
        .append(SQL::ident(FILTERED))
}

fn page(query: &StoreQuery) -> SQL<'_> {
    let mut sql = SQL::token(Token::SELECT)
        .append(SQL::raw("1").alias(PRESENT))
        .push(Token::COMMA)
        .push(Token::STAR)
        .push(Token::FROM)
        .append(SQL::ident(FILTERED));

    if let PageBound::Keyset(bound) = &query.bound {
        sql = sql.push(Token::WHERE).append(keyset(bound));
    }
    sql = sql
        .append(order_by(query, None))
        .push(Token::LIMIT)
        .append(SQL::param(query.limit));
    if let PageBound::Offset(offset) = &query.bound {
        sql = sql.push(Token::OFFSET).append(SQL::param(*offset));
    }
    sql
}

fn order_by<'a>(query: &'a StoreQuery, qualifier: Option<&'a str>) -> SQL<'a> {
    let direction = match query.sort.direction {
        SortDirection::Asc => Token::ASC,
        SortDirection::Desc => Token::DESC,
    };
    let fields = query.sort.fields.iter().map(|field| {
        match qualifier {
            Some(q) => SQL::qualified(q, field.as_str()),
            None => SQL::ident(field.as_str()),
        }
        .push(direction)
    });
    SQL::token(Token::ORDER)
        .push(Token::BY)
        .append(SQL::join(fields, Token::COMMA))
}
