//! Shared fixture for the integration tests.
//!
//! Every scenario runs against the in-memory store and, with the `rusqlite`
//! feature, against an SQLite database seeded with the same rows.

mod fixture;

#[cfg(feature = "rusqlite")]
pub mod rusqlite;

pub use fixture::*;

use inscribe::prelude::*;
use serde_json::Value;

/// Defines one test per store for the same body.
///
/// ```ignore
/// store_test!(name, |store, fixture| { ... });
/// ```
#[macro_export]
macro_rules! store_test {
    ($name:ident, |$store:ident, $fixture:ident| $body:block) => {
        mod $name {
            use super::*;

            #[test]
            fn memory() {
                let $fixture = $crate::common::Fixture::standard();
                let $store = $fixture.memory_store();
                $body
            }

            #[cfg(feature = "rusqlite")]
            #[test]
            fn sqlite() {
                let $fixture = $crate::common::Fixture::standard();
                let $store = $crate::common::rusqlite::store(&$fixture);
                $body
            }
        }
    };
}

/// Lists inscriptions for `query`, panicking on any error.
pub fn list<S: Store + ?Sized>(store: &S, query: &str) -> ResultPage {
    match try_list(store, query) {
        Ok(page) => page,
        Err(err) => panic!("query '{query}' failed: {err} ({:?})", err.to_response()),
    }
}

pub fn try_list<S: Store + ?Sized>(store: &S, query: &str) -> Result<ResultPage, QueryError> {
    Engine::default().list(store, &schema(), &RawParams::from_query_string(query))
}

pub fn ids(page: &ResultPage) -> Vec<i64> {
    page.data.iter().map(|record| int(record, "id")).collect()
}

pub fn keys(page: &ResultPage) -> Vec<(i64, i64)> {
    page.data
        .iter()
        .map(|record| (int(record, "block_number"), int(record, "tx_index")))
        .collect()
}

pub fn int(record: &Value, field: &str) -> i64 {
    record[field]
        .as_i64()
        .unwrap_or_else(|| panic!("'{field}' is not an integer in {record}"))
}

pub fn cursor(page: &ResultPage) -> &CursorMeta {
    match &page.pagination {
        PaginationMeta::Cursor(meta) => meta,
        other => panic!("expected cursor metadata, got {other:?}"),
    }
}

pub fn offset(page: &ResultPage) -> &OffsetMeta {
    match &page.pagination {
        PaginationMeta::Offset(meta) => meta,
        other => panic!("expected offset metadata, got {other:?}"),
    }
}

/// Follows `page_key` from `first` until the listing reports no more rows.
pub fn walk<S: Store + ?Sized>(store: &S, query: &str, first: &str) -> Vec<ResultPage> {
    let mut pages = Vec::new();
    let mut key = first.to_string();
    loop {
        let page = list(store, &format!("{query}&page_key={key}"));
        let next = cursor(&page).page_key.clone();
        pages.push(page);
        match next {
            Some(next) => key = next,
            None => break,
        }
        assert!(pages.len() <= 200, "cursor walk did not terminate");
    }
    pages
}
