use inscribe::prelude::*;

use crate::common::*;
use crate::store_test;

const ALL: &str = "page_size=100";

store_test!(unfiltered_listing_returns_everything, |store, fixture| {
    let page = list(&store, ALL);
    assert_eq!(page.pagination.total(), ROWS as u64);
    assert_eq!(ids(&page), fixture.expected(SortDirection::Desc, |_| true));
});

store_test!(greater_than_is_strict, |store, fixture| {
    let bound = FIRST_BLOCK + 10;
    let page = list(&store, &format!("{ALL}&block_number=gt:{bound}"));

    assert_eq!(ids(&page), fixture.expected(SortDirection::Desc, |i| i.block_number > bound));
    assert!(keys(&page).iter().all(|(block, _)| *block > bound));
    assert_eq!(page.pagination.total(), fixture.count(|i| i.block_number > bound));
});

store_test!(range_includes_both_ends, |store, fixture| {
    let (min, max) = (FIRST_BLOCK + 5, FIRST_BLOCK + 10);
    let page = list(&store, &format!("{ALL}&block_number=range:{min},{max}"));

    let blocks: Vec<i64> = keys(&page).into_iter().map(|(block, _)| block).collect();
    assert!(blocks.contains(&min));
    assert!(blocks.contains(&max));
    assert_eq!(
        ids(&page),
        fixture.expected(SortDirection::Desc, |i| (min..=max).contains(&i.block_number))
    );
});

store_test!(where_filter_replaces_top_level_filter, |store, fixture| {
    let page = list(
        &store,
        &format!("{ALL}&block_number=gt:{}&where[block_number][lte]={}", FIRST_BLOCK + 20, FIRST_BLOCK + 3),
    );
    assert_eq!(
        ids(&page),
        fixture.expected(SortDirection::Desc, |i| i.block_number <= FIRST_BLOCK + 3)
    );
});

store_test!(filters_on_different_fields_are_anded, |store, fixture| {
    let page = list(&store, &format!("{ALL}&block_number=gte:{}&tx_index=lt:7", FIRST_BLOCK + 30));
    assert_eq!(
        ids(&page),
        fixture.expected(SortDirection::Desc, |i| i.block_number >= FIRST_BLOCK + 30 && i.tx_index < 7)
    );
});

store_test!(wildcard_is_a_case_sensitive_prefix_match, |store, fixture| {
    let page = list(&store, &format!("{ALL}&content_sha=0xF591*"));

    assert!(page.pagination.total() > 0);
    assert!(
        page.data
            .iter()
            .all(|record| record["content_sha"].as_str().is_some_and(|sha| sha.starts_with("0xF591")))
    );
    assert_eq!(
        ids(&page),
        fixture.expected(SortDirection::Desc, |i| i.content_sha.starts_with("0xF591"))
    );
});

store_test!(text_without_wildcard_is_exact, |store, fixture| {
    let target = fixture.inscriptions[17].clone();
    let page = list(&store, &format!("{ALL}&content_sha={}", target.content_sha));
    assert_eq!(
        ids(&page),
        fixture.expected(SortDirection::Desc, |i| i.content_sha == target.content_sha)
    );
    assert!(ids(&page).contains(&target.id));
});

store_test!(tri_state_true_means_present, |store, fixture| {
    let page = list(&store, &format!("{ALL}&collection_id=true"));
    assert!(page.data.iter().all(|record| !record["collection_id"].is_null()));
    assert_eq!(page.pagination.total(), fixture.count(|i| i.collection_id.is_some()));
});

store_test!(tri_state_null_and_false_mean_absent, |store, fixture| {
    let absent = fixture.count(|i| i.collection_id.is_none());
    for value in ["null", "false"] {
        let page = list(&store, &format!("{ALL}&collection_id={value}"));
        assert!(page.data.iter().all(|record| record["collection_id"].is_null()));
        assert_eq!(page.pagination.total(), absent, "collection_id={value}");
    }

    let present = list(&store, &format!("{ALL}&collection_id=true")).pagination.total();
    assert_eq!(present + absent, ROWS as u64);
});

store_test!(tri_state_literal_and_pattern, |store, fixture| {
    let page = list(&store, &format!("{ALL}&collection_id=bitmap"));
    assert_eq!(
        ids(&page),
        fixture.expected(SortDirection::Desc, |i| i.collection_id == Some("bitmap"))
    );

    let page = list(&store, &format!("{ALL}&collection_id=quantum*"));
    assert_eq!(
        ids(&page),
        fixture.expected(SortDirection::Desc, |i| i.collection_id == Some("quantum-cats"))
    );
});

store_test!(boolean_filter_matches_stored_flags, |store, fixture| {
    let valid = list(&store, &format!("{ALL}&is_valid=true"));
    let invalid = list(&store, &format!("{ALL}&is_valid=false"));

    assert_eq!(ids(&valid), fixture.expected(SortDirection::Desc, |i| i.is_valid));
    assert_eq!(ids(&invalid), fixture.expected(SortDirection::Desc, |i| !i.is_valid));
});

store_test!(no_match_is_an_empty_page, |store, fixture| {
    let page = list(&store, "block_number=lt:0");
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total(), 0);
    assert!(!page.pagination.has_more());
});

store_test!(numeric_equality, |store, fixture| {
    let block = FIRST_BLOCK + 5;
    let page = list(&store, &format!("{ALL}&block_number={block}"));

    assert!(page.pagination.total() > 0);
    assert!(keys(&page).iter().all(|(b, _)| *b == block));
    assert_eq!(ids(&page), fixture.expected(SortDirection::Desc, |i| i.block_number == block));

    let explicit = list(&store, &format!("{ALL}&block_number=eq:{block}"));
    assert_eq!(ids(&explicit), ids(&page));
});

store_test!(explicit_like_operator, |store, fixture| {
    let page = list(&store, &format!("{ALL}&content_sha=like:0xF591*"));
    assert_eq!(
        ids(&page),
        fixture.expected(SortDirection::Desc, |i| i.content_sha.starts_with("0xF591"))
    );

    let lower = list(&store, &format!("{ALL}&content_sha=like:0xf591*"));
    assert_eq!(
        ids(&lower),
        fixture.expected(SortDirection::Desc, |i| i.content_sha.starts_with("0xf591"))
    );

    // without a wildcard `like` only matches the literal
    let target = fixture.inscriptions[42].clone();
    let exact = list(&store, &format!("{ALL}&content_sha=like:{}", target.content_sha));
    assert_eq!(
        ids(&exact),
        fixture.expected(SortDirection::Desc, |i| i.content_sha == target.content_sha)
    );
    assert!(ids(&exact).contains(&target.id));
});

mod numeric_tri_state {
    use super::*;
    use serde_json::json;

    fn schema() -> EntitySchema {
        EntitySchema::new("items", "id", CursorKey::new("seq", "id"))
            .table("items")
            .field("owner_id", FieldKind::TriState)
    }

    fn owned_by<S: Store + ?Sized>(store: &S, query: &str) -> Vec<i64> {
        let page = Engine::default()
            .list(store, &schema(), &RawParams::from_query_string(query))
            .unwrap();
        page.data.iter().map(|record| int(record, "id")).collect()
    }

    fn check<S: Store + ?Sized>(store: &S) {
        assert_eq!(owned_by(store, "owner_id=7"), [1]);
        assert_eq!(owned_by(store, "where[owner_id][gt]=7"), [3]);
        assert_eq!(owned_by(store, "owner_id=true"), [3, 1]);
        assert_eq!(owned_by(store, "owner_id=null"), [2]);
    }

    #[test]
    fn memory() {
        let store = MemoryStore::new().with_table(
            "items",
            [
                json!({ "id": 1, "seq": 1, "owner_id": 7 }),
                json!({ "id": 2, "seq": 2, "owner_id": null }),
                json!({ "id": 3, "seq": 3, "owner_id": 9 }),
            ],
        );
        check(&store);
    }

    #[cfg(feature = "rusqlite")]
    #[test]
    fn sqlite() {
        let store = inscribe::sqlite::SqliteStore::open_in_memory().unwrap();
        store
            .with_connection(|conn| {
                conn.execute_batch(
                    "CREATE TABLE items (id INTEGER PRIMARY KEY, seq INTEGER NOT NULL, owner_id INTEGER);
                     INSERT INTO items VALUES (1, 1, 7), (2, 2, NULL), (3, 3, 9);",
                )
            })
            .unwrap();
        check(&store);
    }
}
