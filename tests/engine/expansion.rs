use inscribe::prelude::*;
use serde_json::json;

use crate::common::*;
use crate::store_test;

store_test!(expanded_relation_is_nested_or_null, |store, fixture| {
    let page = list(&store, "page_size=100&expand=collection");
    assert_eq!(page.data.len(), ROWS);

    for record in &page.data {
        let inscription = fixture.get(int(record, "id"));
        let expected = match inscription.collection_id.and_then(collection) {
            Some(c) => json!({ "name": c.name, "slug": c.slug }),
            None => json!(null),
        };
        assert_eq!(record["collection"], expected, "inscription {}", inscription.id);
    }
});

store_test!(expansion_keeps_totals_and_order, |store, fixture| {
    let plain = list(&store, "page=2&page_size=25&is_valid=true");
    let expanded = list(&store, "page=2&page_size=25&is_valid=true&expand=collection");

    assert_eq!(plain.pagination, expanded.pagination);
    assert_eq!(ids(&plain), ids(&expanded));
});

store_test!(relations_appear_only_when_expanded, |store, fixture| {
    let page = list(&store, "page_size=5");
    assert!(page.data.iter().all(|record| record.get("collection").is_none()));
});

store_test!(repeated_expansions_collapse, |store, fixture| {
    let once = list(&store, "page_size=10&expand=collection");
    let twice = list(&store, "page_size=10&expand=collection,collection&expand=collection");
    assert_eq!(once.data, twice.data);
});

store_test!(expansion_with_cursor_pagination, |store, fixture| {
    let pages = walk(&store, "page_size=30&expand=collection&collection_id=runestones", "999999_0");
    let walked: Vec<&serde_json::Value> = pages.iter().flat_map(|page| page.data.iter()).collect();

    assert_eq!(walked.len() as u64, fixture.count(|i| i.collection_id == Some("runestones")));
    assert!(
        walked
            .iter()
            .all(|record| record["collection"] == json!({ "name": "Runestones", "slug": "runestones" }))
    );
});
