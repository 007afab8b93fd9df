use inscribe::prelude::*;
use serde_json::json;

use crate::common::*;
use crate::store_test;

store_test!(exclude_drops_a_field_from_every_record, |store, fixture| {
    let page = list(&store, "page_size=50&exclude=content_sha");
    assert_eq!(page.data.len(), 50);
    assert!(page.data.iter().all(|record| record.get("content_sha").is_none()));
    assert!(page.data.iter().all(|record| record.get("block_number").is_some()));
});

store_test!(glob_exclude_matches_several_fields, |store, fixture| {
    let page = list(&store, "exclude=*_index,*_sha");
    for record in &page.data {
        let mut fields: Vec<&str> = record
            .as_object()
            .map(|object| object.keys().map(String::as_str).collect())
            .unwrap_or_default();
        fields.sort_unstable();
        assert_eq!(fields, ["block_number", "collection_id", "id", "is_valid"]);
    }
});

store_test!(include_overrides_a_subtree_exclude, |store, fixture| {
    let page = list(
        &store,
        "page_size=100&collection_id=true&expand=collection&exclude=collection.*&include=collection.name",
    );
    assert!(!page.data.is_empty());
    for record in &page.data {
        let id = record["collection_id"].as_str().unwrap_or_default();
        let name = collection(id).map(|c| c.name);
        assert_eq!(record["collection"], json!({ "name": name }));
    }
});

store_test!(excluding_a_relation_removes_it_entirely, |store, fixture| {
    let page = list(&store, "expand=collection&exclude=collection");
    assert!(page.data.iter().all(|record| record.get("collection").is_none()));
    assert!(page.data.iter().all(|record| record.get("collection_id").is_some()));
});

store_test!(unmatched_relation_stays_null_under_projection, |store, fixture| {
    let page = list(&store, "page_size=100&collection_id=null&expand=collection&exclude=collection.slug");
    assert!(!page.data.is_empty());
    assert!(page.data.iter().all(|record| record["collection"].is_null()));
});

store_test!(include_and_exclude_order_is_irrelevant, |store, fixture| {
    let forward = list(&store, "expand=collection&exclude=collection.*,tx_index&include=collection.slug,id");
    let backward = list(&store, "include=id&include=collection.slug&exclude=tx_index&exclude=collection.*&expand=collection");
    assert_eq!(forward.data, backward.data);
});

store_test!(projection_does_not_disturb_cursor_keys, |store, fixture| {
    let expected = fixture.expected(SortDirection::Desc, |_| true);
    let anchor = fixture.get(expected[0]);
    let page = list(
        &store,
        &format!(
            "page_size=10&exclude=block_number,tx_index&page_key={}_{}",
            anchor.block_number, anchor.tx_index
        ),
    );

    assert!(page.data.iter().all(|record| record.get("block_number").is_none()));
    let last = fixture.get(expected[10]);
    assert_eq!(
        cursor(&page).page_key,
        Some(format!("{}_{}", last.block_number, last.tx_index))
    );
});
