use std::collections::HashSet;

use inscribe::prelude::*;

use crate::common::*;
use crate::store_test;

store_test!(offset_metadata_for_first_and_last_page, |store, fixture| {
    let first = list(&store, "page=1&page_size=20");
    let meta = offset(&first);
    assert_eq!(first.data.len(), 20);
    assert_eq!(meta.total, 97);
    assert_eq!(meta.pages, 5);
    assert_eq!(meta.page, 1);
    assert_eq!(meta.prev, None);
    assert_eq!(meta.next, Some(2));
    assert!(meta.has_more);

    let last = list(&store, "page=5&page_size=20");
    let meta = offset(&last);
    assert_eq!(last.data.len(), 17);
    assert_eq!(meta.prev, Some(4));
    assert_eq!(meta.next, None);
    assert!(!meta.has_more);
});

store_test!(defaults_to_first_page_of_twenty, |store, fixture| {
    let page = list(&store, "");
    let meta = offset(&page);
    assert_eq!(meta.page, 1);
    assert_eq!(meta.page_size, 20);
    assert_eq!(ids(&page), &fixture.expected(SortDirection::Desc, |_| true)[..20]);
});

store_test!(offset_pages_partition_the_listing, |store, fixture| {
    let mut seen = Vec::new();
    for page in 1..=5 {
        seen.extend(ids(&list(&store, &format!("page={page}&page_size=20"))));
    }
    assert_eq!(seen, fixture.expected(SortDirection::Desc, |_| true));
});

store_test!(page_past_the_end_is_empty_but_counted, |store, fixture| {
    let page = list(&store, "page=9&page_size=20");
    let meta = offset(&page);
    assert!(page.data.is_empty());
    assert_eq!(meta.total, 97);
    assert_eq!(meta.prev, Some(8));
    assert_eq!(meta.next, None);
});

store_test!(ascending_order_reverses_the_listing, |store, fixture| {
    let page = list(&store, "order=asc&page_size=100");
    assert_eq!(ids(&page), fixture.expected(SortDirection::Asc, |_| true));
});

store_test!(cursor_walk_descending_is_strictly_monotonic, |store, fixture| {
    let (block, tx) = fixture.highest_key();
    let pages = walk(&store, "page_size=20", &format!("{}_{}", block, tx + 1));

    let walked: Vec<(i64, i64)> = pages.iter().flat_map(keys).collect();
    assert!(walked.windows(2).all(|pair| pair[0] > pair[1]));
    assert_eq!(
        pages.iter().flat_map(ids).collect::<Vec<_>>(),
        fixture.expected(SortDirection::Desc, |_| true)
    );

    for page in &pages {
        assert_eq!(cursor(page).total, 97);
    }
    let last = pages.last().map(cursor);
    assert_eq!(last.map(|meta| meta.has_more), Some(false));
    assert_eq!(last.and_then(|meta| meta.page_key.clone()), None);
});

store_test!(cursor_walk_ascending_visits_every_row_once, |store, fixture| {
    let pages = walk(&store, "order=asc&page_size=15", "0_0");

    let walked: Vec<i64> = pages.iter().flat_map(ids).collect();
    let unique: HashSet<i64> = walked.iter().copied().collect();
    assert_eq!(unique.len(), walked.len());
    assert_eq!(walked, fixture.expected(SortDirection::Asc, |_| true));
    assert_eq!(pages.len(), 7);

    let walked_keys: Vec<(i64, i64)> = pages.iter().flat_map(keys).collect();
    assert!(walked_keys.windows(2).all(|pair| pair[0] < pair[1]));
});

store_test!(cursor_bound_is_exclusive, |store, fixture| {
    let expected = fixture.expected(SortDirection::Desc, |_| true);
    let anchor = fixture.get(expected[9]);

    let page = list(&store, &format!("page_size=5&page_key={}_{}", anchor.block_number, anchor.tx_index));
    assert_eq!(ids(&page), &expected[10..15]);

    let meta = cursor(&page);
    let last = fixture.get(expected[14]);
    assert_eq!(meta.page_key, Some(format!("{}_{}", last.block_number, last.tx_index)));
    assert!(meta.has_more);
});

store_test!(cursor_page_key_wins_over_page, |store, fixture| {
    let with_page = list(&store, "page=3&page_size=10&page_key=840010_0");
    let without = list(&store, "page_size=10&page_key=840010_0");
    assert_eq!(ids(&with_page), ids(&without));
    assert!(matches!(with_page.pagination, PaginationMeta::Cursor(_)));
});

store_test!(cursor_total_counts_filtered_rows, |store, fixture| {
    let pages = walk(&store, "page_size=10&is_valid=true", &format!("{}_0", FIRST_BLOCK + 1_000));
    let valid = fixture.count(|i| i.is_valid);

    for page in &pages {
        assert_eq!(cursor(page).total, valid);
    }
    assert_eq!(
        pages.iter().flat_map(ids).collect::<Vec<_>>(),
        fixture.expected(SortDirection::Desc, |i| i.is_valid)
    );
});

store_test!(exact_final_page_has_no_next_key, |store, fixture| {
    // seven rows from the end, so exactly six follow
    let expected = fixture.expected(SortDirection::Asc, |_| true);
    let anchor = fixture.get(expected[ROWS - 7]);
    let page = list(
        &store,
        &format!("order=asc&page_size=6&page_key={}_{}", anchor.block_number, anchor.tx_index),
    );

    assert_eq!(page.data.len(), 6);
    assert!(!cursor(&page).has_more);
    assert_eq!(cursor(&page).page_key, None);
});

store_test!(same_request_same_page, |store, fixture| {
    let query = "page=2&page_size=13&collection_id=true&expand=collection";
    let first = serde_json::to_value(list(&store, query)).unwrap();
    let second = serde_json::to_value(list(&store, query)).unwrap();
    assert_eq!(first, second);
});
