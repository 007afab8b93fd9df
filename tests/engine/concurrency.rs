use std::thread;

use inscribe::prelude::*;

use crate::common::*;
use crate::store_test;

store_test!(concurrent_requests_share_one_store, |store, fixture| {
    let queries = [
        "page=1&page_size=20",
        "page=3&page_size=20&is_valid=true",
        "order=asc&page_size=50&expand=collection",
        "page_size=10&page_key=840020_7&exclude=content_sha",
    ];
    let sequential: Vec<ResultPage> = queries.iter().map(|q| list(&store, q)).collect();

    let shared = &store;
    let concurrent: Vec<ResultPage> = thread::scope(|scope| {
        let handles: Vec<_> = queries
            .iter()
            .map(|q| scope.spawn(move || list(shared, q)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    assert_eq!(sequential, concurrent);
});
