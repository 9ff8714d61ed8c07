mod common;

use std::sync::Arc;

use autoscore_lib::RequestScope;
use common::{FakeStore, review, supercar_store};

#[tokio::test]
async fn two_resolved_slugs_share_one_query() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let buckets = scope
        .reviews_batch(&["porsche_911_2022_gt3", "ferrari_f8_2020_tributo"])
        .await;

    assert_eq!(buckets.len(), 2);
    let porsche = &buckets["porsche_911_2022_gt3"];
    let ferrari = &buckets["ferrari_f8_2020_tributo"];
    assert_eq!(porsche.len(), 1);
    assert_eq!(ferrari.len(), 1);
    assert_eq!(porsche[0].score, Some(9.4));
    assert_eq!(ferrari[0].score, Some(9.1));
    assert_eq!(store.review_queries.get(), 1);
    assert_eq!(store.last_filter().unwrap().len(), 2);
}

#[tokio::test]
async fn quoted_slug_never_reaches_the_store() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let slug = "marque\"_famille_2020_model";
    let buckets = scope.reviews_batch(&[slug]).await;

    assert_eq!(buckets.len(), 1);
    assert!(buckets[slug].is_empty());
    assert_eq!(store.context_calls.get(), 0);
    assert_eq!(store.review_queries.get(), 0);
}

#[tokio::test]
async fn bad_slug_is_isolated_from_good_one() {
    let store = Arc::new(
        FakeStore::new()
            .with_vehicle("good_famille_2020_model", "good", "Famille", "Model")
            .with_review(review("good", "Famille", 2020, "Model", 7.5)),
    );
    let scope = RequestScope::new(Arc::clone(&store));

    let bad = "bad\"_famille_2020_model";
    let good = "good_famille_2020_model";
    let buckets = scope.reviews_batch(&[bad, good]).await;

    assert_eq!(store.review_queries.get(), 1);
    let expression = store.last_filter().unwrap().to_postgrest();
    assert!(expression.contains("good"));
    assert!(!expression.contains("bad\""));
    assert!(!expression.contains("bad"));

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[good].len(), 1);
    assert!(buckets[bad].is_empty());
}

#[tokio::test]
async fn slug_order_does_not_change_the_result() {
    let slugs = [
        "porsche_911_2022_gt3",
        "ferrari_f8_2020_tributo",
        "unknown_brand_2020_model",
        "bad\"_x_2020_y",
    ];
    let mut shuffled = slugs;
    shuffled.reverse();
    shuffled.swap(0, 2);

    let store_a = Arc::new(supercar_store());
    let a = RequestScope::new(Arc::clone(&store_a))
        .reviews_batch(&slugs)
        .await;
    let store_b = Arc::new(supercar_store());
    let b = RequestScope::new(Arc::clone(&store_b))
        .reviews_batch(&shuffled)
        .await;

    assert_eq!(a, b);
    assert_eq!(store_a.review_queries.get(), store_b.review_queries.get());
    assert_eq!(store_a.review_queries.get(), 1);
}

#[tokio::test]
async fn keys_are_exactly_the_deduplicated_input() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let input = [
        "ferrari_f8_2020_tributo",
        "porsche_911_2022_gt3",
        "ferrari_f8_2020_tributo",
        "not-a-slug",
        "not-a-slug",
        "unknown_brand_2020_model",
    ];
    let buckets = scope.reviews_batch(&input).await;

    let keys: Vec<&str> = buckets.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "ferrari_f8_2020_tributo",
            "not-a-slug",
            "porsche_911_2022_gt3",
            "unknown_brand_2020_model",
        ]
    );
    assert!(buckets["not-a-slug"].is_empty());
    assert!(buckets["unknown_brand_2020_model"].is_empty());
    // Duplicates resolve once each.
    assert_eq!(store.context_calls.get(), 3);
}

#[tokio::test]
async fn many_slugs_issue_a_single_review_query() {
    let mut store = FakeStore::new();
    let mut slugs = Vec::new();
    for year in 2010..2020 {
        let slug = format!("renault_clio_{year}_rs");
        store = store
            .with_vehicle(&slug, "Renault", "Clio", "RS")
            .with_review(review("Renault", "Clio", year, "RS", 7.0));
        slugs.push(slug);
    }
    let store = Arc::new(store);
    let scope = RequestScope::new(Arc::clone(&store));

    let buckets = scope.reviews_batch(&slugs).await;

    assert_eq!(store.review_queries.get(), 1);
    assert_eq!(store.last_filter().unwrap().len(), 10);
    assert!(buckets.values().all(|rows| rows.len() == 1));
}

#[tokio::test]
async fn nothing_resolved_means_no_review_query() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let buckets = scope
        .reviews_batch(&["unknown_brand_2020_model", "porsche_911_1850_gt3"])
        .await;

    assert_eq!(buckets.len(), 2);
    assert!(buckets.values().all(Vec::is_empty));
    assert_eq!(store.review_queries.get(), 0);
}

#[tokio::test]
async fn store_failure_degrades_to_empty_buckets() {
    let store = Arc::new(supercar_store().failing_reviews());
    let scope = RequestScope::new(Arc::clone(&store));

    let buckets = scope
        .reviews_batch(&["porsche_911_2022_gt3", "ferrari_f8_2020_tributo"])
        .await;

    assert_eq!(buckets.len(), 2);
    assert!(buckets.values().all(Vec::is_empty));
    assert_eq!(store.review_queries.get(), 1);
}

#[tokio::test]
async fn context_lookup_failure_degrades_to_empty_buckets() {
    let store = Arc::new(supercar_store().failing_contexts());
    let scope = RequestScope::new(Arc::clone(&store));

    let buckets = scope.reviews_batch(&["porsche_911_2022_gt3"]).await;

    assert!(buckets["porsche_911_2022_gt3"].is_empty());
    assert_eq!(store.review_queries.get(), 0);
}

#[tokio::test]
async fn aliases_of_one_vehicle_each_receive_its_rows() {
    let store = Arc::new(
        FakeStore::new()
            .with_vehicle("vw_golf_2021_gti", "Volkswagen", "Golf", "GTI")
            .with_vehicle("volkswagen_golf_2021_gti", "Volkswagen", "Golf", "GTI")
            .with_review(review("Volkswagen", "Golf", 2021, "GTI", 8.2))
            .with_review(review("Volkswagen", "Golf", 2021, "GTI", 8.0)),
    );
    let scope = RequestScope::new(Arc::clone(&store));

    let buckets = scope
        .reviews_batch(&["vw_golf_2021_gti", "volkswagen_golf_2021_gti"])
        .await;

    assert_eq!(buckets["vw_golf_2021_gti"].len(), 2);
    assert_eq!(buckets["volkswagen_golf_2021_gti"].len(), 2);
    assert_eq!(store.last_filter().unwrap().len(), 1);
}

#[tokio::test]
async fn rows_are_not_routed_to_near_matches() {
    let store = Arc::new(
        supercar_store()
            .with_vehicle("porsche_911_2023_gt3", "Porsche", "911", "GT3")
            .with_review(review("Porsche", "911", 2023, "GT3", 9.6)),
    );
    let scope = RequestScope::new(Arc::clone(&store));

    let buckets = scope
        .reviews_batch(&["porsche_911_2022_gt3", "porsche_911_2023_gt3"])
        .await;

    assert_eq!(buckets["porsche_911_2022_gt3"][0].score, Some(9.4));
    assert_eq!(buckets["porsche_911_2023_gt3"][0].score, Some(9.6));
    assert_eq!(buckets["porsche_911_2022_gt3"].len(), 1);
}

#[tokio::test]
async fn reordered_batch_in_same_request_is_served_from_memo() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let first = scope
        .reviews_batch(&["porsche_911_2022_gt3", "ferrari_f8_2020_tributo"])
        .await;
    let second = scope
        .reviews_batch(&["ferrari_f8_2020_tributo", "porsche_911_2022_gt3"])
        .await;

    assert_eq!(first, second);
    assert_eq!(store.review_queries.get(), 1);
    assert_eq!(scope.stats().batches, 1);
}
