mod common;

use std::sync::Arc;

use autoscore_core::CatalogPath;
use autoscore_lib::{DuelPair, RequestScope};
use common::{FakeStore, supercar_store};

#[tokio::test]
async fn concurrent_identical_resolutions_hit_the_store_once() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let (metadata, body) = futures::join!(
        scope.resolve_context("porsche_911_2022_gt3"),
        scope.resolve_context("porsche_911_2022_gt3"),
    );

    assert_eq!(metadata, body);
    let ctx = metadata.unwrap();
    assert_eq!(ctx.real_brand, "Porsche");
    assert_eq!(ctx.real_model, "GT3");
    assert_eq!(ctx.original_slug, "porsche_911_2022_gt3");
    assert_eq!(store.context_calls.get(), 1);
}

#[tokio::test]
async fn separate_requests_do_not_share_lookups() {
    let store = Arc::new(supercar_store());

    let first = RequestScope::new(Arc::clone(&store));
    first.resolve_context("porsche_911_2022_gt3").await;
    let second = RequestScope::new(Arc::clone(&store));
    second.resolve_context("porsche_911_2022_gt3").await;

    assert_eq!(store.context_calls.get(), 2);
}

#[tokio::test]
async fn missing_model_leaves_slug_unresolved() {
    let store = Arc::new(FakeStore::new().with_partial("audi_a4_2019_quattro", "Audi", "A4"));
    let scope = RequestScope::new(Arc::clone(&store));

    assert!(scope.resolve_context("audi_a4_2019_quattro").await.is_none());
    assert!(scope.reviews_for_slug("audi_a4_2019_quattro").await.is_empty());
    assert_eq!(store.review_queries.get(), 0);
}

#[tokio::test]
async fn page_body_reuses_metadata_resolution() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let ctx = scope.resolve_context("ferrari_f8_2020_tributo").await.unwrap();
    let reviews = scope.reviews_for_slug("ferrari_f8_2020_tributo").await;
    let again = scope.reviews_for_slug("ferrari_f8_2020_tributo").await;

    assert_eq!(ctx.real_family, "F8");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews, again);
    assert_eq!(store.context_calls.get(), 1);
    assert_eq!(store.review_queries.get(), 1);
}

#[tokio::test]
async fn brand_resolution_is_validated_and_memoized() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    assert_eq!(scope.resolve_brand("porsche").await.as_deref(), Some("Porsche"));
    assert_eq!(scope.resolve_brand("porsche").await.as_deref(), Some("Porsche"));
    assert!(scope.resolve_brand("por\"sche").await.is_none());
    assert!(scope.resolve_brand("lada").await.is_none());

    assert_eq!(store.brand_calls.get(), 2);
    assert_eq!(scope.stats().brand_lookups, 2);
}

#[tokio::test]
async fn families_are_sorted_by_review_count() {
    let store = Arc::new(
        supercar_store().with_families("Porsche", &[("Cayenne", 4), ("911", 12), ("Boxster", 4)]),
    );
    let scope = RequestScope::new(Arc::clone(&store));

    let families = scope.families_for_brand("porsche").await;
    let names: Vec<&str> = families.iter().map(|f| f.family.as_str()).collect();
    assert_eq!(names, vec!["911", "Boxster", "Cayenne"]);

    scope.families_for_brand("porsche").await;
    assert_eq!(store.family_calls.get(), 1);
    assert_eq!(store.brand_calls.get(), 1);

    assert!(scope.families_for_brand("unknown").await.is_empty());
    assert_eq!(store.family_calls.get(), 1);
}

#[tokio::test]
async fn partial_paths_resolve_brand_and_family() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let names = scope
        .resolve_path(&CatalogPath::new("porsche", "911"))
        .await
        .unwrap();
    assert_eq!(names.brand.as_deref(), Some("Porsche"));
    assert_eq!(names.family.as_deref(), Some("911"));
    assert!(names.model.is_none());

    let full = scope
        .resolve_path(&CatalogPath::new("porsche", "911").with_year("2022").with_model("gt3"))
        .await
        .unwrap();
    assert_eq!(full.model.as_deref(), Some("GT3"));

    assert!(
        scope
            .resolve_path(&CatalogPath::new("porsche", "9'11"))
            .await
            .is_none()
    );
    assert!(
        scope
            .resolve_path(&CatalogPath::new("lada", "niva"))
            .await
            .is_none()
    );
    assert_eq!(store.context_calls.get(), 3);
}

#[tokio::test]
async fn duel_sides_share_one_batch_in_either_order() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let forward = DuelPair::parse("porsche_911_2022_gt3-vs-ferrari_f8_2020_tributo").unwrap();
    let backward = DuelPair::parse("ferrari_f8_2020_tributo-vs-porsche_911_2022_gt3").unwrap();

    let a = scope.duel(&forward).await;
    let b = scope.duel(&backward).await;

    assert_eq!(a.left, b.right);
    assert_eq!(a.right, b.left);
    assert_eq!(a.left[0].brand, "Porsche");
    assert_eq!(a.right[0].brand, "Ferrari");
    assert_eq!(store.review_queries.get(), 1);
}

#[tokio::test]
async fn duel_against_itself_fills_both_sides() {
    let store = Arc::new(supercar_store());
    let scope = RequestScope::new(Arc::clone(&store));

    let pair = DuelPair::new("porsche_911_2022_gt3", "porsche_911_2022_gt3");
    let duel = scope.duel(&pair).await;

    assert_eq!(duel.left.len(), 1);
    assert_eq!(duel.left, duel.right);
}
