mod common;

use std::sync::Arc;

use autoscore_core::{CatalogPath, ContextQuery};
use autoscore_lib::ContextResolver;
use common::{FakeStore, supercar_store};

#[tokio::test]
async fn resolves_known_slug() {
    let resolver = ContextResolver::new(Arc::new(supercar_store()));
    let ctx = resolver.resolve("ferrari_f8_2020_tributo").await.unwrap();
    assert_eq!(ctx.real_brand, "Ferrari");
    assert_eq!(ctx.real_family, "F8");
    assert_eq!(ctx.real_model, "Tributo");
    assert_eq!(ctx.model_year, 2020);
}

#[tokio::test]
async fn rejected_slugs_never_reach_the_store() {
    let store = Arc::new(supercar_store());
    let resolver = ContextResolver::new(Arc::clone(&store));

    for slug in [
        "porsche_911_2022",
        "Porsche_911_2022_gt3",
        "porsche_911_22_gt3",
        "porsche_911_2022_gt3;drop",
        "porsche_9 11_2022_gt3",
        "",
    ] {
        assert!(resolver.resolve(slug).await.is_none(), "{slug} should be rejected");
    }
    assert_eq!(store.context_calls.get(), 0);
}

#[tokio::test]
async fn model_with_underscores_is_rejoined() {
    let store = Arc::new(
        FakeStore::new().with_vehicle("bmw_serie-3_2021_320d_xdrive", "BMW", "Série 3", "320d xDrive"),
    );
    let resolver = ContextResolver::new(store);
    let ctx = resolver.resolve("bmw_serie-3_2021_320d_xdrive").await.unwrap();
    assert_eq!(ctx.real_model, "320d xDrive");
}

#[tokio::test]
async fn store_failure_resolves_to_none() {
    let store = Arc::new(supercar_store().failing_contexts());
    let resolver = ContextResolver::new(Arc::clone(&store));
    assert!(resolver.resolve("porsche_911_2022_gt3").await.is_none());
    assert_eq!(store.context_calls.get(), 1);
}

#[tokio::test]
async fn clones_share_one_memo() {
    let store = Arc::new(supercar_store());
    let resolver = ContextResolver::new(Arc::clone(&store));
    let other = resolver.clone();

    resolver.resolve("porsche_911_2022_gt3").await;
    other.resolve("porsche_911_2022_gt3").await;

    assert_eq!(store.context_calls.get(), 1);
    assert_eq!(other.lookups_started(), 1);
}

#[tokio::test]
async fn path_and_slug_with_same_arguments_share_a_lookup() {
    let store = Arc::new(supercar_store());
    let resolver = ContextResolver::new(Arc::clone(&store));

    let path = CatalogPath::new("porsche", "911").with_year("2022").with_model("gt3");
    let names = resolver.resolve_path(&path).await.unwrap();
    assert_eq!(names.model.as_deref(), Some("GT3"));

    resolver.resolve("porsche_911_2022_gt3").await.unwrap();
    assert_eq!(store.context_calls.get(), 1);
}

#[tokio::test]
async fn lookup_returns_raw_names() {
    let resolver = ContextResolver::new(Arc::new(supercar_store()));
    let names = resolver
        .lookup(ContextQuery {
            brand_slug: "porsche".to_string(),
            family_slug: "911".to_string(),
            model_year: None,
            model_slug: None,
            powertrain_slug: None,
        })
        .await
        .unwrap();
    assert_eq!(names.brand.as_deref(), Some("Porsche"));
    assert!(names.model.is_none());
}
