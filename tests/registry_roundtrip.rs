//! Category registry persistence tests.
//!
//! The registry must round-trip the ordered category list exactly and
//! persist each new registration immediately, so an interrupted batch
//! loses at most the registration in flight.

use kartenwerk::CategoryRegistry;
use tempfile::TempDir;

#[tokio::test]
async fn test_roundtrip_preserves_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deck_registry.json");

    let mut registry = CategoryRegistry::load(&path).await.unwrap();
    registry.register("Food").await.unwrap();
    registry.register("Clothing").await.unwrap();

    let reloaded = CategoryRegistry::load(&path).await.unwrap();
    assert_eq!(reloaded.categories(), vec!["Food", "Clothing"]);
}

#[tokio::test]
async fn test_each_registration_is_persisted_immediately() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deck_registry.json");

    let mut registry = CategoryRegistry::load(&path).await.unwrap();
    registry.register("Food").await.unwrap();

    // A reader opening the file between registrations already sees "Food":
    // registration is not batched until some later save call.
    let mid_batch = CategoryRegistry::load(&path).await.unwrap();
    assert_eq!(mid_batch.categories(), vec!["Food"]);

    registry.register("Clothing").await.unwrap();
    let after = CategoryRegistry::load(&path).await.unwrap();
    assert_eq!(after.categories(), vec!["Food", "Clothing"]);
}

#[tokio::test]
async fn test_reloaded_registry_still_matches_case_insensitively() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deck_registry.json");

    {
        let mut registry = CategoryRegistry::load(&path).await.unwrap();
        registry.register("Body Parts").await.unwrap();
    }

    let reloaded = CategoryRegistry::load(&path).await.unwrap();
    assert_eq!(reloaded.find_match("body parts"), Some("Body Parts"));
    assert!(reloaded.exists("  BODY PARTS "));
}

#[tokio::test]
async fn test_verbatim_casing_survives_roundtrip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deck_registry.json");

    let mut registry = CategoryRegistry::load(&path).await.unwrap();
    registry.register("  Weather  ").await.unwrap();

    // Names are stored verbatim (including surrounding whitespace); only
    // matching normalizes.
    let reloaded = CategoryRegistry::load(&path).await.unwrap();
    assert_eq!(reloaded.categories(), vec!["  Weather  "]);
    assert!(reloaded.exists("weather"));
}
