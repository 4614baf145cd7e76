use std::sync::Arc;

use muse::{
    ArtworkRecord, JsonFileResultCache, JsonFileUsageStore, ResultCache, UsageState, UsageStore,
    UsageTracker,
};
use tempfile::tempdir;

fn records() -> Vec<ArtworkRecord> {
    vec![
        ArtworkRecord::new("Melancholy", "Edvard Munch", "https://img.example/1.jpg"),
        ArtworkRecord::new("", "", "https://img.example/2.jpg"),
    ]
}

#[tokio::test]
async fn result_cache_save_then_load_is_stable() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonFileResultCache::in_dir(dir.path().join("nested"));

    cache
        .save("the weight of existence", "heavy figure", &records(), "met")
        .await
        .expect("save");
    let first = cache.load().await.unwrap().expect("entry");

    cache
        .save(
            first.original_query(),
            first.keywords(),
            first.artworks(),
            first.source(),
        )
        .await
        .unwrap();
    let second = cache.load().await.unwrap().expect("entry");

    assert_eq!(first.artworks(), second.artworks());
    assert_eq!(second.original_query(), "the weight of existence");
    assert_eq!(second.artworks()[1].title(), "Untitled");
    assert_eq!(second.artworks()[1].artist(), "Unknown Artist");
}

#[tokio::test]
async fn a_new_search_replaces_the_previous_one() {
    let dir = tempdir().unwrap();
    let cache = JsonFileResultCache::in_dir(dir.path());

    cache.save("first", "a", &records(), "met").await.unwrap();
    cache.save("second", "b", &records()[..1], "wikiart").await.unwrap();

    let entry = cache.load().await.unwrap().unwrap();
    assert_eq!(entry.original_query(), "second");
    assert_eq!(entry.source(), "wikiart");
    assert_eq!(entry.len(), 1);
}

#[tokio::test]
async fn missing_cache_file_is_no_entry() {
    let dir = tempdir().unwrap();
    let cache = JsonFileResultCache::in_dir(dir.path());

    assert!(cache.load().await.unwrap().is_none());
    assert!(!cache.clear().await.unwrap());
}

#[tokio::test]
async fn incomplete_cache_reads_as_no_entry() {
    let dir = tempdir().unwrap();
    let cache = JsonFileResultCache::in_dir(dir.path());
    std::fs::write(cache.path(), r#"{"keywords": "k", "artworks": []}"#).unwrap();

    assert!(cache.load().await.unwrap().is_none());
    let err = cache.get_by_index(1).await.unwrap_err();
    assert!(err.to_string().contains("No previous search"));
}

#[tokio::test]
async fn corrupt_cache_is_an_upstream_error() {
    let dir = tempdir().unwrap();
    let cache = JsonFileResultCache::in_dir(dir.path());
    std::fs::write(cache.path(), "{ not json").unwrap();

    let err = cache.load().await.unwrap_err();

    assert!(err.is_upstream());
}

#[tokio::test]
async fn legacy_cache_without_source_still_loads() {
    let dir = tempdir().unwrap();
    let cache = JsonFileResultCache::in_dir(dir.path());
    std::fs::write(
        cache.path(),
        r#"{
            "timestamp": "2025-11-02T10:00:00.123456",
            "original_query": "q",
            "keywords": "k",
            "artworks": [{"title": "T", "artist": "A", "image_url": "https://img.example/t.jpg"}]
        }"#,
    )
    .unwrap();

    let cached = cache.get_by_index(1).await.unwrap();

    assert_eq!(cached.source, "unknown");
    assert_eq!(cached.artwork.title(), "T");
}

#[tokio::test]
async fn usage_survives_a_fresh_tracker() {
    let dir = tempdir().unwrap();

    let tracker = UsageTracker::new(Arc::new(JsonFileUsageStore::in_dir(dir.path())));
    tracker.track_request(10, 5).await.unwrap();
    tracker.track_request(20, 5).await.unwrap();

    let reopened = UsageTracker::new(Arc::new(JsonFileUsageStore::in_dir(dir.path())));
    let stats = reopened.get_usage_stats().await.unwrap();

    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.daily_tokens, 40);
    assert!(dir.path().join("usage.json").exists());
}

#[tokio::test]
async fn unreadable_usage_file_starts_over() {
    let dir = tempdir().unwrap();
    let store = JsonFileUsageStore::in_dir(dir.path());
    std::fs::write(store.path(), "garbage").unwrap();

    assert!(store.load().await.unwrap().is_none());

    let today = chrono::Local::now().date_naive();
    store.save(&UsageState::new(today)).await.unwrap();
    assert_eq!(
        store.load().await.unwrap().unwrap().first_use_date(),
        today
    );
}
