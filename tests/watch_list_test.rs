// 已观看列表持久化集成测试

use tempfile::TempDir;

use popcorn_manager::models::WatchedMovie;
use popcorn_manager::services::{JsonFileStorage, KeyValueStorage, ListUpdate, WatchListStore};

const KEY: &str = "watched";

fn watched(id: &str, title: &str, user_rating: u8, runtime: Option<u32>) -> WatchedMovie {
    WatchedMovie {
        imdb_id: id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        poster: Some(format!("https://example.com/{}.jpg", id)),
        imdb_rating: Some(8.7),
        user_rating,
        runtime,
        count_rating_decisions: Some(1),
    }
}

async fn stored_list(storage: &JsonFileStorage) -> Vec<WatchedMovie> {
    let raw = storage.get(KEY).await.unwrap().expect("watched list should be stored");
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_list_survives_restart() {
    let temp = TempDir::new().unwrap();

    let expected = {
        let mut store = WatchListStore::open(JsonFileStorage::new(temp.path()), KEY, Vec::new()).await;
        store
            .add(watched("tt1375666", "Inception", 10, Some(148)))
            .await
            .unwrap();
        store
            .add(watched("tt0088763", "Back to the Future", 9, None))
            .await
            .unwrap();
        store.list().to_vec()
    };

    let reopened = WatchListStore::open(JsonFileStorage::new(temp.path()), KEY, Vec::new()).await;
    assert_eq!(reopened.list(), expected.as_slice());
}

#[tokio::test]
async fn test_append_then_delete_scenario() {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(temp.path());
    let mut store = WatchListStore::open(storage.clone(), KEY, Vec::new()).await;

    store
        .add(watched("tt1375666", "Inception", 10, Some(148)))
        .await
        .unwrap();
    store
        .add(watched("tt0133093", "The Matrix", 9, Some(136)))
        .await
        .unwrap();
    assert_eq!(stored_list(&storage).await.len(), 2);

    let removed = store.remove("tt0133093").await.unwrap();
    assert_eq!(removed.title, "The Matrix");

    assert!(!store.contains("tt0133093"));
    let on_disk = stored_list(&storage).await;
    assert_eq!(on_disk, store.list());
    assert!(on_disk.iter().all(|m| m.imdb_id != "tt0133093"));
}

#[tokio::test]
async fn test_corrupted_file_falls_back_to_default() {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(temp.path());
    std::fs::write(storage.path_for(KEY).unwrap(), "[{\"imdbID\": ").unwrap();

    let default = vec![watched("tt0000001", "Default", 5, None)];
    let store = WatchListStore::open(storage.clone(), KEY, default.clone()).await;

    assert_eq!(store.list(), default.as_slice());
    assert!(temp.path().join("watched.corrupt.json").exists());

    // 原文件在下一次写入前保持不变
    let raw = std::fs::read_to_string(storage.path_for(KEY).unwrap()).unwrap();
    assert_eq!(raw, "[{\"imdbID\": ");
}

#[tokio::test]
async fn test_filter_update_persists_full_list() {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(temp.path());
    let initial = vec![
        watched("tt0000001", "One", 3, Some(90)),
        watched("tt0000002", "Two", 7, Some(100)),
        watched("tt0000003", "Three", 9, Some(110)),
    ];
    let mut store = WatchListStore::open(storage.clone(), KEY, initial).await;

    let changed = store
        .set(ListUpdate::apply(|prev| {
            prev.iter().filter(|m| m.user_rating >= 5).cloned().collect()
        }))
        .await
        .unwrap();

    assert!(changed);
    assert_eq!(stored_list(&storage).await.len(), 2);

    let summary = store.summary();
    assert_eq!(summary.count, 2);
    assert!((summary.avg_user_rating - 8.0).abs() < 1e-4);
    assert!((summary.avg_runtime - 105.0).abs() < 1e-4);
}
