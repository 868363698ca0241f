// 已观看列表存储
//
// 启动时从持久化存储恢复列表，之后每次变更都把完整列表写回同一个键

use std::collections::HashSet;

use super::error::WatchListError;
use super::storage::KeyValueStorage;
use crate::models::{Validator, WatchedMovie, WatchedSummary};

type ListUpdateFn = Box<dyn FnOnce(&[WatchedMovie]) -> Vec<WatchedMovie> + Send>;

/// 列表更新方式：整体替换，或基于旧列表计算新列表
pub enum ListUpdate {
    Replace(Vec<WatchedMovie>),
    Apply(ListUpdateFn),
}

impl ListUpdate {
    pub fn apply<F>(f: F) -> Self
    where
        F: FnOnce(&[WatchedMovie]) -> Vec<WatchedMovie> + Send + 'static,
    {
        ListUpdate::Apply(Box::new(f))
    }
}

impl From<Vec<WatchedMovie>> for ListUpdate {
    fn from(list: Vec<WatchedMovie>) -> Self {
        ListUpdate::Replace(list)
    }
}

/// 已观看列表
///
/// 独占持有列表，其他组件只能通过这里修改
pub struct WatchListStore<S> {
    storage: S,
    key: String,
    list: Vec<WatchedMovie>,
}

impl<S: KeyValueStorage> WatchListStore<S> {
    /// 从存储恢复列表
    ///
    /// # 行为
    /// - 键不存在（或内容为 `null`）时使用 `initial`
    /// - 内容损坏时备份到 `{key}.corrupt` 并使用 `initial`
    /// - 读取失败时使用 `initial`
    pub async fn open(storage: S, key: impl Into<String>, initial: Vec<WatchedMovie>) -> Self {
        let key = key.into();

        let list = match storage.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Option<Vec<WatchedMovie>>>(&raw) {
                Ok(Some(list)) => {
                    tracing::info!("Loaded {} watched movies from '{}'", list.len(), key);
                    dedupe(list)
                }
                Ok(None) => initial,
                Err(e) => {
                    tracing::warn!("已观看列表损坏，使用默认值: {}", e);
                    backup_corrupted(&storage, &key, &raw).await;
                    initial
                }
            },
            Ok(None) => {
                tracing::info!("No stored watched list under '{}', using default", key);
                initial
            }
            Err(e) => {
                tracing::warn!("读取已观看列表失败，使用默认值: {}", e);
                initial
            }
        };

        Self { storage, key, list }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn list(&self) -> &[WatchedMovie] {
        &self.list
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedMovie> {
        self.list.iter().find(|m| m.imdb_id == imdb_id)
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_movies(&self.list)
    }

    /// 更新列表
    ///
    /// 内容有变化时把完整列表序列化写回存储；写入失败则内存中的列表保持不变。
    /// 返回列表是否发生变化。
    pub async fn set(&mut self, update: impl Into<ListUpdate>) -> Result<bool, WatchListError> {
        let next = match update.into() {
            ListUpdate::Replace(list) => list,
            ListUpdate::Apply(f) => f(&self.list),
        };

        if next == self.list {
            return Ok(false);
        }

        let json = serde_json::to_string(&next)?;
        if let Err(e) = self.storage.set(&self.key, &json).await {
            tracing::error!("Failed to persist watched list '{}': {}", self.key, e);
            return Err(e.into());
        }

        self.list = next;
        tracing::debug!("Persisted {} watched movies to '{}'", self.list.len(), self.key);
        Ok(true)
    }

    /// 添加已观看电影，同一 IMDb ID 只能出现一次
    pub async fn add(&mut self, movie: WatchedMovie) -> Result<(), WatchListError> {
        movie.validate()?;

        if self.contains(&movie.imdb_id) {
            return Err(WatchListError::AlreadyWatched(movie.imdb_id));
        }

        tracing::info!("Adding '{}' ({}) to watched list", movie.title, movie.imdb_id);
        self.set(ListUpdate::apply(move |prev| {
            let mut next = prev.to_vec();
            next.push(movie);
            next
        }))
        .await?;

        Ok(())
    }

    /// 按 IMDb ID 删除，返回被删除的条目
    pub async fn remove(&mut self, imdb_id: &str) -> Result<WatchedMovie, WatchListError> {
        let removed = self
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| WatchListError::NotWatched(imdb_id.to_string()))?;

        let id = imdb_id.to_string();
        self.set(ListUpdate::apply(move |prev| {
            prev.iter().filter(|m| m.imdb_id != id).cloned().collect()
        }))
        .await?;

        tracing::info!("Removed '{}' ({}) from watched list", removed.title, removed.imdb_id);
        Ok(removed)
    }
}

/// 存储中的重复条目只保留第一条
fn dedupe(list: Vec<WatchedMovie>) -> Vec<WatchedMovie> {
    let mut seen = HashSet::new();
    let before = list.len();
    let list: Vec<WatchedMovie> = list
        .into_iter()
        .filter(|m| seen.insert(m.imdb_id.clone()))
        .collect();

    if list.len() != before {
        tracing::warn!("Dropped {} duplicate watched entries", before - list.len());
    }
    list
}

async fn backup_corrupted<S: KeyValueStorage>(storage: &S, key: &str, raw: &str) {
    let backup_key = format!("{}.corrupt", key);
    match storage.set(&backup_key, raw).await {
        Ok(()) => tracing::info!("已备份损坏的列表到 '{}'", backup_key),
        Err(e) => tracing::warn!("备份损坏的列表失败: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStorage;

    fn watched(id: &str, user_rating: u8) -> WatchedMovie {
        WatchedMovie {
            imdb_id: id.to_string(),
            title: format!("Movie {}", id),
            year: "1999".to_string(),
            poster: None,
            imdb_rating: Some(8.0),
            user_rating,
            runtime: Some(120),
            count_rating_decisions: None,
        }
    }

    #[tokio::test]
    async fn test_open_without_stored_value_uses_initial() {
        let initial = vec![watched("tt0000001", 7)];
        let store = WatchListStore::open(MemoryStorage::new(), "watched", initial.clone()).await;

        assert_eq!(store.list(), initial.as_slice());
        // 仅恢复不写入
        assert_eq!(store.storage().get("watched").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_open_null_uses_initial() {
        let storage = MemoryStorage::with_entry("watched", "null");
        let store = WatchListStore::open(storage, "watched", Vec::new()).await;

        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_open_corrupted_falls_back_and_backs_up() {
        let storage = MemoryStorage::with_entry("watched", "{not json");
        let store = WatchListStore::open(storage, "watched", vec![watched("tt0000001", 5)]).await;

        assert_eq!(store.list().len(), 1);
        assert_eq!(
            store.storage().get("watched.corrupt").await.unwrap(),
            Some("{not json".to_string())
        );
    }

    #[tokio::test]
    async fn test_open_drops_duplicates() {
        let stored = serde_json::to_string(&vec![
            watched("tt0000001", 5),
            watched("tt0000001", 9),
            watched("tt0000002", 6),
        ])
        .unwrap();
        let storage = MemoryStorage::with_entry("watched", &stored);

        let store = WatchListStore::open(storage, "watched", Vec::new()).await;
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.get("tt0000001").unwrap().user_rating, 5);
    }

    #[tokio::test]
    async fn test_set_unchanged_does_not_write() {
        let mut store = WatchListStore::open(MemoryStorage::new(), "watched", Vec::new()).await;

        assert!(!store.set(Vec::new()).await.unwrap());
        assert_eq!(store.storage().get("watched").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replace_and_apply() {
        let mut store = WatchListStore::open(MemoryStorage::new(), "watched", Vec::new()).await;

        assert!(store.set(vec![watched("tt0000001", 5)]).await.unwrap());
        assert!(store
            .set(ListUpdate::apply(|prev| {
                let mut next = prev.to_vec();
                next.push(watched("tt0000002", 6));
                next
            }))
            .await
            .unwrap());

        let stored = store.storage().get("watched").await.unwrap().unwrap();
        let parsed: Vec<WatchedMovie> = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed, store.list());
    }

    #[tokio::test]
    async fn test_add_rejects_duplicates_and_invalid() {
        let mut store = WatchListStore::open(MemoryStorage::new(), "watched", Vec::new()).await;

        store.add(watched("tt0000001", 5)).await.unwrap();
        assert!(matches!(
            store.add(watched("tt0000001", 8)).await,
            Err(WatchListError::AlreadyWatched(_))
        ));
        assert!(matches!(
            store.add(watched("tt0000002", 11)).await,
            Err(WatchListError::Validation(_))
        ));
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing() {
        let mut store = WatchListStore::open(MemoryStorage::new(), "watched", Vec::new()).await;

        assert!(matches!(
            store.remove("tt0000001").await,
            Err(WatchListError::NotWatched(_))
        ));
    }
}
