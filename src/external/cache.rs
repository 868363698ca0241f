use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};

use crate::models::MovieDetail;

/// 缓存条目
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    created_at: Instant,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// 内存缓存实现
#[derive(Debug, Clone)]
pub struct MemoryCache<T> {
    cache: Arc<RwLock<HashMap<String, CacheEntry<T>>>>,
    default_ttl: Duration,
}

impl<T: Clone> MemoryCache<T> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let cache = self.cache.read().ok()?;
        let entry = cache.get(key)?;

        if entry.is_expired() {
            drop(cache);
            self.remove(key);
            None
        } else {
            Some(entry.data.clone())
        }
    }

    pub fn set(&self, key: String, value: T) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, CacheEntry::new(value, self.default_ttl));
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(key);
        }
    }

    pub fn cleanup_expired(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, entry| !entry.is_expired());
        }
    }

    pub fn size(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

/// OMDb 详情缓存
///
/// 只缓存详情：搜索结果总是实时请求
#[derive(Debug, Clone)]
pub struct OmdbCache {
    details_cache: MemoryCache<MovieDetail>,
}

impl OmdbCache {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(2 * 60 * 60))
    }

    pub fn with_ttl(details_ttl: Duration) -> Self {
        Self {
            details_cache: MemoryCache::new(details_ttl),
        }
    }

    fn details_cache_key(imdb_id: &str) -> String {
        format!("details:{}", imdb_id)
    }

    pub fn get_details(&self, imdb_id: &str) -> Option<MovieDetail> {
        self.details_cache.get(&Self::details_cache_key(imdb_id))
    }

    pub fn set_details(&self, imdb_id: &str, details: MovieDetail) {
        self.details_cache.set(Self::details_cache_key(imdb_id), details);
    }

    /// 清理过期缓存
    pub fn cleanup_expired(&self) {
        self.details_cache.cleanup_expired();
    }

    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            details_cache_size: self.details_cache.size(),
        }
    }
}

impl Default for OmdbCache {
    fn default() -> Self {
        Self::new()
    }
}

/// 缓存统计信息
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub details_cache_size: usize,
}

/// 缓存清理任务
pub struct CacheCleanupTask {
    cache: OmdbCache,
    interval: Duration,
}

impl CacheCleanupTask {
    pub fn new(cache: OmdbCache, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// 启动定期清理任务
    pub async fn start(self) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            self.cache.cleanup_expired();
            tracing::debug!("Cache cleanup completed. Stats: {:?}", self.cache.get_stats());
        }
    }
}
