pub mod cache;
pub mod error;
pub mod omdb;

use async_trait::async_trait;
use std::sync::Arc;

pub use cache::{CacheCleanupTask, CacheStats, OmdbCache};
pub use error::OmdbError;
pub use omdb::{OmdbClient, OmdbMovieDetails, OmdbSearchResponse};

use crate::models::{MovieDetail, MovieSummary};

/// 电影数据源
///
/// 搜索控制器和详情流程只依赖这个 trait，测试中可替换为桩实现
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// 按关键字搜索，`Response: "False"` 时返回 [`OmdbError::NoResults`]
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, OmdbError>;

    /// 按 IMDb ID 获取详情
    async fn get_movie_details(&self, imdb_id: &str) -> Result<MovieDetail, OmdbError>;
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, OmdbError> {
        self.search(query).await?.into_results()
    }

    async fn get_movie_details(&self, imdb_id: &str) -> Result<MovieDetail, OmdbError> {
        self.movie(imdb_id).await?.into_detail(imdb_id)
    }
}

#[async_trait]
impl<T: MovieApi + ?Sized> MovieApi for Arc<T> {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, OmdbError> {
        (**self).search_movies(query).await
    }

    async fn get_movie_details(&self, imdb_id: &str) -> Result<MovieDetail, OmdbError> {
        (**self).get_movie_details(imdb_id).await
    }
}

/// 带详情缓存的数据源
///
/// 搜索直接转发给内部数据源；详情只缓存成功结果，失败交给下一次请求重试
#[derive(Clone)]
pub struct CachedMovieApi<A> {
    inner: A,
    pub cache: OmdbCache,
}

impl<A: MovieApi> CachedMovieApi<A> {
    pub fn new(inner: A) -> Self {
        Self::with_cache(inner, OmdbCache::new())
    }

    pub fn with_cache(inner: A, cache: OmdbCache) -> Self {
        Self { inner, cache }
    }

    pub fn get_cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }
}

#[async_trait]
impl<A: MovieApi> MovieApi for CachedMovieApi<A> {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, OmdbError> {
        self.inner.search_movies(query).await
    }

    async fn get_movie_details(&self, imdb_id: &str) -> Result<MovieDetail, OmdbError> {
        if let Some(cached_details) = self.cache.get_details(imdb_id) {
            tracing::debug!("Cache hit for movie details: {}", imdb_id);
            return Ok(cached_details);
        }

        let details = self.inner.get_movie_details(imdb_id).await?;
        self.cache.set_details(imdb_id, details.clone());
        tracing::debug!("Cached movie details: {}", imdb_id);

        Ok(details)
    }
}
