// 搜索控制器
//
// 持有搜索词，搜索词变化时发起远程查询：
// - 去除首尾空白后少于 MIN_QUERY_LEN 个字符时清空结果，不发请求
// - 每次查询持有独立的取消令牌，新查询开始前取消旧查询
// - 只有最新一次查询的结果可以写入共享状态

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::external::MovieApi;
use crate::models::MovieSummary;

/// 触发查询的最短搜索词长度
pub const MIN_QUERY_LEN: usize = 3;

/// 查询状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// 搜索词太短，没有查询
    #[default]
    Idle,
    /// 查询进行中
    Loading,
    /// 最近一次查询已结束（成功或失败）
    Settled,
}

/// 对外暴露的搜索状态
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<MovieSummary>,
    pub status: SearchStatus,
    /// 为空表示没有错误
    pub error: String,
}

impl SearchSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

#[derive(Debug, Default)]
struct SearchState {
    snapshot: SearchSnapshot,
    /// 每次 set_query 递增，查询结果只在代数一致时写入
    generation: u64,
}

type QueryChangeCallback = Box<dyn FnMut() + Send>;

pub struct QuerySearchController<A> {
    api: Arc<A>,
    state: Arc<RwLock<SearchState>>,
    in_flight: Option<CancellationToken>,
    on_query_change: Option<QueryChangeCallback>,
}

impl<A: MovieApi + 'static> QuerySearchController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(SearchState::default())),
            in_flight: None,
            on_query_change: None,
        }
    }

    /// 搜索词每次变化时先调用的回调（例如清空当前选中的电影）
    pub fn with_on_query_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_query_change = Some(Box::new(callback));
        self
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        read_state(&self.state).snapshot.clone()
    }

    /// 更新搜索词
    ///
    /// 发起了查询时返回查询任务的句柄；搜索词太短时返回 `None`。
    /// 必须在 tokio 运行时中调用（搜索词太短时除外）。
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<JoinHandle<()>> {
        let query = query.into();

        if let Some(callback) = self.on_query_change.as_mut() {
            callback();
        }

        self.cancel();

        let trimmed = query.trim().to_string();
        let generation = {
            let mut state = write_state(&self.state);
            state.generation += 1;
            state.snapshot.query = query;
            state.snapshot.error.clear();

            if trimmed.chars().count() < MIN_QUERY_LEN {
                state.snapshot.results.clear();
                state.snapshot.status = SearchStatus::Idle;
                return None;
            }

            state.snapshot.status = SearchStatus::Loading;
            state.generation
        };

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        tracing::debug!("Searching movies for {:?} (generation {})", trimmed, generation);
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        Some(tokio::spawn(run_lookup(api, state, trimmed, generation, token)))
    }

    /// 取消进行中的查询，状态保持不变
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

impl<A> Drop for QuerySearchController<A> {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

async fn run_lookup<A: MovieApi>(
    api: Arc<A>,
    state: Arc<RwLock<SearchState>>,
    query: String,
    generation: u64,
    token: CancellationToken,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!("Search for {:?} cancelled", query);
            return;
        }
        outcome = api.search_movies(&query) => outcome,
    };

    let mut guard = write_state(&state);
    if token.is_cancelled() || guard.generation != generation {
        tracing::debug!("Discarding stale search response for {:?}", query);
        return;
    }

    match outcome {
        Ok(results) => {
            tracing::debug!("Search for {:?} returned {} movies", query, results.len());
            guard.snapshot.results = results;
            guard.snapshot.error.clear();
        }
        Err(e) => {
            if e.is_transport() {
                tracing::warn!("Search for {:?} failed: {:?}", query, e);
            } else {
                tracing::debug!("Search for {:?} failed: {}", query, e);
            }
            guard.snapshot.error = e.to_string();
        }
    }
    guard.snapshot.status = SearchStatus::Settled;
}

fn read_state(state: &RwLock<SearchState>) -> RwLockReadGuard<'_, SearchState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_state(state: &RwLock<SearchState>) -> RwLockWriteGuard<'_, SearchState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}
