// 服务层错误类型定义

use thiserror::Error;

use crate::external::OmdbError;
use crate::models::ValidationError;

/// 持久化存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("无效的存储键: {0}")]
    InvalidKey(String),
}

/// 已观看列表操作错误
#[derive(Debug, Error)]
pub enum WatchListError {
    #[error("Movie already in watched list: {0}")]
    AlreadyWatched(String),

    #[error("Movie not in watched list: {0}")]
    NotWatched(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 选择/评分流程错误
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("No movie selected")]
    NothingSelected,

    #[error("Movie details not loaded")]
    DetailsNotLoaded,

    #[error("Rate the movie before adding it")]
    NoRating,

    #[error(transparent)]
    Api(#[from] OmdbError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    WatchList(#[from] WatchListError),
}
