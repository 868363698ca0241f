// 外部 API 错误类型定义
//
// Display 文本直接展示给用户，细节通过 Debug 输出到日志

use thiserror::Error;

/// OMDb 请求的统一错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OmdbError {
    #[error("something went wrong")]
    Network(String),

    #[error("something went wrong")]
    HttpStatus(u16),

    #[error("something went wrong")]
    Decode(String),

    /// 搜索返回 `Response: "False"`
    #[error("No movies found")]
    NoResults,

    /// 详情查询返回 `Response: "False"`
    #[error("Movie not found")]
    MovieNotFound(String),
}

impl OmdbError {
    /// 传输层失败（非业务失败）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            OmdbError::Network(_) | OmdbError::HttpStatus(_) | OmdbError::Decode(_)
        )
    }
}

// 实现从 reqwest::Error 到 OmdbError 的转换
impl From<reqwest::Error> for OmdbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            OmdbError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            OmdbError::HttpStatus(status.as_u16())
        } else {
            OmdbError::Network(err.to_string())
        }
    }
}
