// 运行配置
//
// 从环境变量（可由 .env 提供）读取 OMDb 凭据和本地存储位置

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::services::validate_key;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_STORE_DIR: &str = "./data";
pub const DEFAULT_STORE_KEY: &str = "watched";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: Url,
    pub store_dir: PathBuf,
    pub store_key: String,
    pub request_timeout: Duration,
}

impl Settings {
    /// 从进程环境加载配置
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过任意查找函数加载配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OMDB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("OMDb API key not configured (set OMDB_API_KEY)"))?;

        let base_url = lookup("OMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("Invalid OMDB_BASE_URL: {}", base_url))?;

        let store_dir = lookup("WATCHED_STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));

        let store_key = lookup("WATCHED_STORE_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_KEY.to_string());
        validate_key(&store_key).context("Invalid WATCHED_STORE_KEY")?;

        let timeout_secs = match lookup("OMDB_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid OMDB_TIMEOUT_SECS: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url,
            store_dir,
            store_key,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
