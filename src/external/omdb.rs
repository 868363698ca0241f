use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::OmdbError;
use crate::config::{Settings, DEFAULT_BASE_URL};
use crate::models::movie::{non_empty, parse_rating, parse_runtime};
use crate::models::{MovieDetail, MovieSummary};

/// OMDb API客户端
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 按配置创建客户端（带请求超时）
    pub fn from_settings(settings: &Settings) -> Result<Self, OmdbError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 搜索请求地址
    pub fn search_url(&self, query: &str) -> Result<Url, OmdbError> {
        self.build_url(&[("s", query)])
    }

    /// 详情请求地址
    pub fn details_url(&self, imdb_id: &str) -> Result<Url, OmdbError> {
        self.build_url(&[("i", imdb_id)])
    }

    fn build_url(&self, params: &[(&str, &str)]) -> Result<Url, OmdbError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| OmdbError::Network(format!("invalid base url {}: {}", self.base_url, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apikey", &self.api_key);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// 搜索电影
    pub async fn search(&self, query: &str) -> Result<OmdbSearchResponse, OmdbError> {
        let url = self.search_url(query)?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(OmdbError::HttpStatus(response.status().as_u16()));
        }

        let search_result: OmdbSearchResponse = response.json().await?;
        Ok(search_result)
    }

    /// 获取电影详情
    pub async fn movie(&self, imdb_id: &str) -> Result<OmdbMovieDetails, OmdbError> {
        let url = self.details_url(imdb_id)?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(OmdbError::HttpStatus(response.status().as_u16()));
        }

        let details: OmdbMovieDetails = response.json().await?;
        Ok(details)
    }
}

/// OMDb搜索响应
#[derive(Debug, Deserialize, Serialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<MovieSummary>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbSearchResponse {
    pub fn is_success(&self) -> bool {
        !self.response.eq_ignore_ascii_case("False")
    }

    pub fn into_results(self) -> Result<Vec<MovieSummary>, OmdbError> {
        if !self.is_success() {
            tracing::debug!("OMDb search returned no results: {:?}", self.error);
            return Err(OmdbError::NoResults);
        }
        Ok(self.search)
    }
}

/// OMDb电影详情
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OmdbMovieDetails {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster")]
    pub poster: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Writer")]
    pub writer: String,
    #[serde(rename = "Awards")]
    pub awards: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Website")]
    pub website: String,
}

impl OmdbMovieDetails {
    /// 转换为内部数据模型
    pub fn into_detail(self, requested_id: &str) -> Result<MovieDetail, OmdbError> {
        if self.response.eq_ignore_ascii_case("False") {
            tracing::debug!("OMDb details missing for {}: {:?}", requested_id, self.error);
            return Err(OmdbError::MovieNotFound(requested_id.to_string()));
        }

        let imdb_id = if self.imdb_id.is_empty() {
            requested_id.to_string()
        } else {
            self.imdb_id
        };

        Ok(MovieDetail {
            imdb_id,
            title: self.title,
            year: self.year,
            poster: non_empty(&self.poster),
            imdb_rating: parse_rating(&self.imdb_rating),
            runtime: parse_runtime(&self.runtime),
            released: non_empty(&self.released),
            genre: non_empty(&self.genre),
            plot: non_empty(&self.plot),
            actors: non_empty(&self.actors),
            director: non_empty(&self.director),
            writer: non_empty(&self.writer),
            awards: non_empty(&self.awards),
            kind: non_empty(&self.kind),
            website: non_empty(&self.website),
        })
    }
}
