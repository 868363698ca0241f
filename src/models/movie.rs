use serde::{Deserialize, Serialize};

/// 搜索结果中的电影摘要
///
/// 字段名与 OMDb 搜索响应保持一致，便于直接反序列化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster")]
    pub poster: String,
}

/// 电影详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: Option<String>,
    pub imdb_rating: Option<f32>,
    /// 片长（分钟）
    pub runtime: Option<u32>,
    pub released: Option<String>,
    pub genre: Option<String>,
    pub plot: Option<String>,
    pub actors: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub awards: Option<String>,
    pub kind: Option<String>,
    pub website: Option<String>,
}

/// OMDb 用 "N/A" 表示缺失值
pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("N/A") {
        None
    } else {
        Some(value.to_string())
    }
}

/// 解析 "148 min" 形式的片长
pub fn parse_runtime(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

/// 解析 "8.7" 形式的评分
pub fn parse_rating(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime() {
        assert_eq!(parse_runtime("148 min"), Some(148));
        assert_eq!(parse_runtime("90"), Some(90));
        assert_eq!(parse_runtime("N/A"), None);
        assert_eq!(parse_runtime(""), None);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("8.7"), Some(8.7));
        assert_eq!(parse_rating("N/A"), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("N/A"), None);
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty("Keanu Reeves"), Some("Keanu Reeves".to_string()));
    }

    #[test]
    fn test_summary_uses_omdb_field_names() {
        let json = r#"{
            "Title": "The Matrix",
            "Year": "1999",
            "imdbID": "tt0133093",
            "Type": "movie",
            "Poster": "https://example.com/matrix.jpg"
        }"#;

        let summary: MovieSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.imdb_id, "tt0133093");
        assert_eq!(summary.title, "The Matrix");
        assert_eq!(summary.year, "1999");
    }
}
