use serde::{Deserialize, Serialize};

use super::movie::MovieDetail;
use super::validation::{NumberValidator, StringValidator, ValidationError, Validator};

/// 已观看电影
///
/// 序列化字段名与本地存储中的 JSON 格式一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedMovie {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<f32>,
    #[serde(rename = "userRating")]
    pub user_rating: u8,
    /// 片长（分钟）
    pub runtime: Option<u32>,
    /// 提交前用户修改评分的次数
    #[serde(
        rename = "countRatingDecisions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub count_rating_decisions: Option<u32>,
}

impl WatchedMovie {
    /// 由电影详情和用户评分创建
    pub fn from_detail(
        detail: &MovieDetail,
        user_rating: u8,
        count_rating_decisions: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let movie = Self {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            imdb_rating: detail.imdb_rating,
            user_rating,
            runtime: detail.runtime,
            count_rating_decisions,
        };
        movie.validate()?;
        Ok(movie)
    }
}

impl Validator for WatchedMovie {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        StringValidator::validate_imdb_id(&self.imdb_id)?;
        StringValidator::validate_title(&self.title)?;
        NumberValidator::validate_user_rating(self.user_rating)?;
        NumberValidator::validate_imdb_rating(&self.imdb_rating)?;
        Ok(())
    }
}

/// 已观看列表的统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f32,
    pub avg_user_rating: f32,
    pub avg_runtime: f32,
}

impl WatchedSummary {
    pub fn from_movies(movies: &[WatchedMovie]) -> Self {
        Self {
            count: movies.len(),
            avg_imdb_rating: average(movies.iter().filter_map(|m| m.imdb_rating)),
            avg_user_rating: average(movies.iter().map(|m| f32::from(m.user_rating))),
            avg_runtime: average(movies.iter().filter_map(|m| m.runtime.map(|r| r as f32))),
        }
    }
}

/// 缺失值不参与平均，空集合为 0
fn average(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0_f32, 0_u32), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watched(id: &str, imdb: Option<f32>, user: u8, runtime: Option<u32>) -> WatchedMovie {
        WatchedMovie {
            imdb_id: id.to_string(),
            title: "Test".to_string(),
            year: "2000".to_string(),
            poster: None,
            imdb_rating: imdb,
            user_rating: user,
            runtime,
            count_rating_decisions: None,
        }
    }

    #[test]
    fn test_summary_of_empty_list() {
        let summary = WatchedSummary::from_movies(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_imdb_rating, 0.0);
        assert_eq!(summary.avg_user_rating, 0.0);
        assert_eq!(summary.avg_runtime, 0.0);
    }

    #[test]
    fn test_summary_skips_missing_values() {
        let movies = vec![
            watched("tt1375666", Some(8.8), 10, Some(148)),
            watched("tt0088763", Some(8.4), 8, Some(116)),
            watched("tt0000001", None, 6, None),
        ];

        let summary = WatchedSummary::from_movies(&movies);
        assert_eq!(summary.count, 3);
        assert!((summary.avg_imdb_rating - 8.6).abs() < 1e-4);
        assert!((summary.avg_user_rating - 8.0).abs() < 1e-4);
        assert!((summary.avg_runtime - 132.0).abs() < 1e-4);
    }

    #[test]
    fn test_stored_json_field_names() {
        let movie = watched("tt0133093", Some(8.7), 9, Some(136));
        let json = serde_json::to_value(&movie).unwrap();

        assert_eq!(json["imdbID"], "tt0133093");
        assert_eq!(json["userRating"], 9);
        assert_eq!(json["runtime"], 136);
        assert!(json.get("countRatingDecisions").is_none());
    }

    #[test]
    fn test_reads_entry_without_decision_count() {
        let json = r#"{
            "imdbID": "tt1375666",
            "title": "Inception",
            "year": "2010",
            "poster": null,
            "imdbRating": 8.8,
            "userRating": 10,
            "runtime": 148
        }"#;

        let movie: WatchedMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.count_rating_decisions, None);
        assert_eq!(movie.runtime, Some(148));
    }

    #[test]
    fn test_from_detail_rejects_bad_rating() {
        let detail = MovieDetail {
            imdb_id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            poster: None,
            imdb_rating: Some(8.7),
            runtime: Some(136),
            released: None,
            genre: None,
            plot: None,
            actors: None,
            director: None,
            writer: None,
            awards: None,
            kind: None,
            website: None,
        };

        assert!(WatchedMovie::from_detail(&detail, 0, None).is_err());
        let movie = WatchedMovie::from_detail(&detail, 9, Some(2)).unwrap();
        assert_eq!(movie.user_rating, 9);
        assert_eq!(movie.count_rating_decisions, Some(2));
    }
}
