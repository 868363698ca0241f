use std::sync::Arc;

use super::error::SelectionError;
use super::storage::KeyValueStorage;
use super::watch_list::WatchListStore;
use crate::external::MovieApi;
use crate::models::{MovieDetail, NumberValidator, WatchedMovie};

/// 当前选中的电影及其评分
pub struct MovieSelection<A> {
    api: Arc<A>,
    selected_id: Option<String>,
    detail: Option<MovieDetail>,
    user_rating: Option<u8>,
    rating_decisions: u32,
}

impl<A: MovieApi> MovieSelection<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            selected_id: None,
            detail: None,
            user_rating: None,
            rating_decisions: 0,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    pub fn user_rating(&self) -> Option<u8> {
        self.user_rating
    }

    pub fn rating_decisions(&self) -> u32 {
        self.rating_decisions
    }

    /// 选中同一部电影时取消选中，否则切换到新电影
    pub fn toggle(&mut self, imdb_id: &str) -> Option<&str> {
        if self.selected_id.as_deref() == Some(imdb_id) {
            self.clear();
        } else {
            self.clear();
            self.selected_id = Some(imdb_id.to_string());
        }
        self.selected_id()
    }

    pub fn clear(&mut self) {
        self.selected_id = None;
        self.detail = None;
        self.user_rating = None;
        self.rating_decisions = 0;
    }

    /// 获取选中电影的详情
    pub async fn load_details(&mut self) -> Result<&MovieDetail, SelectionError> {
        let imdb_id = self
            .selected_id
            .clone()
            .ok_or(SelectionError::NothingSelected)?;

        let detail = self.api.get_movie_details(&imdb_id).await?;
        tracing::debug!("Loaded details for {} ({})", detail.title, imdb_id);

        Ok(self.detail.insert(detail))
    }

    /// 设置评分，每次改成不同的值都计为一次决定
    pub fn set_rating(&mut self, rating: u8) -> Result<(), SelectionError> {
        if self.selected_id.is_none() {
            return Err(SelectionError::NothingSelected);
        }
        NumberValidator::validate_user_rating(rating)?;

        if self.user_rating != Some(rating) {
            self.rating_decisions += 1;
            self.user_rating = Some(rating);
        }
        Ok(())
    }

    /// 选中电影已在列表中时返回之前的评分
    pub fn existing_rating<S: KeyValueStorage>(&self, store: &WatchListStore<S>) -> Option<u8> {
        let imdb_id = self.selected_id.as_deref()?;
        store.get(imdb_id).map(|m| m.user_rating)
    }

    /// 确认评分，加入已观看列表并取消选中
    pub async fn confirm<S: KeyValueStorage>(
        &mut self,
        store: &mut WatchListStore<S>,
    ) -> Result<WatchedMovie, SelectionError> {
        let imdb_id = self
            .selected_id
            .as_deref()
            .ok_or(SelectionError::NothingSelected)?;
        let detail = self.detail.as_ref().ok_or(SelectionError::DetailsNotLoaded)?;
        let rating = self.user_rating.ok_or(SelectionError::NoRating)?;

        let mut movie = WatchedMovie::from_detail(detail, rating, Some(self.rating_decisions))?;
        movie.imdb_id = imdb_id.to_string();

        store.add(movie.clone()).await?;
        self.clear();

        Ok(movie)
    }
}
