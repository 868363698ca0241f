use thiserror::Error;

/// 用户评分的取值范围
pub const MIN_USER_RATING: u8 = 1;
pub const MAX_USER_RATING: u8 = 10;

/// 验证错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("IMDb ID cannot be empty")]
    EmptyImdbId,

    #[error("Invalid IMDb ID format: {0}")]
    InvalidImdbId(String),

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Invalid user rating: {0} (must be between 1 and 10)")]
    InvalidUserRating(u8),

    #[error("Invalid IMDb rating: {0} (must be between 0.0 and 10.0)")]
    InvalidImdbRating(f32),
}

/// 验证器trait
pub trait Validator {
    type Error;

    fn validate(&self) -> Result<(), Self::Error>;
}

/// 字符串验证工具
pub struct StringValidator;

impl StringValidator {
    pub fn validate_title(title: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// IMDb 标识符形如 `tt0133093`
    pub fn validate_imdb_id(id: &str) -> Result<(), ValidationError> {
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyImdbId);
        }

        let digits = id.strip_prefix("tt").unwrap_or("");
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidImdbId(id.to_string()));
        }

        Ok(())
    }
}

/// 数值验证工具
pub struct NumberValidator;

impl NumberValidator {
    pub fn validate_user_rating(rating: u8) -> Result<(), ValidationError> {
        if !(MIN_USER_RATING..=MAX_USER_RATING).contains(&rating) {
            return Err(ValidationError::InvalidUserRating(rating));
        }
        Ok(())
    }

    pub fn validate_imdb_rating(rating: &Option<f32>) -> Result<(), ValidationError> {
        if let Some(r) = rating {
            if !(0.0..=10.0).contains(r) {
                return Err(ValidationError::InvalidImdbRating(*r));
            }
        }
        Ok(())
    }
}
