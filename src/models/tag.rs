//! # مدل برچسب

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Dates;

/// Entity برچسب
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,

    /// نام یکتا
    pub name: String,

    /// slug یونیکدی
    pub keyword: String,

    pub is_active: bool,
    pub language: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// درخواست ساخت یا ویرایش برچسب
///
/// اگه `keyword` داده نشه از روی نام ساخته میشه.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: String,

    #[validate(length(max = 50))]
    #[serde(default)]
    pub keyword: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

/// برچسب آماده ذخیره
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDraft {
    pub name: String,
    pub keyword: String,
    pub is_active: bool,
    pub language: String,
}

/// پاسخ برچسب
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub keyword: String,
    pub is_active: bool,
    pub language: String,

    #[serde(flatten)]
    pub dates: Dates,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            dates: Dates::new(tag.created_at, tag.updated_at),
            id: tag.id,
            name: tag.name,
            keyword: tag.keyword,
            is_active: tag.is_active,
            language: tag.language,
        }
    }
}
