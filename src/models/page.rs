//! # مدل صفحه
//!
//! صفحه محتوای یک زبانه. هر گروه برای هر زبان حداکثر یک صفحه داره.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{Dates, TagResponse};

// =====================================
// Entity
// =====================================
/// Entity صفحه (ردیف جدول `pages`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Page {
    pub id: i64,

    /// شناسه عمومی (مثلا `P_K3Z9Q2LM`)
    pub pid: String,

    /// گروه صاحب صفحه
    pub group_gid: Option<String>,

    pub language: String,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub event: String,

    /// مسیر ذخیره‌شده تصویر
    pub image: Option<String>,
    pub image_caption: String,
    pub reference: String,
    pub website: String,
    pub author: String,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =====================================
// Request DTOs
// =====================================
/// درخواست ساخت یا جایگزینی صفحه
///
/// زبان از context درخواست میاد، نه از body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PageRequest {
    /// gid گروه (اختیاری)
    #[serde(default)]
    pub group: Option<String>,

    #[validate(length(min = 1, max = 128, message = "Title must be 1-128 characters"))]
    pub title: String,

    #[validate(length(max = 128))]
    #[serde(default)]
    pub subtitle: Option<String>,

    #[validate(length(min = 1, max = 1024, message = "Content must be 1-1024 characters"))]
    pub content: String,

    #[validate(length(max = 128))]
    #[serde(default)]
    pub event: Option<String>,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub image: Option<String>,

    #[validate(length(max = 128))]
    #[serde(default)]
    pub image_caption: Option<String>,

    #[validate(length(max = 128))]
    #[serde(default)]
    pub reference: Option<String>,

    #[validate(url(message = "Invalid website URL"))]
    #[serde(default)]
    pub website: Option<String>,

    #[validate(email(message = "Invalid author email"))]
    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,

    /// شناسه برچسب‌ها
    #[serde(default)]
    pub tags: Vec<i64>,
}

/// صفحه آماده ذخیره (بعد از نرمال‌سازی)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDraft {
    pub group_gid: Option<String>,
    pub language: String,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub event: String,
    pub image: Option<String>,
    pub image_caption: String,
    pub reference: String,
    pub website: String,
    pub author: String,
    pub is_active: bool,
    pub tag_ids: Vec<i64>,
}

// =====================================
// Response DTOs
// =====================================
/// لینک‌های مرتبط با صفحه
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLinks {
    /// آدرس عمومی صفحه
    pub public: String,

    /// گزارش‌های این صفحه
    pub reports: String,
}

/// پاسخ صفحه
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub pid: String,
    pub group: Option<String>,
    pub language: String,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub event: String,
    pub image: Option<String>,
    pub image_caption: String,
    pub reference: String,
    pub website: String,
    pub author: String,
    pub is_active: bool,
    pub tags: Vec<TagResponse>,
    pub links: PageLinks,

    #[serde(flatten)]
    pub dates: Dates,
}

impl PageResponse {
    /// ساخت پاسخ از entity و برچسب‌هاش
    #[must_use]
    pub fn from_page(page: Page, tags: Vec<TagResponse>, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let links = PageLinks {
            public: format!("{}/pages/{}", base, page.pid),
            reports: format!("{}/api/reports?q={}", base, page.pid),
        };

        Self {
            dates: Dates::new(page.created_at, page.updated_at),
            pid: page.pid,
            group: page.group_gid,
            language: page.language,
            title: page.title,
            subtitle: page.subtitle,
            content: page.content,
            event: page.event,
            image: page.image,
            image_caption: page.image_caption,
            reference: page.reference,
            website: page.website,
            author: page.author,
            is_active: page.is_active,
            tags,
            links,
        }
    }
}
