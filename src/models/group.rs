//! # مدل گروه
//!
//! گروه فقط یک شناسه عمومی (gid) داره و صفحه‌های زبان‌های مختلف یک
//! موضوع رو کنار هم نگه میداره. بعد از ساخت تغییر نمیکنه.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Dates;

/// Entity گروه
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,

    /// شناسه عمومی (مثلا `G_8KQ2M1ZD`)
    pub gid: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// پاسخ گروه
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub gid: String,

    /// تعداد صفحه‌های این گروه
    pub page_count: i64,

    #[serde(flatten)]
    pub dates: Dates,
}

impl GroupResponse {
    #[must_use]
    pub fn from_group(group: &Group, page_count: i64) -> Self {
        Self {
            gid: group.gid.clone(),
            page_count,
            dates: Dates::new(group.created_at, group.updated_at),
        }
    }
}
