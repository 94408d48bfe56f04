//! # ماژول مدل‌ها (Domain Models)
//!
//! ## تفاوت انواع مدل:
//! - **Entity**: داده‌ای که در دیتابیس ذخیره میشه (`FromRow`)
//! - **Request DTO**: ورودی API با `Validate`
//! - **Response DTO**: خروجی API، با تاریخ‌های شمسی برای نمایش

mod group;
mod page;
mod report;
mod tag;
mod dto;

pub use group::*;
pub use page::*;
pub use report::*;
pub use tag::*;
pub use dto::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jalali::format_jalali;

// =====================================
// Dates
// =====================================
/// زمان‌های ایجاد و بروزرسانی برای پاسخ‌ها
///
/// نسخه شمسی فقط برای نمایشه؛ مقایسه و مرتب‌سازی روی مقدار UTC انجام میشه.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dates {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub jalali_created_at: String,
    pub jalali_updated_at: String,
}

impl Dates {
    #[must_use]
    pub fn new(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at,
            jalali_created_at: format_jalali(created_at),
            jalali_updated_at: format_jalali(updated_at),
        }
    }
}

// =====================================
// Pagination
// =====================================
/// پارامترهای صفحه‌بندی
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// شماره صفحه (از 1 شروع میشه)
    #[serde(default = "default_page")]
    pub page: u32,

    /// تعداد آیتم در صفحه
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 { 1 }
fn default_per_page() -> u32 { 20 }

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// محاسبه offset برای SQL
    ///
    /// در i64 حساب میشه؛ شماره صفحه مستقیم از query string میاد.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page.max(1)) - 1) * i64::from(self.limit())
    }

    /// محاسبه limit
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.per_page.clamp(1, 100)
    }
}

/// نتیجه صفحه‌بندی شده
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

/// اطلاعات صفحه‌بندی
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationInfo {
    #[must_use]
    pub fn new(pagination: &Pagination, total_items: u64) -> Self {
        let per_page = pagination.limit();
        let total_pages = total_items.div_ceil(u64::from(per_page)) as u32;
        let page = pagination.page.max(1);

        Self {
            current_page: page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

impl<T> PaginatedResult<T> {
    pub fn new(data: Vec<T>, pagination: &Pagination, total_items: u64) -> Self {
        Self {
            data,
            pagination: PaginationInfo::new(pagination, total_items),
        }
    }

    /// تبدیل آیتم‌ها با حفظ اطلاعات صفحه‌بندی
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

// =====================================
// List Query
// =====================================
/// پارامترهای لیست: صفحه‌بندی، جستجو و فیلترها
///
/// `status` فقط برای گزارش‌ها و `is_active` برای صفحه‌ها و برچسب‌ها استفاده میشه.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub per_page: Option<u32>,

    /// عبارت جستجو
    #[serde(default)]
    pub q: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default)]
    pub status: Option<ReportStatus>,
}

impl ListQuery {
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page.unwrap_or_else(default_page),
            per_page: self.per_page.unwrap_or_else(default_per_page),
        }
    }

    /// الگوی LIKE برای جستجو، یا None اگه عبارتی نیست
    ///
    /// `%` و `_` و `\\` escape میشن؛ کوئری‌ها باید `ESCAPE '\\'` داشته باشن.
    #[must_use]
    pub fn search_pattern(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(q)))
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset_and_limit() {
        let p = Pagination { page: 3, per_page: 10 };
        assert_eq!(p.offset(), 20);
        assert_eq!(Pagination { page: 0, per_page: 10 }.offset(), 0);
        assert_eq!(Pagination { page: 1, per_page: 500 }.limit(), 100);
    }

    #[test]
    fn test_pagination_offset_with_huge_page() {
        let query = ListQuery {
            page: Some(u32::MAX),
            per_page: Some(100),
            ..ListQuery::default()
        };
        assert_eq!(query.pagination().offset(), (i64::from(u32::MAX) - 1) * 100);
    }

    #[test]
    fn test_pagination_info() {
        let info = PaginationInfo::new(&Pagination { page: 2, per_page: 10 }, 35);
        assert_eq!(info.total_pages, 4);
        assert!(info.has_next);
        assert!(info.has_prev);
    }

    #[test]
    fn test_search_pattern() {
        let query = ListQuery { q: Some("  tehran ".to_string()), ..ListQuery::default() };
        assert_eq!(query.search_pattern().as_deref(), Some("%tehran%"));
        let blank = ListQuery { q: Some("   ".to_string()), ..ListQuery::default() };
        assert_eq!(blank.search_pattern(), None);
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let query = ListQuery { q: Some("P_AB%1\\".to_string()), ..ListQuery::default() };
        assert_eq!(query.search_pattern().as_deref(), Some("%P\\_AB\\%1\\\\%"));
    }

    #[test]
    fn test_dates_are_rendered_in_jalali() {
        use chrono::TimeZone;
        let ts = Utc.with_ymd_and_hms(2023, 3, 21, 8, 0, 0).unwrap();
        let dates = Dates::new(ts, ts);
        assert_eq!(dates.jalali_created_at, "۱۴۰۲/۰۱/۰۱");
    }
}
