//! # Data Transfer Objects (DTOs)
//!
//! DTO‌های عمومی که در API استفاده میشن
//!
//! ## مفاهیم:
//! - DTO: برای انتقال داده بین لایه‌ها
//! - Request/Response separation: جداسازی ورودی از خروجی

use serde::{Deserialize, Serialize};

// =====================================
// Generic API Responses
// =====================================
/// پاسخ موفق عمومی
///
/// # مفاهیم:
/// - Generic: کار با هر نوع داده
/// - `T: Serialize`: T باید قابل تبدیل به JSON باشه
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// ساخت پاسخ موفق
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// اضافه کردن پیام
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// پاسخ خالی برای عملیات‌هایی که داده برنمیگردونن (مثل حذف)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyResponse {
    pub success: bool,
    pub message: String,
}

impl EmptyResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// =====================================
// Health Check
// =====================================
/// پاسخ health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}

impl HealthResponse {
    #[must_use]
    pub fn from_check(database_ok: bool) -> Self {
        Self {
            status: if database_ok { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database_ok,
        }
    }
}

// =====================================
// Language Switch
// =====================================
/// ورودی تغییر زبان: مسیر فعلی و زبان مقصد
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageSwitchQuery {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub language: String,
}

/// مسیر جدید بعد از تغییر زبان
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSwitchResponse {
    pub language: String,
    pub path: String,
}
