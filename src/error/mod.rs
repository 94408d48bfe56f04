//! # ماژول مدیریت خطاها (Error Handling)
//!
//! همه خطاهای برنامه در یک enum جمع شدن و هر کدوم به یک status code
//! HTTP نگاشت میشن.
//!
//! ## مفاهیم Rust:
//! - **thiserror**: derive macro برای Error trait
//! - **From Trait**: تبدیل خودکار خطای کتابخانه‌ها با `#[from]`
//! - **Result Type Alias**: alias برای ساده‌تر شدن کد

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

// =====================================
// Result Type Alias
// =====================================
/// نوع Result سفارشی برنامه
///
/// به جای `Result<Page, AppError>` مینویسیم `Result<Page>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای کاربر (4xx)
    // ----------------------------------------

    /// درخواست نامعتبر - 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// پیدا نشد - 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// تکراری یا وضعیت ناسازگار - 409
    #[error("Conflict: {0}")]
    Conflict(String),

    /// خطای اعتبارسنجی - 422
    #[error("Validation error: {0}")]
    Validation(String),

    /// ورودی نامعتبر برای تغییر زبان - 400
    #[error("Language error: {0}")]
    Language(String),

    // ----------------------------------------
    // خطاهای سرور (5xx)
    // ----------------------------------------

    /// فضای شناسه‌ها بعد از چند تلاش هنوز تکراری میده
    #[error("Could not generate a unique {kind} after {attempts} attempts")]
    IdSpaceExhausted { kind: &'static str, attempts: u32 },

    /// خطای داخلی سرور - 500
    #[error("Internal server error: {0}")]
    Internal(String),

    /// خطای تنظیمات
    #[error("Configuration error: {0}")]
    Config(String),

    /// خطای ارسال ایمیل
    #[error("Mail error: {0}")]
    Mail(String),

    // ----------------------------------------
    // خطاهای تبدیل شده از کتابخانه‌ها
    // ----------------------------------------

    /// خطای دیتابیس
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// خطای migration
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// خطای IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// گرفتن HTTP status code متناسب با خطا
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::BadRequest(_) | Self::Language(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,

            // 5xx Server Errors
            Self::IdSpaceExhausted { .. }
            | Self::Internal(_)
            | Self::Config(_)
            | Self::Mail(_)
            | Self::Database(_)
            | Self::Migrate(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// آیا این خطا نقض unique روی ستون داده شده هست؟
    ///
    /// SQLite پیام رو به شکل `UNIQUE constraint failed: pages.pid` میده،
    /// پس `column` باید به صورت `table.column` باشه.
    #[must_use]
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db)) => {
                db.is_unique_violation() && db.message().contains(column)
            }
            _ => false,
        }
    }

    /// آیا این خطا نقض هر نوع unique هست؟
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::Database(db)) if db.is_unique_violation())
    }

    /// آیا این خطا نقض foreign key هست؟
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation())
    }

    /// ساخت خطای Not Found برای گروه
    #[must_use]
    pub fn group_not_found(gid: &str) -> Self {
        Self::NotFound(format!("Group '{}' not found", gid))
    }

    /// ساخت خطای Not Found برای صفحه
    #[must_use]
    pub fn page_not_found(pid: &str) -> Self {
        Self::NotFound(format!("Page '{}' not found", pid))
    }

    /// ساخت خطای Not Found برای گزارش
    #[must_use]
    pub fn report_not_found(rid: &str) -> Self {
        Self::NotFound(format!("Report '{}' not found", rid))
    }

    /// ساخت خطای Not Found برای برچسب
    #[must_use]
    pub fn tag_not_found(id: i64) -> Self {
        Self::NotFound(format!("Tag '{}' not found", id))
    }
}

// =====================================
// Error Response DTO
// =====================================
/// ساختار پاسخ خطا در API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// کد خطا (مثلا "Not Found")
    pub error: String,

    /// پیام خطا
    pub message: String,

    /// کد وضعیت HTTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// اضافه کردن کد وضعیت
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status.as_u16());
        self
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// تبدیل AppError به Response HTTP
///
/// این باعث میشه handler‌ها مستقیم `Result<_, AppError>` برگردونن.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        }

        let status = self.status_code();

        // جزئیات خطاهای داخلی به کلاینت نمیره
        let message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let error_response = ErrorResponse::new(
            status.canonical_reason().unwrap_or("Error"),
            message,
        )
        .with_status(status);

        (status, Json(error_response)).into_response()
    }
}

// =====================================
// From Implementations
// =====================================

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<::config::ConfigError> for AppError {
    fn from(err: ::config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(err: lettre::error::Error) -> Self {
        AppError::Mail(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        AppError::Mail(err.to_string())
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(err: lettre::address::AddressError) -> Self {
        AppError::Mail(format!("invalid address: {}", err))
    }
}

// =====================================
// Option Extensions
// =====================================
/// Extension trait برای Option
pub trait OptionExt<T> {
    /// تبدیل None به AppError::NotFound
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(message.into()))
    }
}
