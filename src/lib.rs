//! # Laum
//!
//! سرویس مدیریت محتوای چندزبانه: گروه‌ها، صفحه‌ها، برچسب‌ها و گزارش‌هایی که
//! کاربرها روی صفحه‌ها ثبت میکنن.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه
//! ├── main.rs         # نقطه ورود باینری
//! ├── config/         # مدیریت تنظیمات
//! ├── error/          # تعریف خطاها
//! ├── database/       # اتصال، migration و repository‌ها
//! ├── models/         # مدل‌های داده
//! ├── services/       # منطق کسب‌وکار و چرخه عمر گزارش
//! ├── normalizer/     # نرمال‌سازی متن فارسی
//! ├── jalali/         # تاریخ شمسی برای نمایش
//! ├── i18n/           # زبان‌ها و تغییر زبان مسیر
//! ├── notify/         # اطلاع‌رسانی به گزارش‌دهنده
//! ├── api/            # لایه HTTP
//! └── utils/          # توابع کمکی
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use laum::{config::Config, database::Database};
//!
//! #[tokio::main]
//! async fn main() -> laum::Result<()> {
//!     let config = Config::load()?;
//!     let db = Database::connect(&config.database_url).await?;
//!     db.migrate().await?;
//!     Ok(())
//! }
//! ```

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// ماژول ارتباط با دیتابیس
pub mod database;

/// ماژول مدل‌های داده (Domain Models)
pub mod models;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

pub mod normalizer;

pub mod jalali;

pub mod i18n;

/// ماژول اطلاع‌رسانی
pub mod notify;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

// =====================================
// Re-exports
// =====================================
/// نتیجه عملیات با خطای سفارشی ما
pub use error::Result;

/// خطای اصلی برنامه
pub use error::AppError;

// =====================================
// Prelude Module
// =====================================
/// ماژول prelude برای import راحت‌تر آیتم‌های پرکاربرد
///
/// ```rust
/// use laum::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::Database;
    pub use crate::error::{AppError, Result};
    pub use crate::i18n::{LanguageCode, Languages};
    pub use crate::models::*;
    pub use crate::normalizer::{Pass, PersianEditor};
    pub use crate::services::*;
}
