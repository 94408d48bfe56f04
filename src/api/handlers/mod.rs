//! # HTTP Handlers
//!
//! هر handler یک async function هست که extractor‌ها رو میگیره، سرویس
//! مربوط رو صدا میزنه و نتیجه رو داخل `ApiResponse` برمیگردونه.
//!
//! ## مفاهیم:
//! - Extractors: برای گرفتن داده از request
//! - State: برای دسترسی به سرویس‌ها
//! - IntoResponse: برای ساخت response

pub mod groups;
pub mod health;
pub mod i18n;
pub mod pages;
pub mod reports;
pub mod tags;
