//! # ماژول توابع کمکی (Utilities)
//!
//! ## مفاهیم Rust:
//! - **const**: ثابت‌های compile-time
//! - **Iterator**: ساخت String از iterator

use rand::Rng;

// =====================================
// Constants
// =====================================
/// کاراکترهای مجاز برای بخش تصادفی شناسه‌ها
pub const SUFFIX_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// جداکننده پیشوند از بقیه شناسه
pub const ID_SEPARATOR: char = '_';

/// حداکثر طول keyword برچسب
pub const MAX_SLUG_LENGTH: usize = 50;

// =====================================
// Random suffix
// =====================================
/// تولید رشته تصادفی با طول و الفبای مشخص
///
/// # مثال
/// ```rust
/// use laum::utils::{random_suffix, SUFFIX_CHARS};
///
/// let suffix = random_suffix(8, SUFFIX_CHARS);
/// assert_eq!(suffix.len(), 8);
/// ```
#[must_use]
pub fn random_suffix(length: usize, alphabet: &[u8]) -> String {
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..alphabet.len());
            alphabet[idx] as char
        })
        .collect()
}

// =====================================
// Identifiers
// =====================================
/// عوض کردن پیشوند شناسه (بخش قبل از اولین `_`)
///
/// اگه شناسه `_` نداشته باشه، کل شناسه پیشوند حساب میشه.
///
/// # مثال
/// ```rust
/// use laum::utils::swap_prefix;
///
/// assert_eq!(swap_prefix("P_K3Z9Q2LM_42", "R"), "R_K3Z9Q2LM_42");
/// ```
#[must_use]
pub fn swap_prefix(id: &str, prefix: &str) -> String {
    match id.split_once(ID_SEPARATOR) {
        Some((_, rest)) => format!("{}{}{}", prefix, ID_SEPARATOR, rest),
        None => prefix.to_string(),
    }
}

// =====================================
// String Utilities
// =====================================
/// ساخت slug یونیکدی از متن (حروف فارسی حفظ میشن)
///
/// # مثال
/// ```rust
/// use laum::utils::slugify;
///
/// assert_eq!(slugify("  Rust  Lang! "), "rust-lang");
/// assert_eq!(slugify("تاریخ معاصر"), "تاریخ-معاصر");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '\u{200C}' {
            pending_dash = true;
        }
    }

    slug.chars().take(MAX_SLUG_LENGTH).collect::<String>().trim_end_matches('-').to_string()
}

/// آیا رشته یک slug معتبره؟
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.chars().count() <= MAX_SLUG_LENGTH
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Mask کردن ایمیل برای لاگ‌ها
///
/// # مثال
/// ```rust
/// use laum::utils::mask_email;
///
/// assert_eq!(mask_email("reporter@example.com"), "re***@example.com");
/// ```
#[must_use]
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{}@{}", mask_string(local, 2), domain),
        None => mask_string(email, 2),
    }
}

/// Mask کردن بخشی از متن
#[must_use]
pub fn mask_string(text: &str, visible_chars: usize) -> String {
    if text.chars().count() <= visible_chars {
        return "*".repeat(text.chars().count());
    }

    let visible: String = text.chars().take(visible_chars).collect();
    format!("{}***", visible)
}
