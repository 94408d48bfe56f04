//! # زبان‌ها (Localization)
//!
//! زبان فعال هیچوقت از state سراسری خونده نمیشه؛ لایه HTTP اون رو از
//! درخواست استخراج میکنه و به صورت پارامتر به سرویس‌ها میده.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// کد زبان تایید شده (مثلا `fa`)
///
/// فقط از طریق [`Languages`] ساخته میشه، پس همیشه یکی از زبان‌های
/// پشتیبانی شده‌ست.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// فهرست زبان‌های پشتیبانی شده به همراه زبان پیش‌فرض
#[derive(Debug, Clone)]
pub struct Languages {
    codes: Vec<String>,
    default: String,
}

impl Languages {
    /// `default` باید عضو `codes` باشه؛ این رو `Config::validate` چک میکنه
    #[must_use]
    pub fn new(codes: Vec<String>, default: String) -> Self {
        Self { codes, default }
    }

    /// آیا این کد پشتیبانی میشه؟
    #[must_use]
    pub fn is_supported(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// زبان پیش‌فرض
    #[must_use]
    pub fn default_language(&self) -> LanguageCode {
        LanguageCode(self.default.clone())
    }

    /// تبدیل کد به LanguageCode
    ///
    /// # Errors
    /// `AppError::Language` اگه کد پشتیبانی نشه
    pub fn parse(&self, code: &str) -> Result<LanguageCode> {
        let code = code.trim().to_lowercase();
        if self.is_supported(&code) {
            Ok(LanguageCode(code))
        } else {
            Err(AppError::Language(format!(
                "{} is not a supported language code",
                code
            )))
        }
    }

    /// اولین کد پشتیبانی شده از بین کاندیداها، وگرنه پیش‌فرض
    ///
    /// کاندیداها میتونن تگ کامل باشن (`en-US`)؛ فقط بخش اول مقایسه میشه.
    #[must_use]
    pub fn resolve<'a, I>(&self, candidates: I) -> LanguageCode
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .filter_map(|tag| tag.split(['-', '_']).next())
            .map(|primary| primary.trim().to_lowercase())
            .find(|primary| self.is_supported(primary))
            .map(LanguageCode)
            .unwrap_or_else(|| self.default_language())
    }
}

/// عوض کردن زبان یک مسیر URL
///
/// اگه بخش اول مسیر یک کد زبان باشه جایگزین میشه، وگرنه `/<language>`
/// به اول مسیر اضافه میشه.
///
/// # Errors
/// `AppError::Language` اگه مسیر خالی باشه، با `/` شروع نشه یا زبان
/// پشتیبانی نشه.
///
/// # مثال
/// ```rust
/// use laum::i18n::{switch_language_path, Languages};
///
/// let languages = Languages::new(vec!["fa".into(), "en".into()], "fa".into());
/// assert_eq!(switch_language_path("/fa/pages/", "en", &languages).unwrap(), "/en/pages/");
/// assert_eq!(switch_language_path("/pages/", "en", &languages).unwrap(), "/en/pages/");
/// ```
pub fn switch_language_path(path: &str, language: &str, languages: &Languages) -> Result<String> {
    if path.is_empty() {
        return Err(AppError::Language(
            "URL path for language switch is empty".to_string(),
        ));
    }
    if !path.starts_with('/') {
        return Err(AppError::Language(
            "URL path for language switch does not start with \"/\"".to_string(),
        ));
    }
    if !languages.is_supported(language) {
        return Err(AppError::Language(format!(
            "{} is not a supported language code",
            language
        )));
    }

    let mut parts: Vec<String> = path.split('/').map(str::to_string).collect();
    // path با '/' شروع شده، پس حداقل دو بخش داریم
    if languages.is_supported(&parts[1]) {
        parts[1] = language.to_string();
    } else {
        parts[0] = format!("/{}", language);
    }

    Ok(parts.join("/"))
}
