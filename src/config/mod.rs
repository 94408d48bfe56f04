//! # ماژول تنظیمات (Configuration)
//!
//! تنظیمات برنامه به ترتیب از این منابع خونده میشن (هر لایه لایه قبلی رو override میکنه):
//!
//! 1. مقادیر پیش‌فرض (`Config::default()`)
//! 2. فایل اختیاری `laum.toml`
//! 3. متغیرهای محیطی با پیشوند `LAUM_` (مثلا `LAUM_PORT=8080`،
//!    `LAUM_MAIL__SMTP_HOST=smtp.example.com`، `LAUM_LANGUAGES=fa,en`)
//!
//! ## مفاهیم Rust:
//! - **Serde**: سریالایز/دسریالایز تنظیمات
//! - **Default Trait**: مقادیر پیش‌فرض
//! - **Builder Pattern**: ساخت تدریجی آبجکت

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::i18n::Languages;

/// حداکثر طول ستون gid/pid
pub const MAX_PUBLIC_ID_LENGTH: usize = 16;

/// تنظیمات اصلی برنامه
///
/// # مثال
/// ```rust
/// use laum::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.port, 3000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// آدرس پایه برای لینک‌های عمومی صفحه‌ها
    pub base_url: String,

    /// آدرس اتصال به دیتابیس
    pub database_url: String,

    /// محیط اجرا (development, testing, production)
    pub environment: Environment,

    /// کد زبان‌های پشتیبانی شده
    pub languages: Vec<String>,

    /// زبان پیش‌فرض وقتی درخواست زبانی مشخص نکرده
    pub default_language: String,

    /// تنظیمات شناسه‌های عمومی
    pub ids: IdConfig,

    /// تنظیمات ایمیل
    pub mail: MailConfig,
}

/// تنظیمات تولید شناسه‌ها
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    /// پیشوند شناسه گروه (gid)
    pub gid_prefix: String,

    /// پیشوند شناسه صفحه (pid)
    pub pid_prefix: String,

    /// پیشوند شناسه مرجع گزارش (rid)
    pub rid_prefix: String,

    /// طول بخش تصادفی
    pub suffix_length: usize,

    /// حداکثر تلاش برای پیدا کردن شناسه آزاد
    pub max_attempts: u32,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            gid_prefix: "G".to_string(),
            pid_prefix: "P".to_string(),
            rid_prefix: "R".to_string(),
            suffix_length: 8,
            max_attempts: 10,
        }
    }
}

/// تنظیمات SMTP برای ارسال نتیجه گزارش‌ها
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    pub use_tls: bool,

    /// در حالت mock ایمیل فقط لاگ میشه
    pub mock: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@localhost".to_string(),
            from_name: "Laum Project".to_string(),
            use_tls: true,
            mock: true,
        }
    }
}

/// محیط اجرای برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Environment {
    /// محیط توسعه
    #[default]
    Development,

    /// محیط تست
    Testing,

    /// محیط تولید
    Production,
}

impl Environment {
    /// آیا در محیط توسعه هستیم؟
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// تبدیل String به Environment
///
/// مقدار ناشناخته به Development برمیگرده
impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            database_url: "sqlite://data/laum.db?mode=rwc".to_string(),
            environment: Environment::Development,
            languages: vec!["fa".to_string(), "en".to_string()],
            default_language: "fa".to_string(),
            ids: IdConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl Config {
    /// لود کردن تنظیمات از پیش‌فرض‌ها، فایل `laum.toml` و متغیرهای محیطی
    ///
    /// # Errors
    /// خطا برمیگردونه اگه یکی از منابع قابل خوندن نباشه یا نتیجه
    /// اعتبارسنجی نشه
    pub fn load() -> Result<Self> {
        Self::load_from("laum")
    }

    /// مثل [`Config::load`] ولی با نام فایل دلخواه (بدون پسوند)
    pub fn load_from(file: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Config::default())?)
            .add_source(::config::File::with_name(file).required(false))
            .add_source(
                ::config::Environment::with_prefix("LAUM")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("languages")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// اعتبارسنجی تنظیمات
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::Config("port cannot be 0".to_string()));
        }

        if self.languages.is_empty() {
            return Err(AppError::Config("at least one language is required".to_string()));
        }

        if !self.languages.contains(&self.default_language) {
            return Err(AppError::Config(format!(
                "default language '{}' is not in the supported languages",
                self.default_language
            )));
        }

        for (name, prefix) in [
            ("gid_prefix", &self.ids.gid_prefix),
            ("pid_prefix", &self.ids.pid_prefix),
            ("rid_prefix", &self.ids.rid_prefix),
        ] {
            if prefix.is_empty() || prefix.contains('_') {
                return Err(AppError::Config(format!(
                    "{} must be non-empty and must not contain '_'",
                    name
                )));
            }
        }

        if self.ids.suffix_length == 0 || self.ids.max_attempts == 0 {
            return Err(AppError::Config(
                "ids.suffix_length and ids.max_attempts must be positive".to_string(),
            ));
        }

        // prefix + "_" + suffix باید در ستون جا بشه
        let longest_prefix = self.ids.gid_prefix.len().max(self.ids.pid_prefix.len());
        if longest_prefix + 1 + self.ids.suffix_length > MAX_PUBLIC_ID_LENGTH {
            return Err(AppError::Config(format!(
                "public ids would exceed {} characters",
                MAX_PUBLIC_ID_LENGTH
            )));
        }

        if self.environment.is_production() && self.mail.mock {
            return Err(AppError::Config(
                "mail.mock must be disabled in production".to_string(),
            ));
        }

        Ok(())
    }

    /// زبان‌های پشتیبانی شده
    #[must_use]
    pub fn languages(&self) -> Languages {
        Languages::new(self.languages.clone(), self.default_language.clone())
    }

    /// آدرس کامل سرور
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern
///
/// # مثال
/// ```rust
/// use laum::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .port(8080)
///     .languages(["fa", "en"], "fa")
///     .build();
/// assert_eq!(config.port, 8080);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// ساخت builder جدید
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.config.environment = env;
        self
    }

    /// تنظیم زبان‌های پشتیبانی شده و زبان پیش‌فرض
    #[must_use]
    pub fn languages<I, S>(mut self, codes: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.languages = codes.into_iter().map(Into::into).collect();
        self.config.default_language = default.into();
        self
    }

    /// تنظیم پیشوندهای شناسه
    #[must_use]
    pub fn id_prefixes(
        mut self,
        gid: impl Into<String>,
        pid: impl Into<String>,
        rid: impl Into<String>,
    ) -> Self {
        self.config.ids.gid_prefix = gid.into();
        self.config.ids.pid_prefix = pid.into();
        self.config.ids.rid_prefix = rid.into();
        self
    }

    #[must_use]
    pub fn id_suffix_length(mut self, length: usize) -> Self {
        self.config.ids.suffix_length = length;
        self
    }

    #[must_use]
    pub fn id_max_attempts(mut self, attempts: u32) -> Self {
        self.config.ids.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn mail(mut self, mail: MailConfig) -> Self {
        self.config.mail = mail;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
        assert_eq!(config.ids.pid_prefix, "P");
    }

    #[test]
    fn test_environment_conversion() {
        assert_eq!(Environment::from("PROD".to_string()), Environment::Production);
        assert_eq!(Environment::from("test".to_string()), Environment::Testing);
        assert_eq!(Environment::from("unknown".to_string()), Environment::Development);
    }

    #[test]
    fn test_default_language_must_be_supported() {
        let config = ConfigBuilder::new().languages(["en"], "fa").build();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_prefix_rules() {
        let config = ConfigBuilder::new().id_prefixes("G_X", "P", "R").build();
        assert!(config.validate().is_err());

        let config = ConfigBuilder::new().id_prefixes("G", "", "R").build();
        assert!(config.validate().is_err());

        // P_ + 15 کاراکتر از 16 بیشتره
        let config = ConfigBuilder::new().id_suffix_length(15).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_real_mail() {
        let config = ConfigBuilder::new()
            .environment(Environment::Production)
            .build();
        assert!(config.validate().is_err());

        let mail = MailConfig {
            mock: false,
            ..MailConfig::default()
        };
        let config = ConfigBuilder::new()
            .environment(Environment::Production)
            .mail(mail)
            .build();
        assert!(config.validate().is_ok());
    }
}
