//! # تولید شناسه عمومی
//!
//! شناسه‌ها به شکل `<prefix>_<suffix>` هستن. به جای "چک کن بعد درج کن"،
//! کاندیدا مستقیم درج میشه و محدودیت unique دیتابیس تصمیم میگیره؛
//! پس دو درخواست همزمان هیچوقت یک شناسه نمیگیرن.

use std::future::Future;

use tracing::{debug, error};

use crate::{
    config::IdConfig,
    error::{AppError, Result},
    utils::{random_suffix, ID_SEPARATOR, SUFFIX_CHARS},
};

/// نوع موجودیتی که شناسه میگیره
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Group,
    Page,
}

impl IdKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Page => "page",
        }
    }

    /// ستونی که یکتایی شناسه رو تضمین میکنه
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Group => "page_groups.gid",
            Self::Page => "pages.pid",
        }
    }
}

/// تولیدکننده شناسه برای یک نوع موجودیت
#[derive(Debug, Clone)]
pub struct PublicIdGenerator {
    kind: IdKind,
    prefix: String,
    length: usize,
    max_attempts: u32,
    alphabet: &'static [u8],
}

impl PublicIdGenerator {
    #[must_use]
    pub fn new(kind: IdKind, prefix: impl Into<String>, length: usize, max_attempts: u32) -> Self {
        Self {
            kind,
            prefix: prefix.into(),
            length,
            max_attempts,
            alphabet: SUFFIX_CHARS,
        }
    }

    /// ساخت از روی تنظیمات
    #[must_use]
    pub fn from_config(kind: IdKind, ids: &IdConfig) -> Self {
        let prefix = match kind {
            IdKind::Group => &ids.gid_prefix,
            IdKind::Page => &ids.pid_prefix,
        };
        Self::new(kind, prefix.clone(), ids.suffix_length, ids.max_attempts)
    }

    /// عوض کردن الفبای بخش تصادفی
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: &'static [u8]) -> Self {
        self.alphabet = alphabet;
        self
    }

    #[must_use]
    pub fn kind(&self) -> IdKind {
        self.kind
    }

    /// یک کاندیدای جدید
    #[must_use]
    pub fn candidate(&self) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            ID_SEPARATOR,
            random_suffix(self.length, self.alphabet)
        )
    }

    /// درج با شناسه یکتا
    ///
    /// `insert` با هر کاندیدا صدا زده میشه. اگه خطای unique روی ستون شناسه
    /// برگردونه کاندیدای بعدی امتحان میشه؛ هر خطای دیگه‌ای مستقیم برمیگرده.
    ///
    /// # Errors
    /// - `AppError::IdSpaceExhausted` بعد از `max_attempts` برخورد
    /// - هر خطای دیگه‌ای که `insert` برگردونه
    pub async fn insert_unique<T, F, Fut>(&self, mut insert: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let column = self.kind.column();

        for attempt in 1..=self.max_attempts {
            let candidate = self.candidate();

            match insert(candidate.clone()).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_unique_violation_on(column) => {
                    debug!(kind = self.kind.as_str(), %candidate, attempt, "Identifier collision, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        error!(
            kind = self.kind.as_str(),
            attempts = self.max_attempts,
            "Could not find a free identifier"
        );

        Err(AppError::IdSpaceExhausted {
            kind: self.kind.as_str(),
            attempts: self.max_attempts,
        })
    }
}
