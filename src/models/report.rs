//! # مدل گزارش
//!
//! ## چرخه عمر:
//! ```text
//! pending ──► accepted
//!    └─────► denied
//! ```
//! وضعیت فقط یک بار از `pending` خارج میشه.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Dates;

// =====================================
// Status
// =====================================
/// وضعیت گزارش
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Accepted,
    Denied,
}

impl ReportStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Denied => "denied",
        }
    }

    /// وضعیت نهایی؟ (بعد از این تغییری مجاز نیست)
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =====================================
// Entity
// =====================================
/// Entity گزارش (ردیف جدول `reports`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: i64,

    /// شناسه پیگیری؛ داخل همون تراکنش ساخت پر میشه
    pub rid: Option<String>,

    pub page_pid: String,
    pub language: String,
    pub body: String,
    pub reporter: String,
    pub description: String,
    pub status: ReportStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// گزارش به همراه عنوان صفحه‌ش
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub report: Report,

    pub page_title: String,
}

// =====================================
// Request DTOs
// =====================================
/// ارسال گزارش برای یک صفحه
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitReportRequest {
    #[validate(length(min = 1, max = 1024, message = "Body must be 1-1024 characters"))]
    pub body: String,

    #[validate(email(message = "Invalid email format"))]
    pub reporter: String,
}

/// تصمیم مدیر درباره گزارش
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DecideReport {
    pub status: ReportStatus,

    #[validate(length(max = 1024))]
    #[serde(default)]
    pub description: Option<String>,
}

/// گزارش آماده ذخیره (متن نرمال‌شده، زبان از context)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub page_pid: String,
    pub language: String,
    pub body: String,
    pub reporter: String,
}

// =====================================
// Response DTOs
// =====================================
/// پاسخ گزارش
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub rid: String,
    pub page: String,
    pub page_title: String,
    pub language: String,
    pub body: String,
    pub reporter: String,
    pub description: String,
    pub status: ReportStatus,

    #[serde(flatten)]
    pub dates: Dates,
}

impl From<ReportDetail> for ReportResponse {
    fn from(detail: ReportDetail) -> Self {
        let report = detail.report;
        Self {
            dates: Dates::new(report.created_at, report.updated_at),
            rid: report.rid.unwrap_or_default(),
            page: report.page_pid,
            page_title: detail.page_title,
            language: report.language,
            body: report.body,
            reporter: report.reporter,
            description: report.description,
            status: report.status,
        }
    }
}

/// نتیجه تصمیم: گزارش بعد از تغییر و اینکه اعلان رفت یا نه
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub report: ReportResponse,
    pub notified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&ReportStatus::Accepted).unwrap(), "\"accepted\"");
        let parsed: ReportStatus = serde_json::from_str("\"denied\"").unwrap();
        assert_eq!(parsed, ReportStatus::Denied);
        assert!(serde_json::from_str::<ReportStatus>("\"closed\"").is_err());
    }

    #[test]
    fn test_status_terminal() {
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(ReportStatus::Accepted.is_terminal());
        assert!(ReportStatus::Denied.is_terminal());
        assert_eq!(ReportStatus::default(), ReportStatus::Pending);
    }

    #[test]
    fn test_submit_validation() {
        let ok = SubmitReportRequest {
            body: "متن اشتباهه".to_string(),
            reporter: "someone@example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = SubmitReportRequest {
            body: String::new(),
            reporter: "nope".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("body"));
        assert!(errors.field_errors().contains_key("reporter"));
    }
}
