//! # ماژول اطلاع‌رسانی (Notifications)
//!
//! بعد از اولین تصمیم روی یک گزارش، نتیجه برای گزارش‌دهنده فرستاده میشه.
//!
//! ## پیاده‌سازی‌ها:
//! - [`SmtpNotifier`]: ارسال ایمیل واقعی با lettre
//! - [`LogNotifier`]: حالت mock؛ پیام فقط لاگ میشه

mod smtp;

pub use smtp::SmtpNotifier;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    config::MailConfig,
    error::Result,
    models::{ReportDetail, ReportStatus},
    utils::mask_email,
};

// =====================================
// Notification
// =====================================
/// یک پیام متنی برای یک گیرنده
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// پیام نتیجه بررسی گزارش
    #[must_use]
    pub fn report_result(detail: &ReportDetail) -> Self {
        let report = &detail.report;
        let rid = report.rid.as_deref().unwrap_or_default();

        let body = format!(
            "سلام،\n\n\
             گزارش شما با شناسه {} برای صفحه «{}» بررسی شد.\n\
             نتیجه: {}\n\
             توضیحات: {}\n\n\
             با سپاس از همراهی شما",
            rid,
            detail.page_title,
            status_label(report.status),
            report.description,
        );

        Self {
            to: report.reporter.clone(),
            subject: format!("نتیجه بررسی گزارش {}", rid),
            body,
        }
    }
}

fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "در انتظار بررسی",
        ReportStatus::Accepted => "پذیرفته شد",
        ReportStatus::Denied => "رد شد",
    }
}

// =====================================
// Notifier Trait
// =====================================
/// کانال ارسال پیام
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// ارسال یک پیام
    ///
    /// # Errors
    /// `AppError::Mail` اگه آدرس نامعتبر باشه یا ارسال شکست بخوره
    async fn send(&self, notification: Notification) -> Result<()>;
}

/// Notifier حالت mock: فقط لاگ میکنه
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        info!(
            to = %mask_email(&notification.to),
            subject = %notification.subject,
            "[MOCK] notification not sent over SMTP"
        );
        Ok(())
    }
}

/// انتخاب notifier بر اساس تنظیمات ایمیل
///
/// # Errors
/// اگه آدرس فرستنده یا میزبان SMTP نامعتبر باشه
pub fn notifier_from_config(mail: &MailConfig) -> Result<Arc<dyn Notifier>> {
    if mail.mock {
        info!("Mail mock mode is on, notifications are only logged");
        return Ok(Arc::new(LogNotifier));
    }

    Ok(Arc::new(SmtpNotifier::new(mail)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Report;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn detail(status: ReportStatus, description: &str) -> ReportDetail {
        let now = Utc::now();
        ReportDetail {
            report: Report {
                id: 42,
                rid: Some("R_K3Z9Q2LM_42".to_string()),
                page_pid: "P_K3Z9Q2LM".to_string(),
                language: "fa".to_string(),
                body: "متن".to_string(),
                reporter: "reader@example.com".to_string(),
                description: description.to_string(),
                status,
                created_at: now,
                updated_at: now,
            },
            page_title: "تهران قدیم".to_string(),
        }
    }

    #[test]
    fn test_report_result_message() {
        let n = Notification::report_result(&detail(ReportStatus::Accepted, "-"));
        assert_eq!(n.to, "reader@example.com");
        assert_eq!(n.subject, "نتیجه بررسی گزارش R_K3Z9Q2LM_42");
        assert!(n.body.contains("R_K3Z9Q2LM_42"));
        assert!(n.body.contains("«تهران قدیم»"));
        assert!(n.body.contains("نتیجه: پذیرفته شد"));
        assert!(n.body.contains("توضیحات: -"));
    }

    #[test]
    fn test_mock_config_selects_log_notifier() {
        let mail = MailConfig::default();
        assert!(mail.mock);
        assert!(notifier_from_config(&mail).is_ok());
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let n = Notification::report_result(&detail(ReportStatus::Denied, "تکراری"));
        LogNotifier.send(n).await.unwrap();
    }
}
