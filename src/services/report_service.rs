//! # سرویس گزارش‌ها
//!
//! ## چرخه عمر گزارش
//! ```text
//!            decide(accepted) ┌──────────┐
//!         ┌──────────────────►│ accepted │
//! ┌───────┴─┐                 └──────────┘
//! │ pending │ decide(denied)  ┌──────────┐
//! └───────┬─┴────────────────►│  denied  │
//!         │                   └──────────┘
//!         └── decide(pending): فقط یادداشت ذخیره میشه
//! ```
//!
//! - ثبت تصمیم با `UPDATE ... WHERE status = 'pending'` انجام میشه؛ از دو
//!   تصمیم همزمان فقط یکی ثبت میشه.
//! - فقط بعد از ثبت موفق دقیقا یک اعلان فرستاده میشه.
//! - شکست اعلان تصمیم رو برنمیگردونه؛ لاگ میشه و `notified = false` برمیگرده.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::{
    database::{PageRepository, ReportRepository, Repository},
    error::{AppError, Result},
    i18n::LanguageCode,
    models::{
        DecideReport, DecisionOutcome, ListQuery, NewReport, PaginatedResult, ReportDetail,
        ReportResponse, ReportStatus, SubmitReportRequest,
    },
    normalizer::PersianEditor,
    notify::{Notification, Notifier},
    utils::{mask_email, swap_prefix, ID_SEPARATOR},
};

use super::Service;

/// توضیحی که وقتی مدیر چیزی ننوشته ذخیره میشه
pub const DECISION_PLACEHOLDER: &str = "-";

/// ساخت rid از pid صفحه و شناسه ترتیبی گزارش
///
/// # مثال
/// ```rust
/// use laum::services::derive_reference_id;
///
/// assert_eq!(derive_reference_id("P_K3Z9Q2LM", 42, "R"), "R_K3Z9Q2LM_42");
/// ```
#[must_use]
pub fn derive_reference_id(page_pid: &str, report_id: i64, rid_prefix: &str) -> String {
    swap_prefix(
        &format!("{}{}{}", page_pid, ID_SEPARATOR, report_id),
        rid_prefix,
    )
}

/// سرویس گزارش‌ها
#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
    pages: PageRepository,
    notifier: Arc<dyn Notifier>,
    rid_prefix: String,
    description_editor: PersianEditor,
    body_editor: PersianEditor,
}

impl Service for ReportService {}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService")
            .field("rid_prefix", &self.rid_prefix)
            .finish_non_exhaustive()
    }
}

impl ReportService {
    #[must_use]
    pub fn new(
        reports: ReportRepository,
        pages: PageRepository,
        notifier: Arc<dyn Notifier>,
        rid_prefix: impl Into<String>,
    ) -> Self {
        Self {
            reports,
            pages,
            notifier,
            rid_prefix: rid_prefix.into(),
            description_editor: PersianEditor::default(),
            body_editor: PersianEditor::multiline_space_only(),
        }
    }

    /// ثبت گزارش کاربر برای یک صفحه
    ///
    /// rid داخل همون تراکنش درج ساخته میشه.
    #[instrument(skip(self, request), fields(language = %language))]
    pub async fn submit(
        &self,
        pid: &str,
        request: SubmitReportRequest,
        language: &LanguageCode,
    ) -> Result<ReportResponse> {
        request.validate()?;

        if self.pages.find_by_id(pid).await?.is_none() {
            return Err(AppError::page_not_found(pid));
        }

        let body = self.body_editor.run(&request.body);
        if body.is_empty() {
            return Err(AppError::Validation("Report body must not be blank".to_string()));
        }

        let new_report = NewReport {
            page_pid: pid.to_string(),
            language: language.to_string(),
            body,
            reporter: request.reporter.trim().to_string(),
        };

        let prefix = self.rid_prefix.as_str();
        let detail = self
            .reports
            .create(&new_report, |id| derive_reference_id(pid, id, prefix))
            .await
            .map_err(|err| {
                if err.is_foreign_key_violation() {
                    AppError::page_not_found(pid)
                } else {
                    err
                }
            })?;

        info!(
            rid = detail.report.rid.as_deref().unwrap_or_default(),
            reporter = %mask_email(&detail.report.reporter),
            "Report submitted"
        );
        Ok(detail.into())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, rid: &str) -> Result<ReportResponse> {
        Ok(self.find(rid).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, rid: &str) -> Result<()> {
        if !self.reports.delete(rid).await? {
            return Err(AppError::report_not_found(rid));
        }

        info!(rid = %rid, "Deleted report");
        Ok(())
    }

    /// لیست گزارش‌های زبان فعال با فیلتر وضعیت و جستجو
    #[instrument(skip(self, query), fields(language = %language))]
    pub async fn list(
        &self,
        language: &LanguageCode,
        query: &ListQuery,
    ) -> Result<PaginatedResult<ReportResponse>> {
        let pagination = query.pagination();
        let search = query.search_pattern();

        let (reports, total) = self
            .reports
            .list(language.as_str(), query.status, search.as_deref(), &pagination)
            .await?;

        Ok(PaginatedResult::new(reports, &pagination, total).map(ReportResponse::from))
    }

    /// تصمیم مدیر درباره گزارش
    ///
    /// # Errors
    /// - `NotFound`: گزارش وجود نداره
    /// - `Conflict`: گزارش قبلا تصمیم گرفته شده (یا همزمان تصمیم گرفته شد)
    #[instrument(skip(self, decision), fields(status = %decision.status))]
    pub async fn decide(&self, rid: &str, decision: DecideReport) -> Result<DecisionOutcome> {
        decision.validate()?;

        let current = self.find(rid).await?;
        if current.report.status.is_terminal() {
            warn!(rid = %rid, current = %current.report.status, "Rejected change of a decided report");
            return Err(already_decided(rid, current.report.status));
        }

        let id = current.report.id;
        let description = decision.description.unwrap_or_default();

        if decision.status == ReportStatus::Pending {
            let note = self.description_editor.run(&description);
            if !self.reports.save_note(id, &note).await? {
                return Err(self.lost_race(rid).await);
            }

            return Ok(DecisionOutcome {
                report: self.find(rid).await?.into(),
                notified: false,
            });
        }

        let description = self.description_editor.run(&description);
        let description = if description.is_empty() {
            DECISION_PLACEHOLDER.to_string()
        } else {
            description
        };

        if !self.reports.decide(id, decision.status, &description).await? {
            return Err(self.lost_race(rid).await);
        }

        let decided = self.find(rid).await?;
        info!(rid = %rid, status = %decided.report.status, "Report decided");

        let notified = match self.notifier.send(Notification::report_result(&decided)).await {
            Ok(()) => true,
            Err(err) => {
                error!(rid = %rid, error = %err, "Failed to notify reporter, decision kept");
                false
            }
        };

        Ok(DecisionOutcome {
            report: decided.into(),
            notified,
        })
    }

    async fn find(&self, rid: &str) -> Result<ReportDetail> {
        self.reports
            .find_by_id(rid)
            .await?
            .ok_or_else(|| AppError::report_not_found(rid))
    }

    /// بین خوندن و نوشتن، تصمیم دیگه‌ای ثبت شده
    async fn lost_race(&self, rid: &str) -> AppError {
        match self.find(rid).await {
            Ok(detail) => {
                warn!(rid = %rid, current = %detail.report.status, "Concurrent decision won");
                already_decided(rid, detail.report.status)
            }
            Err(err) => err,
        }
    }
}

fn already_decided(rid: &str, status: ReportStatus) -> AppError {
    AppError::Conflict(format!("Report '{}' is already {}", rid, status))
}
