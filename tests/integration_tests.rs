//! # تست‌های Integration
//!
//! سناریوهای end-to-end روی سرویس‌ها با دیتابیس SQLite داخل حافظه.
//!
//! ## اجرای تست‌ها:
//! ```bash
//! cargo test --test integration_tests
//! cargo test --test integration_tests report_
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use laum::{
    config::{Config, ConfigBuilder},
    database::Database,
    i18n::LanguageCode,
    models::{DecideReport, ListQuery, PageRequest, ReportStatus, SubmitReportRequest, TagRequest},
    notify::{Notification, Notifier},
    services::AppState,
    AppError, Result,
};

// =====================================
// Helpers
// =====================================
/// Notifier که پیام‌ها رو نگه میداره
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        if self.fail {
            return Err(AppError::Mail("smtp unreachable".to_string()));
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

fn test_config() -> Config {
    ConfigBuilder::new()
        .languages(["fa", "en"], "fa")
        .id_prefixes("G", "P", "R")
        .build()
}

async fn setup_with(config: Config, notifier: Arc<RecordingNotifier>) -> AppState {
    let db = Database::in_memory().await.unwrap();
    AppState::new(db, config, notifier)
}

async fn setup() -> (AppState, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (setup_with(test_config(), notifier.clone()).await, notifier)
}

fn lang(state: &AppState, code: &str) -> LanguageCode {
    state.languages.parse(code).unwrap()
}

fn page_request(group: Option<&str>, title: &str) -> PageRequest {
    PageRequest {
        group: group.map(str::to_string),
        title: title.to_string(),
        subtitle: None,
        content: "متن صفحه".to_string(),
        event: None,
        image: None,
        image_caption: None,
        reference: None,
        website: None,
        author: None,
        is_active: None,
        tags: Vec::new(),
    }
}

fn report_request(body: &str) -> SubmitReportRequest {
    SubmitReportRequest {
        body: body.to_string(),
        reporter: "reader@example.com".to_string(),
    }
}

fn decision(status: ReportStatus, description: Option<&str>) -> DecideReport {
    DecideReport {
        status,
        description: description.map(str::to_string),
    }
}

// =====================================
// شناسه‌ها
// =====================================
mod id_tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_public_ids_carry_configured_prefixes() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");

        let group = state.group_service.create().await.unwrap();
        assert!(group.gid.starts_with("G_"));

        let page = state
            .page_service
            .create(page_request(Some(&group.gid), "عنوان"), &fa)
            .await
            .unwrap();
        assert!(page.pid.starts_with("P_"));

        let suffix = page.pid.trim_start_matches("P_");
        let report = state
            .report_service
            .submit(&page.pid, report_request("اشکال"), &fa)
            .await
            .unwrap();
        assert!(report.rid.starts_with(&format!("R_{}_", suffix)));
    }

    #[tokio::test]
    async fn test_group_ids_are_unique() {
        let (state, _) = setup().await;

        let mut seen = HashSet::new();
        for _ in 0..50 {
            let group = state.group_service.create().await.unwrap();
            assert!(seen.insert(group.gid));
        }
    }

    #[tokio::test]
    async fn test_exhausted_id_space_is_reported() {
        // الفبای پیش‌فرض ۳۶ حرفیه؛ با طول ۱ فقط ۳۶ شناسه ممکنه
        let config = ConfigBuilder::new()
            .languages(["fa", "en"], "fa")
            .id_suffix_length(1)
            .id_max_attempts(2)
            .build();
        let state = setup_with(config, Arc::new(RecordingNotifier::default())).await;

        let mut last_err = None;
        for _ in 0..500 {
            if let Err(err) = state.group_service.create().await {
                last_err = Some(err);
                break;
            }
        }

        match last_err {
            Some(AppError::IdSpaceExhausted { kind, attempts }) => {
                assert_eq!(kind, "group");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected IdSpaceExhausted, got {:?}", other),
        }
    }
}

// =====================================
// گروه و صفحه
// =====================================
mod page_tests {
    use super::*;

    #[tokio::test]
    async fn test_one_page_per_language_in_group() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");
        let en = lang(&state, "en");

        let group = state.group_service.create().await.unwrap();
        state
            .page_service
            .create(page_request(Some(&group.gid), "فارسی"), &fa)
            .await
            .unwrap();
        state
            .page_service
            .create(page_request(Some(&group.gid), "English"), &en)
            .await
            .unwrap();

        let err = state
            .page_service
            .create(page_request(Some(&group.gid), "دوباره"), &fa)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let group = state.group_service.get(&group.gid).await.unwrap();
        assert_eq!(group.page_count, 2);
    }

    #[tokio::test]
    async fn test_pages_without_group_are_unconstrained() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");

        for title in ["اول", "دوم"] {
            state.page_service.create(page_request(None, title), &fa).await.unwrap();
        }

        let pages = state.page_service.list(&fa, &ListQuery::default()).await.unwrap();
        assert_eq!(pages.pagination.total_items, 2);
    }

    #[tokio::test]
    async fn test_unknown_group_is_rejected() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");

        let err = state
            .page_service
            .create(page_request(Some("G_MISSING1"), "عنوان"), &fa)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_page_text_is_normalized() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");

        let page = state
            .page_service
            .create(page_request(None, "  كتاب   سال 1402 "), &fa)
            .await
            .unwrap();
        assert_eq!(page.title, "کتاب سال ۱۴۰۲");
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_language_and_searchable() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");
        let en = lang(&state, "en");

        let tag = state
            .tag_service
            .create(
                TagRequest {
                    name: "history".to_string(),
                    keyword: None,
                    is_active: None,
                },
                &en,
            )
            .await
            .unwrap();

        let mut tagged = page_request(None, "Old bridge");
        tagged.tags = vec![tag.id];
        state.page_service.create(tagged, &en).await.unwrap();
        state.page_service.create(page_request(None, "New road"), &en).await.unwrap();
        state.page_service.create(page_request(None, "پل"), &fa).await.unwrap();

        let query = ListQuery {
            q: Some("history".to_string()),
            ..ListQuery::default()
        };
        let found = state.page_service.list(&en, &query).await.unwrap();
        assert_eq!(found.data.len(), 1);
        assert_eq!(found.data[0].title, "Old bridge");
        assert_eq!(found.data[0].tags.len(), 1);

        let fa_pages = state.page_service.list(&fa, &ListQuery::default()).await.unwrap();
        assert_eq!(fa_pages.data.len(), 1);
    }

    #[tokio::test]
    async fn test_group_delete_cascades_to_pages_and_reports() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");

        let group = state.group_service.create().await.unwrap();
        let page = state
            .page_service
            .create(page_request(Some(&group.gid), "عنوان"), &fa)
            .await
            .unwrap();
        let report = state
            .report_service
            .submit(&page.pid, report_request("اشکال"), &fa)
            .await
            .unwrap();

        state.group_service.delete(&group.gid).await.unwrap();

        assert!(matches!(state.page_service.get(&page.pid).await, Err(AppError::NotFound(_))));
        assert!(matches!(state.report_service.get(&report.rid).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            state.group_service.delete(&group.gid).await,
            Err(AppError::NotFound(_))
        ));
    }
}

// =====================================
// چرخه عمر گزارش
// =====================================
mod report_tests {
    use super::*;

    async fn submitted(state: &AppState) -> String {
        let fa = lang(state, "fa");
        let page = state
            .page_service
            .create(page_request(None, "تاریخچه شهر"), &fa)
            .await
            .unwrap();
        state
            .report_service
            .submit(&page.pid, report_request("تاریخ   اشتباهه"), &fa)
            .await
            .unwrap()
            .rid
    }

    #[tokio::test]
    async fn test_report_lifecycle_notifies_once() {
        let (state, notifier) = setup().await;
        let rid = submitted(&state).await;

        let report = state.report_service.get(&rid).await.unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.body, "تاریخ اشتباهه");
        assert_eq!(report.page_title, "تاریخچه شهر");

        // یادداشت روی گزارش در انتظار: بدون اعلان
        let noted = state
            .report_service
            .decide(&rid, decision(ReportStatus::Pending, Some("در حال بررسی")))
            .await
            .unwrap();
        assert!(!noted.notified);
        assert_eq!(noted.report.description, "در حال بررسی");
        assert!(notifier.sent().is_empty());

        let accepted = state
            .report_service
            .decide(&rid, decision(ReportStatus::Accepted, None))
            .await
            .unwrap();
        assert!(accepted.notified);
        assert_eq!(accepted.report.status, ReportStatus::Accepted);
        assert_eq!(accepted.report.description, "-");
        assert_eq!(accepted.report.rid, rid);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "reader@example.com");
        assert!(sent[0].subject.contains(&rid));
        assert!(sent[0].body.contains("تاریخچه شهر"));

        let err = state
            .report_service
            .decide(&rid, decision(ReportStatus::Denied, Some("نه")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_decision() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let state = setup_with(test_config(), notifier).await;
        let rid = submitted(&state).await;

        let outcome = state
            .report_service
            .decide(&rid, decision(ReportStatus::Denied, Some("منبع معتبر نیست")))
            .await
            .unwrap();
        assert!(!outcome.notified);

        let stored = state.report_service.get(&rid).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Denied);
        assert_eq!(stored.description, "منبع معتبر نیست");
    }

    #[tokio::test]
    async fn test_concurrent_decisions_have_one_winner() {
        let (state, notifier) = setup().await;
        let rid = submitted(&state).await;

        let (a, b) = tokio::join!(
            state.report_service.decide(&rid, decision(ReportStatus::Accepted, None)),
            state.report_service.decide(&rid, decision(ReportStatus::Denied, None)),
        );

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert!(matches!(a.err().or(b.err()), Some(AppError::Conflict(_))));
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_report_is_gone() {
        let (state, _) = setup().await;
        let rid = submitted(&state).await;

        state.report_service.delete(&rid).await.unwrap();
        assert!(matches!(state.report_service.get(&rid).await, Err(AppError::NotFound(_))));
        assert!(matches!(state.report_service.delete(&rid).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_report_for_missing_page() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");

        let err = state
            .report_service
            .submit("P_NOPE0000", report_request("اشکال"), &fa)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reports_filter_by_status() {
        let (state, _) = setup().await;
        let fa = lang(&state, "fa");
        let first = submitted(&state).await;
        submitted(&state).await;

        state
            .report_service
            .decide(&first, decision(ReportStatus::Accepted, None))
            .await
            .unwrap();

        let query = ListQuery {
            status: Some(ReportStatus::Pending),
            ..ListQuery::default()
        };
        let pending = state.report_service.list(&fa, &query).await.unwrap();
        assert_eq!(pending.data.len(), 1);
        assert_ne!(pending.data[0].rid, first);

        let en = lang(&state, "en");
        let none = state.report_service.list(&en, &ListQuery::default()).await.unwrap();
        assert!(none.data.is_empty());
    }
}
