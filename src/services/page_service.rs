//! # سرویس صفحه‌ها
//!
//! ## مسئولیت‌ها:
//! - نرمال‌سازی فیلدهای متنی قبل از هر ذخیره
//! - تولید pid یکتا
//! - تبدیل خطاهای محدودیت دیتابیس به خطای قابل فهم

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use crate::{
    config::Config,
    database::{GroupRepository, PageRepository, Repository, TagRepository},
    error::{AppError, OptionExt, Result},
    i18n::LanguageCode,
    models::{
        ListQuery, Page, PageDraft, PageRequest, PageResponse, PaginatedResult, TagResponse,
    },
    normalizer::PersianEditor,
};

use super::{PublicIdGenerator, Service};

/// سرویس مدیریت صفحه‌ها
#[derive(Debug, Clone)]
pub struct PageService {
    pages: PageRepository,
    groups: GroupRepository,
    tags: TagRepository,
    ids: PublicIdGenerator,
    config: Arc<Config>,
    editor: PersianEditor,
}

impl Service for PageService {}

impl PageService {
    #[must_use]
    pub fn new(
        pages: PageRepository,
        groups: GroupRepository,
        tags: TagRepository,
        ids: PublicIdGenerator,
        config: Arc<Config>,
    ) -> Self {
        Self {
            pages,
            groups,
            tags,
            ids,
            config,
            editor: PersianEditor::default(),
        }
    }

    /// ساخت صفحه در زبان فعال
    ///
    /// # Errors
    /// - `Validation`: فیلدهای نامعتبر
    /// - `BadRequest`: گروه یا برچسب ناموجود
    /// - `Conflict`: گروه برای این زبان صفحه داره
    /// - `IdSpaceExhausted`: pid آزاد پیدا نشد
    #[instrument(skip(self, request), fields(language = %language))]
    pub async fn create(&self, request: PageRequest, language: &LanguageCode) -> Result<PageResponse> {
        let draft = self.prepare(request, language.to_string()).await?;

        let page = self
            .ids
            .insert_unique(|pid| {
                let pages = self.pages.clone();
                let draft = &draft;
                async move { pages.create(&pid, draft).await }
            })
            .await
            .map_err(|err| constraint_error(err, &draft))?;

        info!(pid = %page.pid, group = ?page.group_gid, "Created page");
        self.respond(page).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, pid: &str) -> Result<PageResponse> {
        let page = self
            .pages
            .find_by_id(pid)
            .await?
            .ok_or_not_found(format!("Page '{}' not found", pid))?;

        self.respond(page).await
    }

    /// جایگزینی محتوای صفحه؛ زبان و pid ثابت میمونن
    #[instrument(skip(self, request))]
    pub async fn update(&self, pid: &str, request: PageRequest) -> Result<PageResponse> {
        let existing = self
            .pages
            .find_by_id(pid)
            .await?
            .ok_or_else(|| AppError::page_not_found(pid))?;

        let draft = self.prepare(request, existing.language).await?;

        let page = self
            .pages
            .update(pid, &draft)
            .await
            .map_err(|err| constraint_error(err, &draft))?
            .ok_or_else(|| AppError::page_not_found(pid))?;

        info!(pid = %pid, "Updated page");
        self.respond(page).await
    }

    /// حذف صفحه به همراه گزارش‌هاش
    #[instrument(skip(self))]
    pub async fn delete(&self, pid: &str) -> Result<()> {
        if !self.pages.delete(pid).await? {
            return Err(AppError::page_not_found(pid));
        }

        info!(pid = %pid, "Deleted page");
        Ok(())
    }

    /// لیست صفحه‌های زبان فعال
    #[instrument(skip(self, query), fields(language = %language))]
    pub async fn list(
        &self,
        language: &LanguageCode,
        query: &ListQuery,
    ) -> Result<PaginatedResult<PageResponse>> {
        let pagination = query.pagination();
        let search = query.search_pattern();

        let (pages, total) = self
            .pages
            .list(language.as_str(), query.is_active, search.as_deref(), &pagination)
            .await?;

        let mut data = Vec::with_capacity(pages.len());
        for page in pages {
            data.push(self.respond(page).await?);
        }

        Ok(PaginatedResult::new(data, &pagination, total))
    }

    /// اعتبارسنجی و نرمال‌سازی ورودی
    async fn prepare(&self, request: PageRequest, language: String) -> Result<PageDraft> {
        request.validate()?;

        let title = self.editor.run(&request.title);
        let content = self.editor.run(&request.content);
        if title.is_empty() || content.is_empty() {
            return Err(AppError::Validation(
                "Title and content must not be blank".to_string(),
            ));
        }

        let group_gid = trimmed(request.group);
        if let Some(gid) = &group_gid {
            if self.groups.find_by_id(gid).await?.is_none() {
                return Err(AppError::BadRequest(format!("Unknown group '{}'", gid)));
            }
        }

        let mut tag_ids = request.tags;
        tag_ids.sort_unstable();
        tag_ids.dedup();
        for id in &tag_ids {
            if self.tags.find_by_id(id).await?.is_none() {
                return Err(AppError::BadRequest(format!("Unknown tag '{}'", id)));
            }
        }

        let website = match trimmed(request.website) {
            Some(site) => {
                url::Url::parse(&site).map_err(|err| {
                    AppError::Validation(format!("Invalid website URL: {}", err))
                })?;
                site
            }
            None => String::new(),
        };

        Ok(PageDraft {
            group_gid,
            language,
            title,
            subtitle: self.normalize_optional(request.subtitle.as_deref()),
            content,
            event: self.normalize_optional(request.event.as_deref()),
            image: trimmed(request.image),
            image_caption: self.normalize_optional(request.image_caption.as_deref()),
            reference: trimmed(request.reference).unwrap_or_default(),
            website,
            author: trimmed(request.author).unwrap_or_default(),
            is_active: request.is_active.unwrap_or(false),
            tag_ids,
        })
    }

    fn normalize_optional(&self, text: Option<&str>) -> String {
        self.editor.run_opt(text).unwrap_or_default()
    }

    async fn respond(&self, page: Page) -> Result<PageResponse> {
        let tags = self
            .pages
            .tags_of(page.id)
            .await?
            .into_iter()
            .map(TagResponse::from)
            .collect();

        Ok(PageResponse::from_page(page, tags, &self.config.base_url))
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// خطاهای محدودیت دیتابیس هنگام نوشتن صفحه
fn constraint_error(err: AppError, draft: &PageDraft) -> AppError {
    if err.is_unique_violation_on("pages.group_gid") {
        AppError::Conflict(format!(
            "Group '{}' already has a page in language '{}'",
            draft.group_gid.as_deref().unwrap_or_default(),
            draft.language
        ))
    } else if err.is_foreign_key_violation() {
        AppError::BadRequest("Unknown group or tag reference".to_string())
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ConfigBuilder,
        database::Database,
        i18n::Languages,
        models::TagDraft,
        services::IdKind,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn service() -> (PageService, GroupRepository, TagRepository) {
        let db = Database::in_memory().await.unwrap();
        let config = Arc::new(ConfigBuilder::new().build());
        let groups = GroupRepository::new(db.clone());
        let tags = TagRepository::new(db.clone());
        let service = PageService::new(
            PageRepository::new(db),
            groups.clone(),
            tags.clone(),
            PublicIdGenerator::from_config(IdKind::Page, &config.ids),
            config,
        );
        (service, groups, tags)
    }

    fn fa() -> LanguageCode {
        Languages::new(vec!["fa".into(), "en".into()], "fa".into()).default_language()
    }

    fn request(value: serde_json::Value) -> PageRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_normalizes_text_fields() {
        let (service, _, _) = service().await;

        let page = service
            .create(
                request(json!({
                    "title": "  كتاب   تاريخ ",
                    "content": "سال 1402 ,  خوب بود",
                    "event": "رويداد",
                    "reference": "  منبع  ",
                })),
                &fa(),
            )
            .await
            .unwrap();

        assert!(page.pid.starts_with("P_"));
        assert_eq!(page.title, "کتاب تاریخ");
        assert_eq!(page.content, "سال ۱۴۰۲، خوب بود");
        assert_eq!(page.event, "رویداد");
        assert_eq!(page.reference, "منبع");
        assert_eq!(page.language, "fa");
        assert!(!page.is_active);
    }

    #[tokio::test]
    async fn test_blank_title_after_normalization_is_rejected() {
        let (service, _, _) = service().await;

        let err = service
            .create(request(json!({ "title": "\u{200C} ", "content": "متن" })), &fa())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_second_page_for_group_language_conflicts() {
        let (service, groups, _) = service().await;
        groups.insert("G_AAAAAAAA").await.unwrap();

        let body = json!({ "group": "G_AAAAAAAA", "title": "عنوان", "content": "متن" });
        service.create(request(body.clone()), &fa()).await.unwrap();

        let err = service.create(request(body), &fa()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_references_are_bad_requests() {
        let (service, _, _) = service().await;

        let err = service
            .create(
                request(json!({ "group": "G_MISSING0", "title": "t", "content": "c" })),
                &fa(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = service
            .create(request(json!({ "title": "t", "content": "c", "tags": [99] })), &fa())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_pid_and_language_and_replaces_tags() {
        let (service, _, tags) = service().await;
        let tag = tags
            .create(&TagDraft {
                name: "تاریخ".to_string(),
                keyword: "تاریخ".to_string(),
                is_active: true,
                language: "fa".to_string(),
            })
            .await
            .unwrap();

        let created = service
            .create(
                request(json!({ "title": "قدیم", "content": "متن", "tags": [tag.id] })),
                &fa(),
            )
            .await
            .unwrap();
        assert_eq!(created.tags.len(), 1);

        let updated = service
            .update(
                &created.pid,
                request(json!({ "title": "جدید", "content": "متن", "is_active": true })),
            )
            .await
            .unwrap();

        assert_eq!(updated.pid, created.pid);
        assert_eq!(updated.language, "fa");
        assert_eq!(updated.title, "جدید");
        assert!(updated.is_active);
        assert!(updated.tags.is_empty());
    }

    #[tokio::test]
    async fn test_missing_page() {
        let (service, _, _) = service().await;
        assert!(matches!(service.get("P_NOPE0000").await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete("P_NOPE0000").await, Err(AppError::NotFound(_))));
    }
}
