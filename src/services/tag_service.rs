//! # سرویس برچسب‌ها

use tracing::{info, instrument};
use validator::Validate;

use crate::{
    database::{Repository, TagRepository},
    error::{AppError, Result},
    i18n::LanguageCode,
    models::{ListQuery, PaginatedResult, TagDraft, TagRequest, TagResponse},
    normalizer::PersianEditor,
    utils::{is_valid_slug, slugify},
};

use super::Service;

/// سرویس مدیریت برچسب‌ها
#[derive(Debug, Clone)]
pub struct TagService {
    repo: TagRepository,
    editor: PersianEditor,
}

impl Service for TagService {}

impl TagService {
    #[must_use]
    pub fn new(repo: TagRepository) -> Self {
        Self {
            repo,
            editor: PersianEditor::default(),
        }
    }

    /// ساخت برچسب در زبان فعال
    ///
    /// # Errors
    /// - `Validation`: نام خالی یا keyword نامعتبر
    /// - `Conflict`: نام تکراری
    #[instrument(skip(self, request), fields(language = %language))]
    pub async fn create(&self, request: TagRequest, language: &LanguageCode) -> Result<TagResponse> {
        let draft = self.prepare(request, language.to_string())?;

        let tag = self
            .repo
            .create(&draft)
            .await
            .map_err(|err| duplicate_name(err, &draft.name))?;

        info!(id = tag.id, name = %tag.name, "Created tag");
        Ok(tag.into())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<TagResponse> {
        self.repo
            .find_by_id(&id)
            .await?
            .map(TagResponse::from)
            .ok_or_else(|| AppError::tag_not_found(id))
    }

    /// ویرایش برچسب؛ زبانش تغییر نمیکنه
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i64, request: TagRequest) -> Result<TagResponse> {
        let existing = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::tag_not_found(id))?;

        let draft = self.prepare(request, existing.language)?;

        let tag = self
            .repo
            .update(id, &draft)
            .await
            .map_err(|err| duplicate_name(err, &draft.name))?
            .ok_or_else(|| AppError::tag_not_found(id))?;

        info!(id = tag.id, "Updated tag");
        Ok(tag.into())
    }

    /// حذف برچسب؛ صفحه‌ها فقط ارتباطشون رو از دست میدن
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(&id).await? {
            return Err(AppError::tag_not_found(id));
        }

        info!(id, "Deleted tag");
        Ok(())
    }

    /// لیست برچسب‌های زبان فعال
    #[instrument(skip(self, query), fields(language = %language))]
    pub async fn list(
        &self,
        language: &LanguageCode,
        query: &ListQuery,
    ) -> Result<PaginatedResult<TagResponse>> {
        let pagination = query.pagination();
        let search = query.search_pattern();

        let (tags, total) = self
            .repo
            .list(language.as_str(), query.is_active, search.as_deref(), &pagination)
            .await?;

        Ok(PaginatedResult::new(tags, &pagination, total).map(TagResponse::from))
    }

    fn prepare(&self, request: TagRequest, language: String) -> Result<TagDraft> {
        request.validate()?;

        let name = self.editor.run(&request.name);
        if name.is_empty() {
            return Err(AppError::Validation("Tag name must not be blank".to_string()));
        }

        let keyword = match request.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) if is_valid_slug(keyword) => keyword.to_string(),
            Some(keyword) => {
                return Err(AppError::Validation(format!(
                    "'{}' is not a valid keyword",
                    keyword
                )))
            }
            None => slugify(&name),
        };

        if keyword.is_empty() {
            return Err(AppError::Validation(
                "A keyword could not be derived from the tag name".to_string(),
            ));
        }

        Ok(TagDraft {
            name,
            keyword,
            is_active: request.is_active.unwrap_or(true),
            language,
        })
    }
}

fn duplicate_name(err: AppError, name: &str) -> AppError {
    if err.is_unique_violation_on("tags.name") {
        AppError::Conflict(format!("Tag '{}' already exists", name))
    } else {
        err
    }
}
