//! # سرویس گروه‌ها
//!
//! گروه بعد از ساخت تغییر نمیکنه؛ فقط ساخت، خوندن، لیست و حذف داره.

use tracing::{info, instrument};

use crate::{
    database::{GroupRepository, Repository},
    error::{AppError, Result},
    models::{GroupResponse, ListQuery, PaginatedResult},
};

use super::{IdKind, PublicIdGenerator, Service};

/// سرویس مدیریت گروه‌ها
#[derive(Debug, Clone)]
pub struct GroupService {
    repo: GroupRepository,
    ids: PublicIdGenerator,
}

impl Service for GroupService {}

impl GroupService {
    #[must_use]
    pub fn new(repo: GroupRepository, ids: PublicIdGenerator) -> Self {
        debug_assert_eq!(ids.kind(), IdKind::Group);
        Self { repo, ids }
    }

    /// ساخت گروه جدید با gid یکتا
    #[instrument(skip(self))]
    pub async fn create(&self) -> Result<GroupResponse> {
        let group = self
            .ids
            .insert_unique(|gid| {
                let repo = self.repo.clone();
                async move { repo.insert(&gid).await }
            })
            .await?;

        info!(gid = %group.gid, "Created group");
        Ok(GroupResponse::from_group(&group, 0))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, gid: &str) -> Result<GroupResponse> {
        let group = self
            .repo
            .find_by_id(gid)
            .await?
            .ok_or_else(|| AppError::group_not_found(gid))?;

        let page_count = self.repo.page_count(gid).await?;
        Ok(GroupResponse::from_group(&group, page_count))
    }

    /// لیست گروه‌ها با جستجو روی gid
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<GroupResponse>> {
        let pagination = query.pagination();
        let search = query.search_pattern();

        let (rows, total) = self.repo.list(search.as_deref(), &pagination).await?;
        let data = rows
            .iter()
            .map(|row| GroupResponse::from_group(&row.group, row.page_count))
            .collect();

        Ok(PaginatedResult::new(data, &pagination, total))
    }

    /// حذف گروه به همراه صفحه‌ها و گزارش‌هاشون
    #[instrument(skip(self))]
    pub async fn delete(&self, gid: &str) -> Result<()> {
        if !self.repo.delete(gid).await? {
            return Err(AppError::group_not_found(gid));
        }

        info!(gid = %gid, "Deleted group");
        Ok(())
    }
}
