//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- Business logic (اینجا!)
//! ├─────────────────┤
//! │ Repository Layer│  <-- Data access
//! ├─────────────────┤
//! │    Database     │  <-- SQLite
//! └─────────────────┘
//! ```
//!
//! زبان فعال هیچوقت از state سراسری خونده نمیشه؛ هر عملیاتی که بهش نیاز داره
//! اون رو به صورت پارامتر میگیره.

mod group_service;
mod id_generator;
mod page_service;
mod report_service;
mod tag_service;

pub use group_service::*;
pub use id_generator::*;
pub use page_service::*;
pub use report_service::*;
pub use tag_service::*;

use std::sync::Arc;

use crate::{
    config::Config,
    database::{Database, GroupRepository, PageRepository, ReportRepository, TagRepository},
    i18n::Languages,
    notify::Notifier,
};

// =====================================
// Application State
// =====================================
/// وضعیت برنامه که بین همه handlers اشتراک‌گذاری میشه
///
/// clone کردنش فقط شمارنده‌های Arc رو زیاد میکنه.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub languages: Arc<Languages>,
    pub db: Database,
    pub group_service: Arc<GroupService>,
    pub page_service: Arc<PageService>,
    pub report_service: Arc<ReportService>,
    pub tag_service: Arc<TagService>,
}

impl AppState {
    /// ساخت AppState و همه سرویس‌ها
    #[must_use]
    pub fn new(db: Database, config: Config, notifier: Arc<dyn Notifier>) -> Self {
        let groups = GroupRepository::new(db.clone());
        let pages = PageRepository::new(db.clone());
        let reports = ReportRepository::new(db.clone());
        let tags = TagRepository::new(db.clone());

        let config = Arc::new(config);
        let languages = Arc::new(config.languages());

        let group_service = Arc::new(GroupService::new(
            groups.clone(),
            PublicIdGenerator::from_config(IdKind::Group, &config.ids),
        ));

        let page_service = Arc::new(PageService::new(
            pages.clone(),
            groups,
            tags.clone(),
            PublicIdGenerator::from_config(IdKind::Page, &config.ids),
            config.clone(),
        ));

        let report_service = Arc::new(ReportService::new(
            reports,
            pages,
            notifier,
            config.ids.rid_prefix.clone(),
        ));

        let tag_service = Arc::new(TagService::new(tags));

        Self {
            config,
            languages,
            db,
            group_service,
            page_service,
            report_service,
            tag_service,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// =====================================
// Service Trait
// =====================================
/// Marker trait برای services
///
/// همه سرویس‌ها باید Send + Sync باشن تا داخل `Arc` بین taskها share بشن.
pub trait Service: Send + Sync {}
