//! # Repository Pattern
//!
//! یه لایه انتزاعی بین منطق برنامه و دیتابیس.
//! - سرویس‌ها نمیدونن داده کجا و چطور ذخیره میشه
//! - محدودیت‌های یکتایی و foreign key به عهده خود دیتابیسه؛
//!   repository‌ها خطای sqlx رو دست‌نخورده برمیگردونن تا سرویس تصمیم بگیره
//!
//! ## مفاهیم Rust:
//! - **async_trait**: امکان async در traits
//! - **Associated Types**: نوع entity و شناسه هر repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::Database;
use crate::{
    error::{AppError, Result},
    models::{
        Group, NewReport, Page, PageDraft, Pagination, ReportDetail, ReportStatus, Tag, TagDraft,
    },
};

// =====================================
// Base Repository Trait
// =====================================
/// Trait پایه برای همه Repository‌ها
///
/// ساخت و ویرایش هر entity امضای خودش رو داره و اینجا نیست.
#[async_trait]
pub trait Repository: Send + Sync {
    /// نوع Entity که این repository باهاش کار میکنه
    type Entity: Send + Sync;

    /// نوع شناسه (ID)
    type Id: Send + Sync + ?Sized;

    /// پیدا کردن با شناسه
    async fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>>;

    /// حذف با شناسه
    async fn delete(&self, id: &Self::Id) -> Result<bool>;

    /// شمارش کل
    async fn count(&self) -> Result<i64>;
}

// =====================================
// Group Repository
// =====================================
const GROUP_COLUMNS: &str = "id, gid, created_at, updated_at";

/// گروه به همراه تعداد صفحه‌هاش
#[derive(Debug, Clone, FromRow)]
pub struct GroupWithCount {
    #[sqlx(flatten)]
    pub group: Group,
    pub page_count: i64,
}

/// Repository گروه‌ها
#[derive(Debug, Clone)]
pub struct GroupRepository {
    db: Database,
}

impl GroupRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// درج گروه با gid داده شده
    ///
    /// # Errors
    /// gid تکراری خطای unique روی `page_groups.gid` میده
    pub async fn insert(&self, gid: &str) -> Result<Group> {
        let now = Utc::now();

        sqlx::query("INSERT INTO page_groups (gid, created_at, updated_at) VALUES (?, ?, ?)")
            .bind(gid)
            .bind(now)
            .bind(now)
            .execute(self.db.pool())
            .await?;

        self.find_by_id(gid)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create group".to_string()))
    }

    /// تعداد صفحه‌های یک گروه
    pub async fn page_count(&self, gid: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages WHERE group_gid = ?")
            .bind(gid)
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }

    /// لیست صفحه‌بندی شده با جستجو روی gid
    pub async fn list(
        &self,
        search: Option<&str>,
        pagination: &Pagination,
    ) -> Result<(Vec<GroupWithCount>, u64)> {
        let sql = format!(
            r#"
            SELECT g.id AS id, g.gid AS gid, g.created_at AS created_at, g.updated_at AS updated_at,
                   (SELECT COUNT(*) FROM pages p WHERE p.group_gid = g.gid) AS page_count
            FROM page_groups g
            WHERE {}
            ORDER BY g.created_at DESC, g.id DESC
            LIMIT ?2 OFFSET ?3
            "#,
            GROUP_FILTER
        );

        let rows = sqlx::query_as::<_, GroupWithCount>(&sql)
            .bind(search)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(self.db.pool())
            .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM page_groups g WHERE {}",
            GROUP_FILTER
        ))
        .bind(search)
        .fetch_one(self.db.pool())
        .await?;

        Ok((rows, total as u64))
    }
}

const GROUP_FILTER: &str = "(?1 IS NULL OR g.gid LIKE ?1 ESCAPE '\\')";

#[async_trait]
impl Repository for GroupRepository {
    type Entity = Group;
    type Id = str;

    async fn find_by_id(&self, gid: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(&format!(
            "SELECT {} FROM page_groups WHERE gid = ?",
            GROUP_COLUMNS
        ))
        .bind(gid)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(group)
    }

    /// صفحه‌ها و گزارش‌هاشون با cascade حذف میشن
    async fn delete(&self, gid: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM page_groups WHERE gid = ?")
            .bind(gid)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM page_groups")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

// =====================================
// Page Repository
// =====================================
const PAGE_COLUMNS: &str = "id, pid, group_gid, language, title, subtitle, content, event, \
     image, image_caption, reference, website, author, is_active, created_at, updated_at";

/// فیلتر لیست صفحه‌ها: ?1 زبان، ?2 فعال بودن، ?3 الگوی جستجو
const PAGE_FILTER: &str = r#"
    language = ?1
    AND (?2 IS NULL OR is_active = ?2)
    AND (?3 IS NULL
         OR pid LIKE ?3 ESCAPE '\' OR title LIKE ?3 ESCAPE '\'
         OR content LIKE ?3 ESCAPE '\' OR event LIKE ?3 ESCAPE '\'
         OR image_caption LIKE ?3 ESCAPE '\' OR website LIKE ?3 ESCAPE '\'
         OR author LIKE ?3 ESCAPE '\' OR reference LIKE ?3 ESCAPE '\'
         OR EXISTS (
             SELECT 1 FROM page_tags pt JOIN tags t ON t.id = pt.tag_id
             WHERE pt.page_id = pages.id
               AND (t.name LIKE ?3 ESCAPE '\' OR t.keyword LIKE ?3 ESCAPE '\')
         ))
"#;

/// Repository صفحه‌ها
#[derive(Debug, Clone)]
pub struct PageRepository {
    db: Database,
}

impl PageRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// درج صفحه و برچسب‌هاش در یک تراکنش
    ///
    /// # Errors
    /// - pid تکراری: خطای unique روی `pages.pid`
    /// - صفحه دوم برای همون (گروه، زبان): خطای unique روی `pages.group_gid`
    /// - گروه یا برچسب ناموجود: خطای foreign key
    pub async fn create(&self, pid: &str, draft: &PageDraft) -> Result<Page> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let page_id = sqlx::query(
            r#"
            INSERT INTO pages (pid, group_gid, language, title, subtitle, content, event,
                               image, image_caption, reference, website, author, is_active,
                               created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(pid)
        .bind(&draft.group_gid)
        .bind(&draft.language)
        .bind(&draft.title)
        .bind(&draft.subtitle)
        .bind(&draft.content)
        .bind(&draft.event)
        .bind(&draft.image)
        .bind(&draft.image_caption)
        .bind(&draft.reference)
        .bind(&draft.website)
        .bind(&draft.author)
        .bind(draft.is_active)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        insert_page_tags(&mut tx, page_id, &draft.tag_ids).await?;
        tx.commit().await?;

        self.find_by_id(pid)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create page".to_string()))
    }

    /// جایگزینی فیلدها و برچسب‌های صفحه (pid و زبان تغییر نمیکنن)
    ///
    /// اگه صفحه وجود نداشته باشه `None` برمیگرده.
    pub async fn update(&self, pid: &str, draft: &PageDraft) -> Result<Option<Page>> {
        let mut tx = self.db.begin().await?;

        let page_id = sqlx::query_scalar::<_, i64>("SELECT id FROM pages WHERE pid = ?")
            .bind(pid)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(page_id) = page_id else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE pages
            SET group_gid = ?, title = ?, subtitle = ?, content = ?, event = ?, image = ?,
                image_caption = ?, reference = ?, website = ?, author = ?, is_active = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&draft.group_gid)
        .bind(&draft.title)
        .bind(&draft.subtitle)
        .bind(&draft.content)
        .bind(&draft.event)
        .bind(&draft.image)
        .bind(&draft.image_caption)
        .bind(&draft.reference)
        .bind(&draft.website)
        .bind(&draft.author)
        .bind(draft.is_active)
        .bind(Utc::now())
        .bind(page_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM page_tags WHERE page_id = ?")
            .bind(page_id)
            .execute(&mut *tx)
            .await?;
        insert_page_tags(&mut tx, page_id, &draft.tag_ids).await?;

        tx.commit().await?;
        self.find_by_id(pid).await
    }

    /// برچسب‌های یک صفحه
    pub async fn tags_of(&self, page_id: i64) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id AS id, t.name AS name, t.keyword AS keyword, t.is_active AS is_active,
                   t.language AS language, t.created_at AS created_at, t.updated_at AS updated_at
            FROM tags t
            JOIN page_tags pt ON pt.tag_id = t.id
            WHERE pt.page_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(page_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(tags)
    }

    /// لیست صفحه‌های یک زبان با فیلتر و جستجو
    pub async fn list(
        &self,
        language: &str,
        is_active: Option<bool>,
        search: Option<&str>,
        pagination: &Pagination,
    ) -> Result<(Vec<Page>, u64)> {
        let pages = sqlx::query_as::<_, Page>(&format!(
            "SELECT {} FROM pages WHERE {} ORDER BY created_at DESC, id DESC LIMIT ?4 OFFSET ?5",
            PAGE_COLUMNS, PAGE_FILTER
        ))
        .bind(language)
        .bind(is_active)
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.db.pool())
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM pages WHERE {}",
            PAGE_FILTER
        ))
        .bind(language)
        .bind(is_active)
        .bind(search)
        .fetch_one(self.db.pool())
        .await?;

        Ok((pages, total as u64))
    }
}

async fn insert_page_tags(
    tx: &mut sqlx::Transaction<'static, sqlx::Sqlite>,
    page_id: i64,
    tag_ids: &[i64],
) -> Result<()> {
    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO page_tags (page_id, tag_id) VALUES (?, ?)")
            .bind(page_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl Repository for PageRepository {
    type Entity = Page;
    type Id = str;

    async fn find_by_id(&self, pid: &str) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(&format!(
            "SELECT {} FROM pages WHERE pid = ?",
            PAGE_COLUMNS
        ))
        .bind(pid)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(page)
    }

    async fn delete(&self, pid: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pages WHERE pid = ?")
            .bind(pid)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

// =====================================
// Report Repository
// =====================================
const REPORT_DETAIL_SELECT: &str = r#"
    SELECT r.id AS id, r.rid AS rid, r.page_pid AS page_pid, r.language AS language,
           r.body AS body, r.reporter AS reporter, r.description AS description,
           r.status AS status, r.created_at AS created_at, r.updated_at AS updated_at,
           p.title AS page_title
    FROM reports r
    JOIN pages p ON p.pid = r.page_pid
"#;

/// فیلتر لیست گزارش‌ها: ?1 زبان، ?2 وضعیت، ?3 الگوی جستجو
const REPORT_FILTER: &str = r#"
    r.language = ?1
    AND (?2 IS NULL OR r.status = ?2)
    AND (?3 IS NULL
         OR r.page_pid LIKE ?3 ESCAPE '\' OR r.rid LIKE ?3 ESCAPE '\'
         OR r.body LIKE ?3 ESCAPE '\' OR r.reporter LIKE ?3 ESCAPE '\'
         OR r.description LIKE ?3 ESCAPE '\')
"#;

/// Repository گزارش‌ها
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: Database,
}

impl ReportRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// ساخت دو مرحله‌ای گزارش در یک تراکنش
    ///
    /// ۱. درج ردیف بدون rid
    /// ۲. گرفتن شناسه ترتیبی از دیتابیس
    /// ۳. نوشتن `derive_rid(id)` فقط اگه rid هنوز خالیه
    ///
    /// اگه هر مرحله شکست بخوره کل تراکنش rollback میشه.
    pub async fn create<F>(&self, report: &NewReport, derive_rid: F) -> Result<ReportDetail>
    where
        F: FnOnce(i64) -> String + Send,
    {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO reports (page_pid, language, body, reporter, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&report.page_pid)
        .bind(&report.language)
        .bind(&report.body)
        .bind(&report.reporter)
        .bind(ReportStatus::Pending)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let rid = derive_rid(id);

        let written = sqlx::query("UPDATE reports SET rid = ? WHERE id = ? AND rid IS NULL")
            .bind(&rid)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if written != 1 {
            return Err(AppError::Internal(format!(
                "Reference id of report {} was already set",
                id
            )));
        }

        tx.commit().await?;

        self.find_by_id(&rid)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create report".to_string()))
    }

    /// ذخیره یادداشت مدیر روی گزارشی که هنوز pending ـه
    ///
    /// `false` یعنی گزارش دیگه pending نیست.
    pub async fn save_note(&self, id: i64, description: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE reports SET description = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .bind(ReportStatus::Pending)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// ثبت تصمیم فقط اگه گزارش هنوز pending باشه
    ///
    /// `false` یعنی تصمیم دیگه‌ای زودتر ثبت شده.
    pub async fn decide(&self, id: i64, status: ReportStatus, description: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = ?, description = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(status)
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .bind(ReportStatus::Pending)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// لیست گزارش‌های یک زبان با فیلتر وضعیت و جستجو
    pub async fn list(
        &self,
        language: &str,
        status: Option<ReportStatus>,
        search: Option<&str>,
        pagination: &Pagination,
    ) -> Result<(Vec<ReportDetail>, u64)> {
        let reports = sqlx::query_as::<_, ReportDetail>(&format!(
            "{} WHERE {} ORDER BY r.created_at DESC, r.id DESC LIMIT ?4 OFFSET ?5",
            REPORT_DETAIL_SELECT, REPORT_FILTER
        ))
        .bind(language)
        .bind(status)
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.db.pool())
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM reports r WHERE {}",
            REPORT_FILTER
        ))
        .bind(language)
        .bind(status)
        .bind(search)
        .fetch_one(self.db.pool())
        .await?;

        Ok((reports, total as u64))
    }
}

#[async_trait]
impl Repository for ReportRepository {
    type Entity = ReportDetail;
    type Id = str;

    async fn find_by_id(&self, rid: &str) -> Result<Option<ReportDetail>> {
        let report = sqlx::query_as::<_, ReportDetail>(&format!(
            "{} WHERE r.rid = ?",
            REPORT_DETAIL_SELECT
        ))
        .bind(rid)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(report)
    }

    async fn delete(&self, rid: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE rid = ?")
            .bind(rid)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reports")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

// =====================================
// Tag Repository
// =====================================
const TAG_COLUMNS: &str = "id, name, keyword, is_active, language, created_at, updated_at";

/// فیلتر لیست برچسب‌ها: ?1 زبان، ?2 فعال بودن، ?3 الگوی جستجو
const TAG_FILTER: &str = r#"
    language = ?1
    AND (?2 IS NULL OR is_active = ?2)
    AND (?3 IS NULL OR name LIKE ?3 ESCAPE '\' OR keyword LIKE ?3 ESCAPE '\')
"#;

/// Repository برچسب‌ها
#[derive(Debug, Clone)]
pub struct TagRepository {
    db: Database,
}

impl TagRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// درج برچسب
    ///
    /// # Errors
    /// نام تکراری خطای unique روی `tags.name` میده
    pub async fn create(&self, draft: &TagDraft) -> Result<Tag> {
        let now = Utc::now();

        let id = sqlx::query(
            r#"
            INSERT INTO tags (name, keyword, is_active, language, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.keyword)
        .bind(draft.is_active)
        .bind(&draft.language)
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await?
        .last_insert_rowid();

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create tag".to_string()))
    }

    /// ویرایش نام، keyword و وضعیت (زبان برچسب ثابت میمونه)
    pub async fn update(&self, id: i64, draft: &TagDraft) -> Result<Option<Tag>> {
        let result = sqlx::query(
            "UPDATE tags SET name = ?, keyword = ?, is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&draft.name)
        .bind(&draft.keyword)
        .bind(draft.is_active)
        .bind(Utc::now())
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(&id).await
    }

    /// لیست برچسب‌های یک زبان
    pub async fn list(
        &self,
        language: &str,
        is_active: Option<bool>,
        search: Option<&str>,
        pagination: &Pagination,
    ) -> Result<(Vec<Tag>, u64)> {
        let tags = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {} FROM tags WHERE {} ORDER BY name LIMIT ?4 OFFSET ?5",
            TAG_COLUMNS, TAG_FILTER
        ))
        .bind(language)
        .bind(is_active)
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.db.pool())
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM tags WHERE {}",
            TAG_FILTER
        ))
        .bind(language)
        .bind(is_active)
        .bind(search)
        .fetch_one(self.db.pool())
        .await?;

        Ok((tags, total as u64))
    }
}

#[async_trait]
impl Repository for TagRepository {
    type Entity = Tag;
    type Id = i64;

    async fn find_by_id(&self, id: &i64) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(&format!("SELECT {} FROM tags WHERE id = ?", TAG_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(tag)
    }

    async fn delete(&self, id: &i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListQuery;

    fn draft(group: Option<&str>, language: &str) -> PageDraft {
        PageDraft {
            group_gid: group.map(str::to_string),
            language: language.to_string(),
            title: "عنوان".to_string(),
            subtitle: String::new(),
            content: "متن".to_string(),
            event: String::new(),
            image: None,
            image_caption: String::new(),
            reference: String::new(),
            website: String::new(),
            author: String::new(),
            is_active: false,
            tag_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_duplicate_gid_is_a_unique_violation() {
        let db = Database::in_memory().await.unwrap();
        let repo = GroupRepository::new(db);

        repo.insert("G_AAAAAAAA").await.unwrap();
        let err = repo.insert("G_AAAAAAAA").await.unwrap_err();
        assert!(err.is_unique_violation_on("page_groups.gid"));
    }

    #[tokio::test]
    async fn test_second_page_for_group_language_is_rejected() {
        let db = Database::in_memory().await.unwrap();
        GroupRepository::new(db.clone()).insert("G_AAAAAAAA").await.unwrap();
        let pages = PageRepository::new(db);

        pages.create("P_11111111", &draft(Some("G_AAAAAAAA"), "fa")).await.unwrap();
        pages.create("P_22222222", &draft(Some("G_AAAAAAAA"), "en")).await.unwrap();

        let err = pages
            .create("P_33333333", &draft(Some("G_AAAAAAAA"), "fa"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(!err.is_unique_violation_on("pages.pid"));

        // صفحه‌های بدون گروه محدود نمیشن
        pages.create("P_44444444", &draft(None, "fa")).await.unwrap();
        pages.create("P_55555555", &draft(None, "fa")).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_group_is_a_foreign_key_violation() {
        let db = Database::in_memory().await.unwrap();
        let pages = PageRepository::new(db);

        let err = pages
            .create("P_11111111", &draft(Some("G_MISSING0"), "fa"))
            .await
            .unwrap_err();
        assert!(err.is_foreign_key_violation());
    }

    #[tokio::test]
    async fn test_report_rid_is_written_once() {
        let db = Database::in_memory().await.unwrap();
        PageRepository::new(db.clone())
            .create("P_ABCDEFGH", &draft(None, "fa"))
            .await
            .unwrap();
        let reports = ReportRepository::new(db.clone());

        let report = reports
            .create(
                &NewReport {
                    page_pid: "P_ABCDEFGH".to_string(),
                    language: "fa".to_string(),
                    body: "متن".to_string(),
                    reporter: "a@example.com".to_string(),
                },
                |id| format!("R_ABCDEFGH_{}", id),
            )
            .await
            .unwrap();

        let rid = report.report.rid.clone().unwrap();
        assert_eq!(rid, format!("R_ABCDEFGH_{}", report.report.id));
        assert_eq!(report.page_title, "عنوان");

        let rewritten = sqlx::query("UPDATE reports SET rid = 'X' WHERE id = ? AND rid IS NULL")
            .bind(report.report.id)
            .execute(db.pool())
            .await
            .unwrap();
        assert_eq!(rewritten.rows_affected(), 0);
    }

    #[tokio::test]
    async fn test_decide_only_applies_to_pending() {
        let db = Database::in_memory().await.unwrap();
        PageRepository::new(db.clone())
            .create("P_ABCDEFGH", &draft(None, "fa"))
            .await
            .unwrap();
        let reports = ReportRepository::new(db);

        let report = reports
            .create(
                &NewReport {
                    page_pid: "P_ABCDEFGH".to_string(),
                    language: "fa".to_string(),
                    body: "متن".to_string(),
                    reporter: "a@example.com".to_string(),
                },
                |id| format!("R_ABCDEFGH_{}", id),
            )
            .await
            .unwrap();
        let id = report.report.id;

        assert!(reports.decide(id, ReportStatus::Accepted, "-").await.unwrap());
        assert!(!reports.decide(id, ReportStatus::Denied, "no").await.unwrap());
        assert!(!reports.save_note(id, "late").await.unwrap());
    }

    #[tokio::test]
    async fn test_page_tags_and_search() {
        let db = Database::in_memory().await.unwrap();
        let tags = TagRepository::new(db.clone());
        let tag = tags
            .create(&TagDraft {
                name: "تاریخ".to_string(),
                keyword: "تاریخ".to_string(),
                is_active: true,
                language: "fa".to_string(),
            })
            .await
            .unwrap();

        let pages = PageRepository::new(db);
        let mut with_tag = draft(None, "fa");
        with_tag.tag_ids = vec![tag.id];
        let page = pages.create("P_ABCDEFGH", &with_tag).await.unwrap();
        pages.create("P_ZZZZZZZZ", &draft(None, "fa")).await.unwrap();

        assert_eq!(pages.tags_of(page.id).await.unwrap().len(), 1);

        let (found, total) = pages
            .list("fa", None, Some("%تاریخ%"), &Pagination::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].pid, "P_ABCDEFGH");

        let (english, _) = pages.list("en", None, None, &Pagination::default()).await.unwrap();
        assert!(english.is_empty());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = Database::in_memory().await.unwrap();
        let pages = PageRepository::new(db);
        pages.create("P_ABCDEFGH", &draft(None, "fa")).await.unwrap();
        pages.create("PQABCDEFGH", &draft(None, "fa")).await.unwrap();

        let query = ListQuery {
            q: Some("P_AB".to_string()),
            ..ListQuery::default()
        };
        let (found, total) = pages
            .list("fa", None, query.search_pattern().as_deref(), &query.pagination())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].pid, "P_ABCDEFGH");

        let far = ListQuery {
            page: Some(u32::MAX),
            per_page: Some(100),
            ..ListQuery::default()
        };
        let (rows, total) = pages.list("fa", None, None, &far.pagination()).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 2);
    }
}
