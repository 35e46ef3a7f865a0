//! 下载数据仓库
//!
//! downloads 表与四张关联表（话题、作者、下载文件、评论）以及翻译分组表。
//! 所有返回"完整下载"的查询都经过 [`DownloadsRepository::assemble`]，
//! 按关系批量加载，每种关系一次查询。

use std::collections::HashMap;

use sea_orm::*;
use serde::Serialize;

use super::{
    Translated, TranslationSibling, UserSummary, contains_insensitive, dedup_ids, non_empty,
    unique_slug,
};
use crate::database::dto::DownloadFields;
use crate::database::pagination::{CursorInput, CursorPage, OffsetInput, fetch_cursor_page};
use crate::entity::prelude::*;
use crate::entity::sea_orm_active_enums::{DownloadType, Language, Status};
use crate::entity::{
    download_authors, download_comments, download_download_files, download_files, download_topics,
    download_translations, downloads, medias, topics,
};
use crate::utils::{new_id, now_millis, text::trim_text};

/// 摘要最大长度
const EXCERPT_LENGTH: usize = 160;
/// 搜索结果条数上限
const SEARCH_LIMIT: u64 = 10;

/// 带关联数据的下载
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDetail {
    #[serde(flatten)]
    pub download: downloads::Model,
    pub featured_image: Option<medias::Model>,
    /// 按创建时间倒序
    pub download_files: Vec<download_files::Model>,
    pub topics: Vec<topics::Model>,
    pub authors: Vec<UserSummary>,
}

/// 翻译分组及其全部语言版本
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTranslationGroup {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub downloads: Vec<DownloadDetail>,
}

impl DownloadTranslationGroup {
    /// 只保留已发布的版本
    pub fn published(mut self) -> Self {
        self.downloads.retain(|d| d.download.status == Status::Published);
        self
    }

    /// 与给定语言不同的版本
    pub fn sibling(&self, current: Language) -> Option<&DownloadDetail> {
        self.downloads
            .iter()
            .find(|d| d.download.language != current)
    }

    pub fn in_language(&self, language: Language) -> Option<&DownloadDetail> {
        self.downloads
            .iter()
            .find(|d| d.download.language == language)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDashboardItem {
    #[serde(flatten)]
    pub download: downloads::Model,
    pub featured_image: Option<medias::Model>,
    pub translations: Vec<TranslationSibling>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadSitemapItem {
    pub slug: String,
    pub r#type: DownloadType,
    pub updated_at: i64,
}

/// 写入前补全的派生字段
struct DerivedContent {
    excerpt: String,
    meta_title: String,
    meta_description: String,
}

impl DerivedContent {
    fn from_fields(fields: &DownloadFields) -> Self {
        let excerpt = non_empty(fields.excerpt.clone())
            .unwrap_or_else(|| trim_text(&fields.content, EXCERPT_LENGTH));
        let meta_title = non_empty(fields.meta_title.clone()).unwrap_or_else(|| fields.title.clone());
        let meta_description =
            non_empty(fields.meta_description.clone()).unwrap_or_else(|| excerpt.clone());
        Self {
            excerpt,
            meta_title,
            meta_description,
        }
    }
}

/// 下载数据仓库
pub struct DownloadsRepository;

impl DownloadsRepository {
    // ==================== 关联数据组装 ====================

    /// 为一页下载批量加载封面、文件、话题与作者
    pub async fn assemble<C>(
        conn: &C,
        rows: Vec<downloads::Model>,
    ) -> Result<Vec<DownloadDetail>, DbErr>
    where
        C: ConnectionTrait,
    {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let images = rows.load_one(Medias, conn).await?;
        let files = rows
            .load_many_to_many(DownloadFiles, DownloadDownloadFiles, conn)
            .await?;
        let topic_lists = rows
            .load_many_to_many(Topics, DownloadTopics, conn)
            .await?;
        let author_lists = rows
            .load_many_to_many(Users, DownloadAuthors, conn)
            .await?;

        let details = rows
            .into_iter()
            .zip(images)
            .zip(files)
            .zip(topic_lists)
            .zip(author_lists)
            .map(|((((download, featured_image), mut files), topics), authors)| {
                files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                DownloadDetail {
                    download,
                    featured_image,
                    download_files: files,
                    topics,
                    authors: authors.into_iter().map(UserSummary::from).collect(),
                }
            })
            .collect();

        Ok(details)
    }

    async fn assemble_one<C>(
        conn: &C,
        row: Option<downloads::Model>,
    ) -> Result<Option<DownloadDetail>, DbErr>
    where
        C: ConnectionTrait,
    {
        match row {
            Some(row) => Ok(Self::assemble(conn, vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn assemble_page<C>(
        conn: &C,
        page: CursorPage<downloads::Model>,
    ) -> Result<CursorPage<DownloadDetail>, DbErr>
    where
        C: ConnectionTrait,
    {
        let items = Self::assemble(conn, page.items).await?;
        Ok(CursorPage {
            items,
            next_cursor: page.next_cursor,
        })
    }

    // ==================== 单条查询 ====================

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<downloads::Model>, DbErr> {
        Downloads::find_by_id(id).one(db).await
    }

    pub async fn find_by_slug(
        db: &DatabaseConnection,
        slug: &str,
    ) -> Result<Option<downloads::Model>, DbErr> {
        Downloads::find()
            .filter(downloads::Column::Slug.eq(slug))
            .one(db)
            .await
    }

    pub async fn find_detail_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<DownloadDetail>, DbErr> {
        let row = Self::find_by_id(db, id).await?;
        Self::assemble_one(db, row).await
    }

    pub async fn find_detail_by_slug(
        db: &DatabaseConnection,
        slug: &str,
    ) -> Result<Option<DownloadDetail>, DbErr> {
        let row = Self::find_by_slug(db, slug).await?;
        Self::assemble_one(db, row).await
    }

    /// 查询翻译分组及其全部语言版本
    pub async fn find_translation(
        db: &DatabaseConnection,
        translation_id: &str,
    ) -> Result<Option<DownloadTranslationGroup>, DbErr> {
        let Some(group) = DownloadTranslations::find_by_id(translation_id).one(db).await? else {
            return Ok(None);
        };

        let rows = Downloads::find()
            .filter(downloads::Column::DownloadTranslationId.eq(translation_id))
            .order_by_asc(downloads::Column::Language)
            .all(db)
            .await?;

        Ok(Some(DownloadTranslationGroup {
            id: group.id,
            created_at: group.created_at,
            updated_at: group.updated_at,
            downloads: Self::assemble(db, rows).await?,
        }))
    }

    /// 同一翻译分组中指定语言的版本
    pub async fn find_in_translation(
        db: &DatabaseConnection,
        translation_id: &str,
        language: Language,
    ) -> Result<Option<downloads::Model>, DbErr> {
        Downloads::find()
            .filter(downloads::Column::DownloadTranslationId.eq(translation_id))
            .filter(downloads::Column::Language.eq(language))
            .one(db)
            .await
    }

    // ==================== 列表查询 ====================

    fn published(language: Language) -> Condition {
        Condition::all()
            .add(downloads::Column::Language.eq(language))
            .add(downloads::Column::Status.eq(Status::Published))
    }

    /// 已发布的下载（偏移分页，按更新时间倒序），可按类型筛选
    pub async fn find_published(
        db: &DatabaseConnection,
        language: Language,
        download_type: Option<DownloadType>,
        page: OffsetInput,
    ) -> Result<Vec<DownloadDetail>, DbErr> {
        let mut query = Downloads::find().filter(Self::published(language));
        if let Some(download_type) = download_type {
            query = query.filter(downloads::Column::Type.eq(download_type));
        }

        let rows = page
            .apply(query.order_by_desc(downloads::Column::UpdatedAt))
            .all(db)
            .await?;
        Self::assemble(db, rows).await
    }

    /// 无限滚动：已发布的下载
    pub async fn find_published_cursor(
        db: &DatabaseConnection,
        language: Language,
        download_type: Option<DownloadType>,
        cursor: &CursorInput,
    ) -> Result<CursorPage<DownloadDetail>, DbErr> {
        let mut query = Downloads::find().filter(Self::published(language));
        if let Some(download_type) = download_type {
            query = query.filter(downloads::Column::Type.eq(download_type));
        }

        let page = fetch_cursor_page(db, query, downloads::Column::UpdatedAt, cursor, |d| {
            d.updated_at
        })
        .await?;
        Self::assemble_page(db, page).await
    }

    fn by_topic(language: Language, topic_id: &str) -> Select<Downloads> {
        Downloads::find()
            .join(JoinType::InnerJoin, downloads::Relation::DownloadTopics.def())
            .filter(download_topics::Column::TopicId.eq(topic_id))
            .filter(Self::published(language))
    }

    /// 无限滚动：同一话题下的其他下载
    ///
    /// 话题条件在 SQL 中过滤，保证每页条数准确。
    pub async fn find_related_cursor(
        db: &DatabaseConnection,
        language: Language,
        topic_id: &str,
        current_download_id: &str,
        cursor: &CursorInput,
    ) -> Result<CursorPage<DownloadDetail>, DbErr> {
        let query = Self::by_topic(language, topic_id)
            .filter(downloads::Column::Id.ne(current_download_id));
        let page = fetch_cursor_page(db, query, downloads::Column::UpdatedAt, cursor, |d| {
            d.updated_at
        })
        .await?;
        Self::assemble_page(db, page).await
    }

    /// 无限滚动：某话题下的下载
    pub async fn find_by_topic_cursor(
        db: &DatabaseConnection,
        language: Language,
        topic_id: &str,
        cursor: &CursorInput,
    ) -> Result<CursorPage<DownloadDetail>, DbErr> {
        let query = Self::by_topic(language, topic_id);
        let page = fetch_cursor_page(db, query, downloads::Column::UpdatedAt, cursor, |d| {
            d.updated_at
        })
        .await?;
        Self::assemble_page(db, page).await
    }

    /// 后台列表：所有状态，附带翻译分组中的其他版本
    pub async fn find_dashboard(
        db: &DatabaseConnection,
        language: Language,
        download_type: Option<DownloadType>,
        page: OffsetInput,
    ) -> Result<Vec<DownloadDashboardItem>, DbErr> {
        let mut query = Downloads::find().filter(downloads::Column::Language.eq(language));
        if let Some(download_type) = download_type {
            query = query.filter(downloads::Column::Type.eq(download_type));
        }
        let rows = page
            .apply(query.order_by_desc(downloads::Column::UpdatedAt))
            .all(db)
            .await?;

        let images = rows.load_one(Medias, db).await?;

        let translation_ids: Vec<String> = rows
            .iter()
            .map(|d| d.download_translation_id.clone())
            .collect();
        let mut siblings: HashMap<String, Vec<TranslationSibling>> = HashMap::new();
        for sibling in Downloads::find()
            .filter(downloads::Column::DownloadTranslationId.is_in(translation_ids))
            .filter(downloads::Column::Language.ne(language))
            .all(db)
            .await?
        {
            siblings
                .entry(sibling.download_translation_id.clone())
                .or_default()
                .push(TranslationSibling {
                    id: sibling.id,
                    title: sibling.title,
                    language: sibling.language,
                });
        }

        Ok(rows
            .into_iter()
            .zip(images)
            .map(|(download, featured_image)| DownloadDashboardItem {
                translations: siblings
                    .remove(&download.download_translation_id)
                    .unwrap_or_default(),
                download,
                featured_image,
            })
            .collect())
    }

    /// 站点地图条目（已发布）
    pub async fn find_sitemap(
        db: &DatabaseConnection,
        language: Language,
        page: OffsetInput,
    ) -> Result<Vec<DownloadSitemapItem>, DbErr> {
        let rows = page
            .apply(
                Downloads::find()
                    .filter(Self::published(language))
                    .order_by_desc(downloads::Column::UpdatedAt),
            )
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|d| DownloadSitemapItem {
                slug: d.slug,
                r#type: d.r#type,
                updated_at: d.updated_at,
            })
            .collect())
    }

    /// 搜索标题或 slug（大小写不敏感），最多返回 10 条
    pub async fn search(
        db: &DatabaseConnection,
        language: Language,
        query: &str,
        published_only: bool,
    ) -> Result<Vec<DownloadDetail>, DbErr> {
        let condition = if published_only {
            Self::published(language)
        } else {
            Condition::all().add(downloads::Column::Language.eq(language))
        };

        let rows = Downloads::find()
            .filter(condition)
            .filter(
                Condition::any()
                    .add(contains_insensitive(
                        (Downloads, downloads::Column::Title),
                        query,
                    ))
                    .add(contains_insensitive(
                        (Downloads, downloads::Column::Slug),
                        query,
                    )),
            )
            .order_by_desc(downloads::Column::UpdatedAt)
            .limit(SEARCH_LIMIT)
            .all(db)
            .await?;
        Self::assemble(db, rows).await
    }

    // ==================== 统计 ====================

    /// 已发布数量；`language` 为空时统计全部语言
    pub async fn count_published(
        db: &DatabaseConnection,
        language: Option<Language>,
    ) -> Result<u64, DbErr> {
        let mut query = Downloads::find().filter(downloads::Column::Status.eq(Status::Published));
        if let Some(language) = language {
            query = query.filter(downloads::Column::Language.eq(language));
        }
        query.count(db).await
    }

    /// 后台统计：所有状态
    pub async fn count_all(db: &DatabaseConnection, language: Language) -> Result<u64, DbErr> {
        Downloads::find()
            .filter(downloads::Column::Language.eq(language))
            .count(db)
            .await
    }

    // ==================== 写操作 ====================

    /// 创建下载：新建翻译分组、下载行与关联行，全部在一个事务中完成
    pub async fn create(
        db: &DatabaseConnection,
        language: Language,
        fields: DownloadFields,
    ) -> Result<downloads::Model, DbErr> {
        let txn = db.begin().await?;
        let now = now_millis();

        let translation = download_translations::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let download = Self::insert_row(&txn, language, &translation.id, &fields, now).await?;
        Self::link_relations(&txn, &download.id, &fields).await?;

        txn.commit().await?;
        log::info!("已创建下载 {} ({})", download.slug, download.id);
        Ok(download)
    }

    /// 在已有翻译分组中添加另一语言版本
    ///
    /// 语言检查与插入在同一事务中完成，分组中已有该语言时返回 `LanguageTaken`。
    pub async fn translate(
        db: &DatabaseConnection,
        translation_id: &str,
        language: Language,
        fields: DownloadFields,
    ) -> Result<Translated<downloads::Model>, DbErr> {
        let txn = db.begin().await?;

        if DownloadTranslations::find_by_id(translation_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Ok(Translated::GroupNotFound);
        }

        let taken = Downloads::find()
            .filter(downloads::Column::DownloadTranslationId.eq(translation_id))
            .filter(downloads::Column::Language.eq(language))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Ok(Translated::LanguageTaken);
        }

        let now = now_millis();
        let download = Self::insert_row(&txn, language, translation_id, &fields, now).await?;
        Self::link_relations(&txn, &download.id, &fields).await?;

        download_translations::ActiveModel {
            id: Set(translation_id.to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;
        log::info!(
            "已为翻译分组 {} 添加 {} 版本: {}",
            translation_id,
            language.as_str(),
            download.slug
        );
        Ok(Translated::Created(download))
    }

    /// 更新下载并替换全部关联行，返回 `None` 表示记录不存在
    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        slug: &str,
        fields: DownloadFields,
    ) -> Result<Option<downloads::Model>, DbErr> {
        let txn = db.begin().await?;

        let Some(existing) = Downloads::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let slug = crate::utils::text::slugify(slug);
        let derived = DerivedContent::from_fields(&fields);
        let mut active: downloads::ActiveModel = existing.into();
        active.title = Set(fields.title.clone());
        active.slug = Set(slug);
        active.content = Set(fields.content.clone());
        active.excerpt = Set(derived.excerpt);
        active.meta_title = Set(Some(derived.meta_title));
        active.meta_description = Set(Some(derived.meta_description));
        active.developer = Set(fields.developer.clone());
        active.operating_system = Set(fields.operating_system.clone());
        active.license = Set(fields.license.clone());
        active.official_website = Set(fields.official_website.clone());
        active.schema_type = Set(fields.schema_type);
        active.r#type = Set(fields.r#type);
        active.currency = Set(fields.currency.clone());
        active.price = Set(fields.price.clone());
        active.status = Set(fields.status);
        active.featured_image_id = Set(fields.featured_image_id.clone());
        active.updated_at = Set(now_millis());
        let download = active.update(&txn).await?;

        Self::unlink_relations(&txn, id).await?;
        Self::link_relations(&txn, id, &fields).await?;

        txn.commit().await?;
        Ok(Some(download))
    }

    /// 删除下载及其关联行与评论；翻译分组为空时一并删除
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        let Some(existing) = Downloads::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        Self::unlink_relations(&txn, id).await?;
        DownloadComments::delete_many()
            .filter(download_comments::Column::DownloadId.eq(id))
            .exec(&txn)
            .await?;
        Downloads::delete_by_id(id).exec(&txn).await?;

        let remaining = Downloads::find()
            .filter(downloads::Column::DownloadTranslationId.eq(existing.download_translation_id.as_str()))
            .count(&txn)
            .await?;
        if remaining == 0 {
            DownloadTranslations::delete_by_id(existing.download_translation_id.as_str())
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        log::info!("已删除下载 {} ({})", existing.slug, id);
        Ok(true)
    }

    // ==================== 内部辅助 ====================

    async fn insert_row<C>(
        conn: &C,
        language: Language,
        translation_id: &str,
        fields: &DownloadFields,
        now: i64,
    ) -> Result<downloads::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let slug = unique_slug::<Downloads, _>(conn, downloads::Column::Slug, &fields.title).await?;
        let derived = DerivedContent::from_fields(fields);

        downloads::ActiveModel {
            id: Set(new_id()),
            language: Set(language),
            title: Set(fields.title.clone()),
            slug: Set(slug),
            content: Set(fields.content.clone()),
            excerpt: Set(derived.excerpt),
            meta_title: Set(Some(derived.meta_title)),
            meta_description: Set(Some(derived.meta_description)),
            developer: Set(fields.developer.clone()),
            operating_system: Set(fields.operating_system.clone()),
            license: Set(fields.license.clone()),
            official_website: Set(fields.official_website.clone()),
            schema_type: Set(fields.schema_type),
            r#type: Set(fields.r#type),
            currency: Set(fields.currency.clone()),
            price: Set(fields.price.clone()),
            status: Set(fields.status),
            download_translation_id: Set(translation_id.to_string()),
            featured_image_id: Set(fields.featured_image_id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    async fn link_relations<C>(
        conn: &C,
        download_id: &str,
        fields: &DownloadFields,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let topic_rows: Vec<_> = dedup_ids(&fields.topics)
            .into_iter()
            .map(|topic_id| download_topics::ActiveModel {
                download_id: Set(download_id.to_string()),
                topic_id: Set(topic_id),
            })
            .collect();
        if !topic_rows.is_empty() {
            DownloadTopics::insert_many(topic_rows)
                .exec_without_returning(conn)
                .await?;
        }

        let author_rows: Vec<_> = dedup_ids(&fields.authors)
            .into_iter()
            .map(|user_id| download_authors::ActiveModel {
                download_id: Set(download_id.to_string()),
                user_id: Set(user_id),
            })
            .collect();
        if !author_rows.is_empty() {
            DownloadAuthors::insert_many(author_rows)
                .exec_without_returning(conn)
                .await?;
        }

        let file_rows: Vec<_> = dedup_ids(&fields.download_files)
            .into_iter()
            .map(|file_id| download_download_files::ActiveModel {
                download_id: Set(download_id.to_string()),
                download_file_id: Set(file_id),
            })
            .collect();
        if !file_rows.is_empty() {
            DownloadDownloadFiles::insert_many(file_rows)
                .exec_without_returning(conn)
                .await?;
        }

        Ok(())
    }

    async fn unlink_relations<C>(conn: &C, download_id: &str) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        DownloadTopics::delete_many()
            .filter(download_topics::Column::DownloadId.eq(download_id))
            .exec(conn)
            .await?;
        DownloadAuthors::delete_many()
            .filter(download_authors::Column::DownloadId.eq(download_id))
            .exec(conn)
            .await?;
        DownloadDownloadFiles::delete_many()
            .filter(download_download_files::Column::DownloadId.eq(download_id))
            .exec(conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> DownloadFields {
        serde_json::from_value(serde_json::json!({
            "title": "GIMP",
            "content": "<p>GNU Image Manipulation Program</p>",
            "developer": "GIMP Team",
            "operatingSystem": "Linux",
            "license": "GPL",
            "officialWebsite": "https://gimp.org",
            "currency": "USD",
            "price": "0",
            "featuredImageId": "m1",
            "topics": ["t1"],
        }))
        .unwrap()
    }

    #[test]
    fn derived_content_fills_blank_fields() {
        let derived = DerivedContent::from_fields(&fields());
        assert_eq!(derived.excerpt, "GNU Image Manipulation Program");
        assert_eq!(derived.meta_title, "GIMP");
        assert_eq!(derived.meta_description, "GNU Image Manipulation Program");
    }

    #[test]
    fn derived_content_keeps_explicit_values() {
        let mut f = fields();
        f.excerpt = Some("Short".into());
        f.meta_title = Some("GIMP Download".into());
        let derived = DerivedContent::from_fields(&f);
        assert_eq!(derived.excerpt, "Short");
        assert_eq!(derived.meta_title, "GIMP Download");
        assert_eq!(derived.meta_description, "Short");
    }
}
