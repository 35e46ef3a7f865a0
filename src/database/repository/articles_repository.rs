//! 文章数据仓库
//!
//! 结构与下载仓库一致：翻译分组、话题与作者关联、评论。

use std::collections::HashMap;

use sea_orm::*;
use serde::Serialize;

use super::{
    Translated, TranslationSibling, UserSummary, contains_insensitive, dedup_ids, non_empty,
    unique_slug,
};
use crate::database::dto::ArticleFields;
use crate::database::pagination::{CursorInput, CursorPage, OffsetInput, fetch_cursor_page};
use crate::entity::prelude::*;
use crate::entity::sea_orm_active_enums::{Language, Status};
use crate::entity::{
    article_authors, article_comments, article_topics, article_translations, articles, medias,
    topics,
};
use crate::utils::{new_id, now_millis, text::slugify, text::trim_text};

const EXCERPT_LENGTH: usize = 160;
const SEARCH_LIMIT: u64 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: articles::Model,
    pub featured_image: Option<medias::Model>,
    pub topics: Vec<topics::Model>,
    pub authors: Vec<UserSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleTranslationGroup {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub articles: Vec<ArticleDetail>,
}

impl ArticleTranslationGroup {
    /// 只保留已发布的版本
    pub fn published(mut self) -> Self {
        self.articles.retain(|d| d.article.status == Status::Published);
        self
    }

    pub fn sibling(&self, current: Language) -> Option<&ArticleDetail> {
        self.articles.iter().find(|a| a.article.language != current)
    }

    pub fn in_language(&self, language: Language) -> Option<&ArticleDetail> {
        self.articles.iter().find(|a| a.article.language == language)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDashboardItem {
    #[serde(flatten)]
    pub article: articles::Model,
    pub featured_image: Option<medias::Model>,
    pub translations: Vec<TranslationSibling>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSitemapItem {
    pub slug: String,
    pub updated_at: i64,
}

struct DerivedContent {
    excerpt: String,
    meta_title: String,
    meta_description: String,
}

impl DerivedContent {
    fn from_fields(fields: &ArticleFields) -> Self {
        let excerpt = non_empty(fields.excerpt.clone())
            .unwrap_or_else(|| trim_text(&fields.content, EXCERPT_LENGTH));
        Self {
            meta_title: non_empty(fields.meta_title.clone())
                .unwrap_or_else(|| fields.title.clone()),
            meta_description: non_empty(fields.meta_description.clone())
                .unwrap_or_else(|| excerpt.clone()),
            excerpt,
        }
    }
}

/// 文章数据仓库
pub struct ArticlesRepository;

impl ArticlesRepository {
    // ==================== 关联数据组装 ====================

    /// 为一页文章批量加载封面、话题与作者
    pub async fn assemble<C>(
        conn: &C,
        rows: Vec<articles::Model>,
    ) -> Result<Vec<ArticleDetail>, DbErr>
    where
        C: ConnectionTrait,
    {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let images = rows.load_one(Medias, conn).await?;
        let topic_lists = rows.load_many_to_many(Topics, ArticleTopics, conn).await?;
        let author_lists = rows.load_many_to_many(Users, ArticleAuthors, conn).await?;

        Ok(rows
            .into_iter()
            .zip(images)
            .zip(topic_lists)
            .zip(author_lists)
            .map(|(((article, featured_image), topics), authors)| ArticleDetail {
                article,
                featured_image,
                topics,
                authors: authors.into_iter().map(UserSummary::from).collect(),
            })
            .collect())
    }

    async fn assemble_page<C>(
        conn: &C,
        page: CursorPage<articles::Model>,
    ) -> Result<CursorPage<ArticleDetail>, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(CursorPage {
            items: Self::assemble(conn, page.items).await?,
            next_cursor: page.next_cursor,
        })
    }

    // ==================== 单条查询 ====================

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<articles::Model>, DbErr> {
        Articles::find_by_id(id).one(db).await
    }

    pub async fn find_detail_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<ArticleDetail>, DbErr> {
        let rows = Articles::find_by_id(id).all(db).await?;
        Ok(Self::assemble(db, rows).await?.into_iter().next())
    }

    pub async fn find_detail_by_slug(
        db: &DatabaseConnection,
        slug: &str,
    ) -> Result<Option<ArticleDetail>, DbErr> {
        let rows = Articles::find()
            .filter(articles::Column::Slug.eq(slug))
            .all(db)
            .await?;
        Ok(Self::assemble(db, rows).await?.into_iter().next())
    }

    pub async fn find_translation(
        db: &DatabaseConnection,
        translation_id: &str,
    ) -> Result<Option<ArticleTranslationGroup>, DbErr> {
        let Some(group) = ArticleTranslations::find_by_id(translation_id)
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        let rows = Articles::find()
            .filter(articles::Column::ArticleTranslationId.eq(translation_id))
            .order_by_asc(articles::Column::Language)
            .all(db)
            .await?;

        Ok(Some(ArticleTranslationGroup {
            id: group.id,
            created_at: group.created_at,
            updated_at: group.updated_at,
            articles: Self::assemble(db, rows).await?,
        }))
    }

    pub async fn find_in_translation(
        db: &DatabaseConnection,
        translation_id: &str,
        language: Language,
    ) -> Result<Option<articles::Model>, DbErr> {
        Articles::find()
            .filter(articles::Column::ArticleTranslationId.eq(translation_id))
            .filter(articles::Column::Language.eq(language))
            .one(db)
            .await
    }

    // ==================== 列表查询 ====================

    fn published(language: Language) -> Condition {
        Condition::all()
            .add(articles::Column::Language.eq(language))
            .add(articles::Column::Status.eq(Status::Published))
    }

    pub async fn find_published(
        db: &DatabaseConnection,
        language: Language,
        page: OffsetInput,
    ) -> Result<Vec<ArticleDetail>, DbErr> {
        let rows = page
            .apply(
                Articles::find()
                    .filter(Self::published(language))
                    .order_by_desc(articles::Column::UpdatedAt),
            )
            .all(db)
            .await?;
        Self::assemble(db, rows).await
    }

    pub async fn find_published_cursor(
        db: &DatabaseConnection,
        language: Language,
        cursor: &CursorInput,
    ) -> Result<CursorPage<ArticleDetail>, DbErr> {
        let query = Articles::find().filter(Self::published(language));
        let page = fetch_cursor_page(db, query, articles::Column::UpdatedAt, cursor, |a| {
            a.updated_at
        })
        .await?;
        Self::assemble_page(db, page).await
    }

    /// 无限滚动：某话题下的文章
    pub async fn find_by_topic_cursor(
        db: &DatabaseConnection,
        language: Language,
        topic_id: &str,
        cursor: &CursorInput,
    ) -> Result<CursorPage<ArticleDetail>, DbErr> {
        let query = Articles::find()
            .join(JoinType::InnerJoin, articles::Relation::ArticleTopics.def())
            .filter(article_topics::Column::TopicId.eq(topic_id))
            .filter(Self::published(language));
        let page = fetch_cursor_page(db, query, articles::Column::UpdatedAt, cursor, |a| {
            a.updated_at
        })
        .await?;
        Self::assemble_page(db, page).await
    }

    pub async fn find_dashboard(
        db: &DatabaseConnection,
        language: Language,
        page: OffsetInput,
    ) -> Result<Vec<ArticleDashboardItem>, DbErr> {
        let rows = page
            .apply(
                Articles::find()
                    .filter(articles::Column::Language.eq(language))
                    .order_by_desc(articles::Column::UpdatedAt),
            )
            .all(db)
            .await?;
        let images = rows.load_one(Medias, db).await?;

        let translation_ids: Vec<String> = rows
            .iter()
            .map(|a| a.article_translation_id.clone())
            .collect();
        let mut siblings: HashMap<String, Vec<TranslationSibling>> = HashMap::new();
        for sibling in Articles::find()
            .filter(articles::Column::ArticleTranslationId.is_in(translation_ids))
            .filter(articles::Column::Language.ne(language))
            .all(db)
            .await?
        {
            siblings
                .entry(sibling.article_translation_id.clone())
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
            .map(|(article, featured_image)| ArticleDashboardItem {
                translations: siblings
                    .remove(&article.article_translation_id)
                    .unwrap_or_default(),
                article,
                featured_image,
            })
            .collect())
    }

    pub async fn find_sitemap(
        db: &DatabaseConnection,
        language: Language,
        page: OffsetInput,
    ) -> Result<Vec<ArticleSitemapItem>, DbErr> {
        let rows = page
            .apply(
                Articles::find()
                    .filter(Self::published(language))
                    .order_by_desc(articles::Column::UpdatedAt),
            )
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|a| ArticleSitemapItem {
                slug: a.slug,
                updated_at: a.updated_at,
            })
            .collect())
    }

    pub async fn search(
        db: &DatabaseConnection,
        language: Language,
        query: &str,
        published_only: bool,
    ) -> Result<Vec<ArticleDetail>, DbErr> {
        let condition = if published_only {
            Self::published(language)
        } else {
            Condition::all().add(articles::Column::Language.eq(language))
        };

        let rows = Articles::find()
            .filter(condition)
            .filter(
                Condition::any()
                    .add(contains_insensitive((Articles, articles::Column::Title), query))
                    .add(contains_insensitive((Articles, articles::Column::Slug), query)),
            )
            .order_by_desc(articles::Column::UpdatedAt)
            .limit(SEARCH_LIMIT)
            .all(db)
            .await?;
        Self::assemble(db, rows).await
    }

    // ==================== 统计 ====================

    pub async fn count_published(
        db: &DatabaseConnection,
        language: Option<Language>,
    ) -> Result<u64, DbErr> {
        let mut query = Articles::find().filter(articles::Column::Status.eq(Status::Published));
        if let Some(language) = language {
            query = query.filter(articles::Column::Language.eq(language));
        }
        query.count(db).await
    }

    pub async fn count_all(db: &DatabaseConnection, language: Language) -> Result<u64, DbErr> {
        Articles::find()
            .filter(articles::Column::Language.eq(language))
            .count(db)
            .await
    }

    // ==================== 写操作 ====================

    pub async fn create(
        db: &DatabaseConnection,
        language: Language,
        fields: ArticleFields,
    ) -> Result<articles::Model, DbErr> {
        let txn = db.begin().await?;
        let now = now_millis();

        let translation = article_translations::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let article = Self::insert_row(&txn, language, &translation.id, &fields, now).await?;
        Self::link_relations(&txn, &article.id, &fields).await?;

        txn.commit().await?;
        log::info!("已创建文章 {} ({})", article.slug, article.id);
        Ok(article)
    }

    pub async fn translate(
        db: &DatabaseConnection,
        translation_id: &str,
        language: Language,
        fields: ArticleFields,
    ) -> Result<Translated<articles::Model>, DbErr> {
        let txn = db.begin().await?;

        if ArticleTranslations::find_by_id(translation_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Ok(Translated::GroupNotFound);
        }
        let taken = Articles::find()
            .filter(articles::Column::ArticleTranslationId.eq(translation_id))
            .filter(articles::Column::Language.eq(language))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Ok(Translated::LanguageTaken);
        }

        let now = now_millis();
        let article = Self::insert_row(&txn, language, translation_id, &fields, now).await?;
        Self::link_relations(&txn, &article.id, &fields).await?;
        article_translations::ActiveModel {
            id: Set(translation_id.to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;
        Ok(Translated::Created(article))
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        slug: &str,
        fields: ArticleFields,
    ) -> Result<Option<articles::Model>, DbErr> {
        let txn = db.begin().await?;

        let Some(existing) = Articles::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let derived = DerivedContent::from_fields(&fields);
        let mut active: articles::ActiveModel = existing.into();
        active.title = Set(fields.title.clone());
        active.slug = Set(slugify(slug));
        active.content = Set(fields.content.clone());
        active.excerpt = Set(derived.excerpt);
        active.meta_title = Set(Some(derived.meta_title));
        active.meta_description = Set(Some(derived.meta_description));
        active.status = Set(fields.status);
        active.featured_image_id = Set(fields.featured_image_id.clone());
        active.updated_at = Set(now_millis());
        let article = active.update(&txn).await?;

        Self::unlink_relations(&txn, id).await?;
        Self::link_relations(&txn, id, &fields).await?;

        txn.commit().await?;
        Ok(Some(article))
    }

    /// 删除文章及其关联行与评论；翻译分组为空时一并删除
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        let Some(existing) = Articles::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        Self::unlink_relations(&txn, id).await?;
        ArticleComments::delete_many()
            .filter(article_comments::Column::ArticleId.eq(id))
            .exec(&txn)
            .await?;
        Articles::delete_by_id(id).exec(&txn).await?;

        let translation_id = existing.article_translation_id.as_str();
        let remaining = Articles::find()
            .filter(articles::Column::ArticleTranslationId.eq(translation_id))
            .count(&txn)
            .await?;
        if remaining == 0 {
            ArticleTranslations::delete_by_id(translation_id)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        log::info!("已删除文章 {} ({})", existing.slug, id);
        Ok(true)
    }

    // ==================== 内部辅助 ====================

    async fn insert_row<C>(
        conn: &C,
        language: Language,
        translation_id: &str,
        fields: &ArticleFields,
        now: i64,
    ) -> Result<articles::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let slug = unique_slug::<Articles, _>(conn, articles::Column::Slug, &fields.title).await?;
        let derived = DerivedContent::from_fields(fields);

        articles::ActiveModel {
            id: Set(new_id()),
            language: Set(language),
            title: Set(fields.title.clone()),
            slug: Set(slug),
            content: Set(fields.content.clone()),
            excerpt: Set(derived.excerpt),
            meta_title: Set(Some(derived.meta_title)),
            meta_description: Set(Some(derived.meta_description)),
            status: Set(fields.status),
            article_translation_id: Set(translation_id.to_string()),
            featured_image_id: Set(fields.featured_image_id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }

    async fn link_relations<C>(
        conn: &C,
        article_id: &str,
        fields: &ArticleFields,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let topic_rows: Vec<_> = dedup_ids(&fields.topics)
            .into_iter()
            .map(|topic_id| article_topics::ActiveModel {
                article_id: Set(article_id.to_string()),
                topic_id: Set(topic_id),
            })
            .collect();
        if !topic_rows.is_empty() {
            ArticleTopics::insert_many(topic_rows)
                .exec_without_returning(conn)
                .await?;
        }

        let author_rows: Vec<_> = dedup_ids(&fields.authors)
            .into_iter()
            .map(|user_id| article_authors::ActiveModel {
                article_id: Set(article_id.to_string()),
                user_id: Set(user_id),
            })
            .collect();
        if !author_rows.is_empty() {
            ArticleAuthors::insert_many(author_rows)
                .exec_without_returning(conn)
                .await?;
        }

        Ok(())
    }

    async fn unlink_relations<C>(conn: &C, article_id: &str) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        ArticleTopics::delete_many()
            .filter(article_topics::Column::ArticleId.eq(article_id))
            .exec(conn)
            .await?;
        ArticleAuthors::delete_many()
            .filter(article_authors::Column::ArticleId.eq(article_id))
            .exec(conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_is_generated_from_content() {
        let fields: ArticleFields = serde_json::from_value(serde_json::json!({
            "title": "Cara Install GIMP",
            "content": "<h2>Langkah</h2><p>Unduh installer lalu jalankan.</p>",
            "featuredImageId": "m1",
            "topics": ["t1"],
        }))
        .unwrap();

        let derived = DerivedContent::from_fields(&fields);
        assert_eq!(derived.excerpt, "Langkah Unduh installer lalu jalankan.");
        assert_eq!(derived.meta_title, "Cara Install GIMP");
        assert_eq!(derived.meta_description, derived.excerpt);
    }
}
