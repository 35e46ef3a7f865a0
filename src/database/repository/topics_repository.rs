//! 话题数据仓库
//!
//! 前台只展示 `published` 且 `public` 的话题；后台列表不做过滤。

use std::collections::HashMap;

use sea_orm::*;
use serde::Serialize;

use super::{Translated, TranslationSibling, contains_insensitive, non_empty, unique_slug};
use crate::database::dto::TopicFields;
use crate::database::pagination::OffsetInput;
use crate::entity::prelude::*;
use crate::entity::sea_orm_active_enums::{Language, Status, TopicType, TopicVisibility};
use crate::entity::{article_topics, download_topics, medias, topic_translations, topics};
use crate::utils::{new_id, now_millis, text::slugify};

const SEARCH_LIMIT: u64 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDetail {
    #[serde(flatten)]
    pub topic: topics::Model,
    pub featured_image: Option<medias::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicTranslationGroup {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub topics: Vec<TopicDetail>,
}

impl TopicTranslationGroup {
    /// 只保留已发布的版本
    pub fn published(mut self) -> Self {
        self.topics.retain(|d| d.topic.status == Status::Published);
        self
    }

    pub fn sibling(&self, current: Language) -> Option<&TopicDetail> {
        self.topics.iter().find(|t| t.topic.language != current)
    }

    pub fn in_language(&self, language: Language) -> Option<&TopicDetail> {
        self.topics.iter().find(|t| t.topic.language == language)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDashboardItem {
    #[serde(flatten)]
    pub topic: topics::Model,
    pub translations: Vec<TranslationSibling>,
}

/// 话题数据仓库
pub struct TopicsRepository;

impl TopicsRepository {
    async fn with_images<C>(conn: &C, rows: Vec<topics::Model>) -> Result<Vec<TopicDetail>, DbErr>
    where
        C: ConnectionTrait,
    {
        let images = rows.load_one(Medias, conn).await?;
        Ok(rows
            .into_iter()
            .zip(images)
            .map(|(topic, featured_image)| TopicDetail {
                topic,
                featured_image,
            })
            .collect())
    }

    /// 前台可见条件
    fn visible(language: Language) -> Condition {
        Condition::all()
            .add(topics::Column::Language.eq(language))
            .add(topics::Column::Status.eq(Status::Published))
            .add(topics::Column::Visibility.eq(TopicVisibility::Public))
    }

    // ==================== 查询操作 ====================

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<TopicDetail>, DbErr> {
        let rows = Topics::find_by_id(id).all(db).await?;
        Ok(Self::with_images(db, rows).await?.into_iter().next())
    }

    pub async fn find_by_slug(
        db: &DatabaseConnection,
        slug: &str,
    ) -> Result<Option<TopicDetail>, DbErr> {
        let rows = Topics::find()
            .filter(topics::Column::Slug.eq(slug))
            .all(db)
            .await?;
        Ok(Self::with_images(db, rows).await?.into_iter().next())
    }

    pub async fn find_translation(
        db: &DatabaseConnection,
        translation_id: &str,
    ) -> Result<Option<TopicTranslationGroup>, DbErr> {
        let Some(group) = TopicTranslations::find_by_id(translation_id).one(db).await? else {
            return Ok(None);
        };
        let rows = Topics::find()
            .filter(topics::Column::TopicTranslationId.eq(translation_id))
            .order_by_asc(topics::Column::Language)
            .all(db)
            .await?;

        Ok(Some(TopicTranslationGroup {
            id: group.id,
            created_at: group.created_at,
            updated_at: group.updated_at,
            topics: Self::with_images(db, rows).await?,
        }))
    }

    pub async fn find_in_translation(
        db: &DatabaseConnection,
        translation_id: &str,
        language: Language,
    ) -> Result<Option<topics::Model>, DbErr> {
        Topics::find()
            .filter(topics::Column::TopicTranslationId.eq(translation_id))
            .filter(topics::Column::Language.eq(language))
            .one(db)
            .await
    }

    /// 前台话题列表（偏移分页，按更新时间倒序）
    pub async fn find_public(
        db: &DatabaseConnection,
        language: Language,
        page: OffsetInput,
    ) -> Result<Vec<TopicDetail>, DbErr> {
        let rows = page
            .apply(
                Topics::find()
                    .filter(Self::visible(language))
                    .order_by_desc(topics::Column::UpdatedAt),
            )
            .all(db)
            .await?;
        Self::with_images(db, rows).await
    }

    pub async fn find_by_type(
        db: &DatabaseConnection,
        language: Language,
        topic_type: TopicType,
        page: OffsetInput,
    ) -> Result<Vec<TopicDetail>, DbErr> {
        let rows = page
            .apply(
                Topics::find()
                    .filter(Self::visible(language))
                    .filter(topics::Column::Type.eq(topic_type))
                    .order_by_desc(topics::Column::UpdatedAt),
            )
            .all(db)
            .await?;
        Self::with_images(db, rows).await
    }

    pub async fn find_dashboard(
        db: &DatabaseConnection,
        language: Language,
        page: OffsetInput,
    ) -> Result<Vec<TopicDashboardItem>, DbErr> {
        let rows = page
            .apply(
                Topics::find()
                    .filter(topics::Column::Language.eq(language))
                    .order_by_desc(topics::Column::UpdatedAt),
            )
            .all(db)
            .await?;

        let translation_ids: Vec<String> = rows
            .iter()
            .map(|t| t.topic_translation_id.clone())
            .collect();
        let mut siblings: HashMap<String, Vec<TranslationSibling>> = HashMap::new();
        for sibling in Topics::find()
            .filter(topics::Column::TopicTranslationId.is_in(translation_ids))
            .filter(topics::Column::Language.ne(language))
            .all(db)
            .await?
        {
            siblings
                .entry(sibling.topic_translation_id.clone())
                .or_default()
                .push(TranslationSibling {
                    id: sibling.id,
                    title: sibling.title,
                    language: sibling.language,
                });
        }

        Ok(rows
            .into_iter()
            .map(|topic| TopicDashboardItem {
                translations: siblings
                    .remove(&topic.topic_translation_id)
                    .unwrap_or_default(),
                topic,
            })
            .collect())
    }

    /// 前台搜索标题或 slug
    pub async fn search(
        db: &DatabaseConnection,
        language: Language,
        query: &str,
    ) -> Result<Vec<topics::Model>, DbErr> {
        Topics::find()
            .filter(Self::visible(language))
            .filter(
                Condition::any()
                    .add(contains_insensitive((Topics, topics::Column::Title), query))
                    .add(contains_insensitive((Topics, topics::Column::Slug), query)),
            )
            .order_by_desc(topics::Column::UpdatedAt)
            .limit(SEARCH_LIMIT)
            .all(db)
            .await
    }

    /// 前台可见话题数量；`language` 为空时统计全部语言
    pub async fn count_public(
        db: &DatabaseConnection,
        language: Option<Language>,
    ) -> Result<u64, DbErr> {
        let mut query = Topics::find()
            .filter(topics::Column::Status.eq(Status::Published))
            .filter(topics::Column::Visibility.eq(TopicVisibility::Public));
        if let Some(language) = language {
            query = query.filter(topics::Column::Language.eq(language));
        }
        query.count(db).await
    }

    // ==================== 写操作 ====================

    pub async fn create(
        db: &DatabaseConnection,
        language: Language,
        fields: TopicFields,
    ) -> Result<topics::Model, DbErr> {
        let txn = db.begin().await?;
        let now = now_millis();

        let translation = topic_translations::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        let topic = Self::insert_row(&txn, language, &translation.id, &fields, now).await?;

        txn.commit().await?;
        log::info!("已创建话题 {} ({})", topic.slug, topic.id);
        Ok(topic)
    }

    pub async fn translate(
        db: &DatabaseConnection,
        translation_id: &str,
        language: Language,
        fields: TopicFields,
    ) -> Result<Translated<topics::Model>, DbErr> {
        let txn = db.begin().await?;

        if TopicTranslations::find_by_id(translation_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Ok(Translated::GroupNotFound);
        }
        let taken = Topics::find()
            .filter(topics::Column::TopicTranslationId.eq(translation_id))
            .filter(topics::Column::Language.eq(language))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Ok(Translated::LanguageTaken);
        }

        let now = now_millis();
        let topic = Self::insert_row(&txn, language, translation_id, &fields, now).await?;
        topic_translations::ActiveModel {
            id: Set(translation_id.to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;
        Ok(Translated::Created(topic))
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        slug: &str,
        fields: TopicFields,
    ) -> Result<Option<topics::Model>, DbErr> {
        let Some(existing) = Topics::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut active: topics::ActiveModel = existing.into();
        active.title = Set(fields.title.clone());
        active.slug = Set(slugify(slug));
        active.description = Set(non_empty(fields.description.clone()));
        active.r#type = Set(fields.r#type);
        active.status = Set(fields.status);
        active.visibility = Set(fields.visibility);
        active.meta_title = Set(Some(Self::meta_title(&fields)));
        active.meta_description = Set(Self::meta_description(&fields));
        active.featured_image_id = Set(non_empty(fields.featured_image_id));
        active.updated_at = Set(now_millis());

        Ok(Some(active.update(db).await?))
    }

    /// 删除话题，并移除其与下载、文章的关联；翻译分组为空时一并删除
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        let Some(existing) = Topics::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        DownloadTopics::delete_many()
            .filter(download_topics::Column::TopicId.eq(id))
            .exec(&txn)
            .await?;
        ArticleTopics::delete_many()
            .filter(article_topics::Column::TopicId.eq(id))
            .exec(&txn)
            .await?;
        Topics::delete_by_id(id).exec(&txn).await?;

        let translation_id = existing.topic_translation_id.as_str();
        let remaining = Topics::find()
            .filter(topics::Column::TopicTranslationId.eq(translation_id))
            .count(&txn)
            .await?;
        if remaining == 0 {
            TopicTranslations::delete_by_id(translation_id)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        log::info!("已删除话题 {} ({})", existing.slug, id);
        Ok(true)
    }

    // ==================== 内部辅助 ====================

    fn meta_title(fields: &TopicFields) -> String {
        non_empty(fields.meta_title.clone()).unwrap_or_else(|| fields.title.clone())
    }

    fn meta_description(fields: &TopicFields) -> Option<String> {
        non_empty(fields.meta_description.clone()).or_else(|| non_empty(fields.description.clone()))
    }

    async fn insert_row<C>(
        conn: &C,
        language: Language,
        translation_id: &str,
        fields: &TopicFields,
        now: i64,
    ) -> Result<topics::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let slug = unique_slug::<Topics, _>(conn, topics::Column::Slug, &fields.title).await?;

        topics::ActiveModel {
            id: Set(new_id()),
            language: Set(language),
            title: Set(fields.title.clone()),
            slug: Set(slug),
            description: Set(non_empty(fields.description.clone())),
            r#type: Set(fields.r#type),
            status: Set(fields.status),
            visibility: Set(fields.visibility),
            meta_title: Set(Some(Self::meta_title(fields))),
            meta_description: Set(Self::meta_description(fields)),
            topic_translation_id: Set(translation_id.to_string()),
            featured_image_id: Set(non_empty(fields.featured_image_id.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> TopicFields {
        serde_json::from_value(serde_json::json!({
            "title": "Photo Editor",
            "description": "Tools for editing photos",
        }))
        .unwrap()
    }

    #[test]
    fn meta_fields_fall_back_to_title_and_description() {
        let f = fields();
        assert_eq!(TopicsRepository::meta_title(&f), "Photo Editor");
        assert_eq!(
            TopicsRepository::meta_description(&f).as_deref(),
            Some("Tools for editing photos")
        );
    }

    #[test]
    fn blank_meta_title_is_ignored() {
        let mut f = fields();
        f.meta_title = Some("   ".into());
        f.description = None;
        assert_eq!(TopicsRepository::meta_title(&f), "Photo Editor");
        assert_eq!(TopicsRepository::meta_description(&f), None);
    }
}
