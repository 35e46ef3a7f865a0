//! 话题实体
//!
//! 话题同时用于下载和文章分类，public 可见性的已发布话题才会出现在前台。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Language, Status, TopicType, TopicVisibility};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "topics")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub language: Language,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub r#type: TopicType,
    pub status: Status,
    pub visibility: TopicVisibility,
    #[sea_orm(nullable)]
    pub meta_title: Option<String>,
    #[sea_orm(nullable)]
    pub meta_description: Option<String>,
    pub topic_translation_id: String,
    #[sea_orm(nullable)]
    pub featured_image_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::topic_translations::Entity",
        from = "Column::TopicTranslationId",
        to = "super::topic_translations::Column::Id"
    )]
    TopicTranslations,
    #[sea_orm(
        belongs_to = "super::medias::Entity",
        from = "Column::FeaturedImageId",
        to = "super::medias::Column::Id"
    )]
    Medias,
    #[sea_orm(has_many = "super::download_topics::Entity")]
    DownloadTopics,
    #[sea_orm(has_many = "super::article_topics::Entity")]
    ArticleTopics,
}

impl Related<super::topic_translations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TopicTranslations.def()
    }
}

impl Related<super::medias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medias.def()
    }
}

impl Related<super::downloads::Entity> for Entity {
    fn to() -> RelationDef {
        super::download_topics::Relation::Downloads.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::download_topics::Relation::Topics.def().rev())
    }
}

impl Related<super::articles::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_topics::Relation::Articles.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_topics::Relation::Topics.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
