//! 文章实体

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Language, Status};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub language: Language,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    #[sea_orm(nullable)]
    pub meta_title: Option<String>,
    #[sea_orm(nullable)]
    pub meta_description: Option<String>,
    pub status: Status,
    pub article_translation_id: String,
    pub featured_image_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::article_translations::Entity",
        from = "Column::ArticleTranslationId",
        to = "super::article_translations::Column::Id"
    )]
    ArticleTranslations,
    #[sea_orm(
        belongs_to = "super::medias::Entity",
        from = "Column::FeaturedImageId",
        to = "super::medias::Column::Id"
    )]
    Medias,
    #[sea_orm(has_many = "super::article_comments::Entity")]
    ArticleComments,
    #[sea_orm(has_many = "super::article_topics::Entity")]
    ArticleTopics,
    #[sea_orm(has_many = "super::article_authors::Entity")]
    ArticleAuthors,
}

impl Related<super::article_translations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleTranslations.def()
    }
}

impl Related<super::medias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medias.def()
    }
}

impl Related<super::article_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleComments.def()
    }
}

impl Related<super::topics::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_topics::Relation::Topics.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_topics::Relation::Articles.def().rev())
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_authors::Relation::Users.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_authors::Relation::Articles.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
