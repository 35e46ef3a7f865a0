//! 下载实体
//!
//! downloads 表保存某一语言下的应用/游戏介绍页。
//! 文件、话题与作者通过关联表连接，翻译版本通过 download_translation_id 分组。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DownloadSchemaJson, DownloadType, Language, Status};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "downloads")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub language: Language,

    // === 内容 ===
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

    // === 软件信息 ===
    pub developer: String,
    pub operating_system: String,
    pub license: String,
    pub official_website: String,
    pub schema_type: DownloadSchemaJson,
    pub r#type: DownloadType,
    pub currency: String,
    pub price: String,

    pub status: Status,
    pub download_translation_id: String,
    pub featured_image_id: String,

    // === 时间戳（毫秒）===
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::download_translations::Entity",
        from = "Column::DownloadTranslationId",
        to = "super::download_translations::Column::Id"
    )]
    DownloadTranslations,
    #[sea_orm(
        belongs_to = "super::medias::Entity",
        from = "Column::FeaturedImageId",
        to = "super::medias::Column::Id"
    )]
    Medias,
    #[sea_orm(has_many = "super::download_comments::Entity")]
    DownloadComments,
    #[sea_orm(has_many = "super::download_topics::Entity")]
    DownloadTopics,
    #[sea_orm(has_many = "super::download_authors::Entity")]
    DownloadAuthors,
    #[sea_orm(has_many = "super::download_download_files::Entity")]
    DownloadDownloadFiles,
}

impl Related<super::download_translations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DownloadTranslations.def()
    }
}

impl Related<super::medias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medias.def()
    }
}

impl Related<super::download_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DownloadComments.def()
    }
}

// === 多对多（经由关联表）===

impl Related<super::topics::Entity> for Entity {
    fn to() -> RelationDef {
        super::download_topics::Relation::Topics.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::download_topics::Relation::Downloads.def().rev())
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::download_authors::Relation::Users.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::download_authors::Relation::Downloads.def().rev())
    }
}

impl Related<super::download_files::Entity> for Entity {
    fn to() -> RelationDef {
        super::download_download_files::Relation::DownloadFiles.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::download_download_files::Relation::Downloads.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
