//! 下载文件实体
//!
//! 一个下载可以有多个版本文件，version_slug 用于版本页的 URL。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "download_files")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub title: String,
    pub version: String,
    pub version_slug: String,
    pub download_link: String,
    pub file_size: String,
    pub views: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::download_download_files::Entity")]
    DownloadDownloadFiles,
    #[sea_orm(has_many = "super::download_file_authors::Entity")]
    DownloadFileAuthors,
}

impl Related<super::downloads::Entity> for Entity {
    fn to() -> RelationDef {
        super::download_download_files::Relation::Downloads.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::download_download_files::Relation::DownloadFiles.def().rev())
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::download_file_authors::Relation::Users.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::download_file_authors::Relation::DownloadFiles.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
