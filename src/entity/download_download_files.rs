//! 下载 ↔ 下载文件 关联表

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "_download_download_files")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub download_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub download_file_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::downloads::Entity",
        from = "Column::DownloadId",
        to = "super::downloads::Column::Id"
    )]
    Downloads,
    #[sea_orm(
        belongs_to = "super::download_files::Entity",
        from = "Column::DownloadFileId",
        to = "super::download_files::Column::Id"
    )]
    DownloadFiles,
}

impl Related<super::downloads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Downloads.def()
    }
}

impl Related<super::download_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DownloadFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
