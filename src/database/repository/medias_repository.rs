//! 媒体数据仓库
//!
//! 只保存媒体的 URL 与元数据，不处理文件上传。

use sea_orm::*;

use super::{contains_insensitive, non_empty, unique_slug};
use crate::database::dto::{CreateMediaInput, UpdateMediaInput};
use crate::database::pagination::OffsetInput;
use crate::entity::prelude::*;
use crate::entity::{articles, downloads, medias, topics};
use crate::utils::{new_id, now_millis};

const SEARCH_LIMIT: u64 = 10;

/// 删除媒体的结果
#[derive(Debug, PartialEq, Eq)]
pub enum MediaDeletion {
    Deleted,
    NotFound,
    /// 仍被用作封面
    InUse,
}

/// 媒体数据仓库
pub struct MediasRepository;

impl MediasRepository {
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<medias::Model>, DbErr> {
        Medias::find_by_id(id).one(db).await
    }

    pub async fn find_by_name(
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<Option<medias::Model>, DbErr> {
        Medias::find()
            .filter(medias::Column::Name.eq(name))
            .one(db)
            .await
    }

    pub async fn find_dashboard(
        db: &DatabaseConnection,
        page: OffsetInput,
    ) -> Result<Vec<medias::Model>, DbErr> {
        page.apply(Medias::find().order_by_desc(medias::Column::CreatedAt))
            .all(db)
            .await
    }

    pub async fn search(db: &DatabaseConnection, query: &str) -> Result<Vec<medias::Model>, DbErr> {
        Medias::find()
            .filter(contains_insensitive((Medias, medias::Column::Name), query))
            .order_by_desc(medias::Column::CreatedAt)
            .limit(SEARCH_LIMIT)
            .all(db)
            .await
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Medias::find().count(db).await
    }

    /// 新建媒体，名称转为 slug 并去重
    pub async fn create(
        db: &DatabaseConnection,
        author_id: &str,
        input: CreateMediaInput,
    ) -> Result<medias::Model, DbErr> {
        let name = unique_slug::<Medias, _>(db, medias::Column::Name, &input.name).await?;
        let now = now_millis();

        medias::ActiveModel {
            id: Set(new_id()),
            name: Set(name),
            url: Set(input.url),
            r#type: Set(input.r#type),
            description: Set(non_empty(input.description)),
            author_id: Set(Some(author_id.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    /// 部分更新；改名时同样去重
    pub async fn update(
        db: &DatabaseConnection,
        input: UpdateMediaInput,
    ) -> Result<Option<medias::Model>, DbErr> {
        let Some(existing) = Self::find_by_id(db, &input.id).await? else {
            return Ok(None);
        };

        let mut active: medias::ActiveModel = existing.clone().into();
        if let Some(name) = input.name {
            if crate::utils::text::slugify(&name) != existing.name {
                active.name = Set(unique_slug::<Medias, _>(db, medias::Column::Name, &name).await?);
            }
        }
        if let Some(description) = input.description {
            active.description = Set(non_empty(description));
        }
        if let Some(media_type) = input.r#type {
            active.r#type = Set(media_type);
        }
        active.updated_at = Set(now_millis());

        Ok(Some(active.update(db).await?))
    }

    /// 删除媒体；被下载、话题或文章引用为封面时拒绝
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<MediaDeletion, DbErr> {
        let txn = db.begin().await?;

        if Medias::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(MediaDeletion::NotFound);
        }

        let references = Downloads::find()
            .filter(downloads::Column::FeaturedImageId.eq(id))
            .count(&txn)
            .await?
            + Topics::find()
                .filter(topics::Column::FeaturedImageId.eq(id))
                .count(&txn)
                .await?
            + Articles::find()
                .filter(articles::Column::FeaturedImageId.eq(id))
                .count(&txn)
                .await?;
        if references > 0 {
            log::warn!("媒体 {} 仍被 {} 条内容引用，拒绝删除", id, references);
            return Ok(MediaDeletion::InUse);
        }

        Medias::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(MediaDeletion::Deleted)
    }
}
