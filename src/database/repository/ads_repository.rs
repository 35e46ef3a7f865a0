//! 广告数据仓库

use sea_orm::*;

use crate::database::dto::AdFields;
use crate::database::pagination::OffsetInput;
use crate::entity::ads;
use crate::entity::prelude::*;
use crate::entity::sea_orm_active_enums::AdPosition;
use crate::utils::{new_id, now_millis};

/// 广告数据仓库
pub struct AdsRepository;

impl AdsRepository {
    pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<ads::Model>, DbErr> {
        Ads::find_by_id(id).one(db).await
    }

    pub async fn find_dashboard(
        db: &DatabaseConnection,
        page: OffsetInput,
    ) -> Result<Vec<ads::Model>, DbErr> {
        page.apply(Ads::find().order_by_desc(ads::Column::CreatedAt))
            .all(db)
            .await
    }

    /// 某位置上所有启用的广告
    pub async fn find_by_position(
        db: &DatabaseConnection,
        position: AdPosition,
    ) -> Result<Vec<ads::Model>, DbErr> {
        Ads::find()
            .filter(ads::Column::Position.eq(position))
            .filter(ads::Column::Active.eq(true))
            .order_by_desc(ads::Column::UpdatedAt)
            .all(db)
            .await
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Ads::find().count(db).await
    }

    pub async fn create(db: &DatabaseConnection, fields: AdFields) -> Result<ads::Model, DbErr> {
        let now = now_millis();
        ads::ActiveModel {
            id: Set(new_id()),
            title: Set(fields.title),
            content: Set(fields.content),
            position: Set(fields.position),
            r#type: Set(fields.r#type),
            active: Set(fields.active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        fields: AdFields,
    ) -> Result<Option<ads::Model>, DbErr> {
        let Some(existing) = Self::find_by_id(db, id).await? else {
            return Ok(None);
        };

        let mut active: ads::ActiveModel = existing.into();
        active.title = Set(fields.title);
        active.content = Set(fields.content);
        active.position = Set(fields.position);
        active.r#type = Set(fields.r#type);
        active.active = Set(fields.active);
        active.updated_at = Set(now_millis());
        Ok(Some(active.update(db).await?))
    }

    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        let result = Ads::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}
