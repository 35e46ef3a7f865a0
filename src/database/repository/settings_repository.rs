use crate::entity::prelude::*;
use crate::entity::settings;
use crate::entity::site_setting::{SettingValue, SiteSetting};
use crate::utils::{new_id, now_millis};
use sea_orm::*;

/// 站点设置仓库（key → JSON 值）
pub struct SettingsRepository;

impl SettingsRepository {
    /// 按 key 读取设置
    pub async fn find_by_key(
        db: &DatabaseConnection,
        key: &str,
    ) -> Result<Option<settings::Model>, DbErr> {
        Settings::find()
            .filter(settings::Column::Key.eq(key))
            .one(db)
            .await
    }

    /// 写入设置：key 不存在时插入，存在时覆盖值
    pub async fn upsert(
        db: &DatabaseConnection,
        key: &str,
        value: serde_json::Value,
    ) -> Result<settings::Model, DbErr> {
        let now = now_millis();

        match Self::find_by_key(db, key).await? {
            Some(existing) => {
                let mut active: settings::ActiveModel = existing.into();
                active.value = Set(SettingValue(value));
                active.updated_at = Set(now);
                active.update(db).await
            }
            None => {
                settings::ActiveModel {
                    id: Set(new_id()),
                    key: Set(key.to_string()),
                    value: Set(SettingValue(value)),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(db)
                .await
            }
        }
    }

    /// 站点信息；未配置时返回默认值
    pub async fn site_setting(db: &DatabaseConnection) -> Result<SiteSetting, DbErr> {
        Ok(Self::find_by_key(db, SiteSetting::KEY)
            .await?
            .map(|row| SiteSetting::from_value(&row.value))
            .unwrap_or_default())
    }
}
