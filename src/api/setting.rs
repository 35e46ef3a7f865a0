//! `setting.*` 与 `log.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, ValidatedJson};
use crate::AppState;
use crate::database::dto::{SetLogLevelInput, UpsertSettingInput};
use crate::database::repository::settings_repository::SettingsRepository;
use crate::entity::settings;
use crate::error::{ApiError, ApiResult};
use crate::utils::logs::{LogLevel, get_log_level, set_log_level};

pub async fn by_key(
    State(state): State<AppState>,
    Json(key): Json<String>,
) -> ApiResult<Json<settings::Model>> {
    SettingsRepository::find_by_key(&state.db, &key)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Setting"))
}

pub async fn upsert(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpsertSettingInput>,
) -> ApiResult<Json<settings::Model>> {
    let setting = SettingsRepository::upsert(&state.db, &input.key, input.value).await?;
    log::info!("设置 {} 已更新", input.key);
    Ok(Json(setting))
}

// ==================== 日志级别（运行时调整，不持久化） ====================

pub async fn get_level(_admin: AdminUser) -> Json<LogLevel> {
    Json(get_log_level())
}

pub async fn set_level(
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<SetLogLevelInput>,
) -> Json<LogLevel> {
    set_log_level(input.level);
    Json(get_log_level())
}
