//! `ad.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, ValidatedJson};
use crate::AppState;
use crate::database::dto::{AdByPositionInput, CreateAdInput, PageInput, UpdateAdInput};
use crate::database::repository::ads_repository::AdsRepository;
use crate::entity::ads;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Ad";

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> ApiResult<Json<Vec<ads::Model>>> {
    Ok(Json(AdsRepository::find_dashboard(&state.db, input.page).await?))
}

pub async fn by_id(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<ads::Model>> {
    AdsRepository::find_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// 某位置上启用的广告
pub async fn by_position(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<AdByPositionInput>,
) -> ApiResult<Json<Vec<ads::Model>>> {
    Ok(Json(AdsRepository::find_by_position(&state.db, input.position).await?))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(AdsRepository::count(&state.db).await?))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateAdInput>,
) -> ApiResult<Json<ads::Model>> {
    Ok(Json(AdsRepository::create(&state.db, input.fields).await?))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateAdInput>,
) -> ApiResult<Json<ads::Model>> {
    AdsRepository::update(&state.db, &input.id, input.fields)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if AdsRepository::delete(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
