//! `media.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, ValidatedJson};
use crate::AppState;
use crate::database::dto::{CreateMediaInput, PageInput, SearchInput, UpdateMediaInput};
use crate::database::repository::medias_repository::{MediaDeletion, MediasRepository};
use crate::entity::medias;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Media";

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> ApiResult<Json<Vec<medias::Model>>> {
    Ok(Json(MediasRepository::find_dashboard(&state.db, input.page).await?))
}

pub async fn by_id(
    State(state): State<AppState>,
    Json(id): Json<String>,
) -> ApiResult<Json<medias::Model>> {
    MediasRepository::find_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn by_name(
    State(state): State<AppState>,
    Json(name): Json<String>,
) -> ApiResult<Json<medias::Model>> {
    MediasRepository::find_by_name(&state.db, &name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn search(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<SearchInput>,
) -> ApiResult<Json<Vec<medias::Model>>> {
    Ok(Json(MediasRepository::search(&state.db, &input.search_query).await?))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(MediasRepository::count(&state.db).await?))
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateMediaInput>,
) -> ApiResult<Json<medias::Model>> {
    Ok(Json(MediasRepository::create(&state.db, &user.id, input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateMediaInput>,
) -> ApiResult<Json<medias::Model>> {
    MediasRepository::update(&state.db, input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// 仍被用作封面的媒体不能删除
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    match MediasRepository::delete(&state.db, &id).await? {
        MediaDeletion::Deleted => Ok(Json(true)),
        MediaDeletion::NotFound => Err(ApiError::not_found(NOT_FOUND)),
        MediaDeletion::InUse => Err(ApiError::Conflict(
            "Media is still used as a featured image".into(),
        )),
    }
}
