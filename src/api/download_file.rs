//! `downloadFile.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, ValidatedJson};
use crate::AppState;
use crate::database::dto::{
    CreateDownloadFileInput, DownloadFileByVersionInput, PageInput, SearchInput,
    UpdateDownloadFileInput,
};
use crate::database::repository::download_files_repository::{
    DownloadFileDetail, DownloadFileSitemapItem, DownloadFilesRepository,
};
use crate::entity::download_files;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Download file";

pub async fn all(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> ApiResult<Json<Vec<download_files::Model>>> {
    Ok(Json(DownloadFilesRepository::find_page(&state.db, input.page).await?))
}

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> ApiResult<Json<Vec<DownloadFileDetail>>> {
    Ok(Json(
        DownloadFilesRepository::find_dashboard(&state.db, input.page).await?,
    ))
}

pub async fn by_id(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<DownloadFileDetail>> {
    DownloadFilesRepository::find_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn by_download_id_and_version_slug(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<DownloadFileByVersionInput>,
) -> ApiResult<Json<download_files::Model>> {
    DownloadFilesRepository::find_by_download_and_version(
        &state.db,
        &input.download_id,
        &input.version_slug,
    )
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn sitemap(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> ApiResult<Json<Vec<DownloadFileSitemapItem>>> {
    Ok(Json(
        DownloadFilesRepository::find_sitemap(&state.db, input.page).await?,
    ))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(DownloadFilesRepository::count(&state.db).await?))
}

pub async fn search(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SearchInput>,
) -> ApiResult<Json<Vec<download_files::Model>>> {
    Ok(Json(
        DownloadFilesRepository::search(&state.db, &input.search_query).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateDownloadFileInput>,
) -> ApiResult<Json<download_files::Model>> {
    Ok(Json(
        DownloadFilesRepository::create(&state.db, input.fields).await?,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateDownloadFileInput>,
) -> ApiResult<Json<download_files::Model>> {
    DownloadFilesRepository::update(&state.db, &input.id, input.fields)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if DownloadFilesRepository::delete(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}

/// 下载次数 +1，无需登录
pub async fn increment_views(
    State(state): State<AppState>,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if DownloadFilesRepository::increment_views(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
