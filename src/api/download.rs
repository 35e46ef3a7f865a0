//! `download.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, ValidatedJson};
use super::{Counts, translated};
use crate::AppState;
use crate::database::dto::{
    CreateDownloadInput, DownloadBySlugInput, DownloadByTypeInput, DownloadCursorInput,
    DownloadPageInput, DownloadRelatedInput, LanguageInput, LanguagePageInput, LanguageSearchInput,
    TopicCursorInput, TranslateDownloadInput, UpdateDownloadInput,
};
use crate::database::pagination::{CursorPage, OffsetInput};
use crate::database::repository::downloads_repository::{
    DownloadDashboardItem, DownloadDetail, DownloadSitemapItem, DownloadTranslationGroup,
    DownloadsRepository,
};
use crate::entity::downloads;
use crate::entity::sea_orm_active_enums::{Language, Status};
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Download";

// ==================== 查询 ====================

pub async fn translation_by_id(
    State(state): State<AppState>,
    Json(id): Json<String>,
) -> ApiResult<Json<DownloadTranslationGroup>> {
    DownloadsRepository::find_translation(&state.db, &id)
        .await?
        .map(DownloadTranslationGroup::published)
        .filter(|group| !group.downloads.is_empty())
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Download translation"))
}

pub async fn by_id(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<DownloadDetail>> {
    DownloadsRepository::find_detail_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// 按 slug 查询，文件列表可分页
pub async fn by_slug(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<DownloadBySlugInput>,
) -> ApiResult<Json<DownloadDetail>> {
    let mut detail = DownloadsRepository::find_detail_by_slug(&state.db, &input.slug)
        .await?
        .filter(|d| d.download.status == Status::Published)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    if let Some(per_page) = input.download_file_per_page {
        let page = OffsetInput::new(input.download_file_page.unwrap_or(1), per_page);
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.per_page).unwrap_or(usize::MAX);
        detail.download_files = detail
            .download_files
            .into_iter()
            .skip(skip)
            .take(take)
            .collect();
    }

    Ok(Json(detail))
}

pub async fn by_language(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<DownloadPageInput>,
) -> ApiResult<Json<Vec<DownloadDetail>>> {
    let rows =
        DownloadsRepository::find_published(&state.db, input.language, input.r#type, input.page)
            .await?;
    Ok(Json(rows))
}

pub async fn by_language_infinite(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<DownloadCursorInput>,
) -> ApiResult<Json<CursorPage<DownloadDetail>>> {
    let page = DownloadsRepository::find_published_cursor(
        &state.db,
        input.language,
        input.r#type,
        &input.cursor,
    )
    .await?;
    Ok(Json(page))
}

pub async fn related_infinite(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<DownloadRelatedInput>,
) -> ApiResult<Json<CursorPage<DownloadDetail>>> {
    let page = DownloadsRepository::find_related_cursor(
        &state.db,
        input.language,
        &input.topic_id,
        &input.current_download_id,
        &input.cursor,
    )
    .await?;
    Ok(Json(page))
}

pub async fn by_topic_id_infinite(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TopicCursorInput>,
) -> ApiResult<Json<CursorPage<DownloadDetail>>> {
    let page = DownloadsRepository::find_by_topic_cursor(
        &state.db,
        input.language,
        &input.topic_id,
        &input.cursor,
    )
    .await?;
    Ok(Json(page))
}

pub async fn by_type(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<DownloadByTypeInput>,
) -> ApiResult<Json<Vec<DownloadDetail>>> {
    let rows = DownloadsRepository::find_published(
        &state.db,
        input.language,
        Some(input.r#type),
        input.page,
    )
    .await?;
    Ok(Json(rows))
}

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<DownloadPageInput>,
) -> ApiResult<Json<Vec<DownloadDashboardItem>>> {
    let rows =
        DownloadsRepository::find_dashboard(&state.db, input.language, input.r#type, input.page)
            .await?;
    Ok(Json(rows))
}

pub async fn sitemap(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguagePageInput>,
) -> ApiResult<Json<Vec<DownloadSitemapItem>>> {
    let rows = DownloadsRepository::find_sitemap(&state.db, input.language, input.page).await?;
    Ok(Json(rows))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(DownloadsRepository::count_published(&state.db, None).await?))
}

pub async fn count_by_language(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguageInput>,
) -> ApiResult<Json<u64>> {
    let count = DownloadsRepository::count_published(&state.db, Some(input.language)).await?;
    Ok(Json(count))
}

pub async fn count_dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Counts>> {
    Ok(Json(Counts {
        id: DownloadsRepository::count_all(&state.db, Language::Id).await?,
        en: DownloadsRepository::count_all(&state.db, Language::En).await?,
    }))
}

pub async fn search(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguageSearchInput>,
) -> ApiResult<Json<Vec<DownloadDetail>>> {
    let rows =
        DownloadsRepository::search(&state.db, input.language, &input.search_query, true).await?;
    Ok(Json(rows))
}

pub async fn search_dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<LanguageSearchInput>,
) -> ApiResult<Json<Vec<DownloadDetail>>> {
    let rows =
        DownloadsRepository::search(&state.db, input.language, &input.search_query, false).await?;
    Ok(Json(rows))
}

// ==================== 写操作 ====================

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateDownloadInput>,
) -> ApiResult<Json<downloads::Model>> {
    let download = DownloadsRepository::create(&state.db, input.language, input.fields).await?;
    Ok(Json(download))
}

pub async fn translate(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<TranslateDownloadInput>,
) -> ApiResult<Json<downloads::Model>> {
    let outcome = DownloadsRepository::translate(
        &state.db,
        &input.download_translation_id,
        input.language,
        input.fields,
    )
    .await?;
    translated(outcome, "Download", input.language).map(Json)
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateDownloadInput>,
) -> ApiResult<Json<downloads::Model>> {
    DownloadsRepository::update(&state.db, &input.id, &input.slug, input.fields)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if DownloadsRepository::delete(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
