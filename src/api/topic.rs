//! `topic.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, ValidatedJson};
use super::translated;
use crate::AppState;
use crate::database::dto::{
    CreateTopicInput, LanguageInput, LanguagePageInput, LanguageSearchInput, SlugInput,
    TopicByTypeInput, TranslateTopicInput, UpdateTopicInput,
};
use crate::database::repository::topics_repository::{
    TopicDashboardItem, TopicDetail, TopicTranslationGroup, TopicsRepository,
};
use crate::entity::sea_orm_active_enums::Status;
use crate::entity::topics;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Topic";

pub async fn translation_by_id(
    State(state): State<AppState>,
    Json(id): Json<String>,
) -> ApiResult<Json<TopicTranslationGroup>> {
    TopicsRepository::find_translation(&state.db, &id)
        .await?
        .map(TopicTranslationGroup::published)
        .filter(|group| !group.topics.is_empty())
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Topic translation"))
}

pub async fn by_id(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<TopicDetail>> {
    TopicsRepository::find_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn by_slug(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SlugInput>,
) -> ApiResult<Json<TopicDetail>> {
    TopicsRepository::find_by_slug(&state.db, &input.slug)
        .await?
        .filter(|t| t.topic.status == Status::Published)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn by_language(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguagePageInput>,
) -> ApiResult<Json<Vec<TopicDetail>>> {
    Ok(Json(
        TopicsRepository::find_public(&state.db, input.language, input.page).await?,
    ))
}

pub async fn by_type(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TopicByTypeInput>,
) -> ApiResult<Json<Vec<TopicDetail>>> {
    let rows =
        TopicsRepository::find_by_type(&state.db, input.language, input.r#type, input.page)
            .await?;
    Ok(Json(rows))
}

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<LanguagePageInput>,
) -> ApiResult<Json<Vec<TopicDashboardItem>>> {
    Ok(Json(
        TopicsRepository::find_dashboard(&state.db, input.language, input.page).await?,
    ))
}

pub async fn search(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguageSearchInput>,
) -> ApiResult<Json<Vec<topics::Model>>> {
    Ok(Json(
        TopicsRepository::search(&state.db, input.language, &input.search_query).await?,
    ))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(TopicsRepository::count_public(&state.db, None).await?))
}

pub async fn count_by_language(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguageInput>,
) -> ApiResult<Json<u64>> {
    Ok(Json(
        TopicsRepository::count_public(&state.db, Some(input.language)).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateTopicInput>,
) -> ApiResult<Json<topics::Model>> {
    Ok(Json(
        TopicsRepository::create(&state.db, input.language, input.fields).await?,
    ))
}

pub async fn translate(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<TranslateTopicInput>,
) -> ApiResult<Json<topics::Model>> {
    let outcome = TopicsRepository::translate(
        &state.db,
        &input.topic_translation_id,
        input.language,
        input.fields,
    )
    .await?;
    translated(outcome, "Topic", input.language).map(Json)
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateTopicInput>,
) -> ApiResult<Json<topics::Model>> {
    TopicsRepository::update(&state.db, &input.id, &input.slug, input.fields)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if TopicsRepository::delete(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
