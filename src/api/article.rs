//! `article.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, ValidatedJson};
use super::translated;
use crate::AppState;
use crate::database::dto::{
    CreateArticleInput, LanguageCursorInput, LanguageInput, LanguagePageInput, LanguageSearchInput,
    SlugInput, TopicCursorInput, TranslateArticleInput, UpdateArticleInput,
};
use crate::database::pagination::CursorPage;
use crate::database::repository::articles_repository::{
    ArticleDashboardItem, ArticleDetail, ArticleSitemapItem, ArticleTranslationGroup,
    ArticlesRepository,
};
use crate::entity::articles;
use crate::entity::sea_orm_active_enums::Status;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Article";

pub async fn translation_by_id(
    State(state): State<AppState>,
    Json(id): Json<String>,
) -> ApiResult<Json<ArticleTranslationGroup>> {
    ArticlesRepository::find_translation(&state.db, &id)
        .await?
        .map(ArticleTranslationGroup::published)
        .filter(|group| !group.articles.is_empty())
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Article translation"))
}

pub async fn by_id(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<ArticleDetail>> {
    ArticlesRepository::find_detail_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn by_slug(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SlugInput>,
) -> ApiResult<Json<ArticleDetail>> {
    ArticlesRepository::find_detail_by_slug(&state.db, &input.slug)
        .await?
        .filter(|a| a.article.status == Status::Published)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn by_language(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguagePageInput>,
) -> ApiResult<Json<Vec<ArticleDetail>>> {
    Ok(Json(
        ArticlesRepository::find_published(&state.db, input.language, input.page).await?,
    ))
}

pub async fn by_language_infinite(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguageCursorInput>,
) -> ApiResult<Json<CursorPage<ArticleDetail>>> {
    let page =
        ArticlesRepository::find_published_cursor(&state.db, input.language, &input.cursor)
            .await?;
    Ok(Json(page))
}

pub async fn by_topic_id_infinite(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TopicCursorInput>,
) -> ApiResult<Json<CursorPage<ArticleDetail>>> {
    let page = ArticlesRepository::find_by_topic_cursor(
        &state.db,
        input.language,
        &input.topic_id,
        &input.cursor,
    )
    .await?;
    Ok(Json(page))
}

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<LanguagePageInput>,
) -> ApiResult<Json<Vec<ArticleDashboardItem>>> {
    Ok(Json(
        ArticlesRepository::find_dashboard(&state.db, input.language, input.page).await?,
    ))
}

pub async fn sitemap(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguagePageInput>,
) -> ApiResult<Json<Vec<ArticleSitemapItem>>> {
    Ok(Json(
        ArticlesRepository::find_sitemap(&state.db, input.language, input.page).await?,
    ))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(ArticlesRepository::count_published(&state.db, None).await?))
}

pub async fn count_by_language(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguageInput>,
) -> ApiResult<Json<u64>> {
    Ok(Json(
        ArticlesRepository::count_published(&state.db, Some(input.language)).await?,
    ))
}

pub async fn search(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LanguageSearchInput>,
) -> ApiResult<Json<Vec<ArticleDetail>>> {
    let rows =
        ArticlesRepository::search(&state.db, input.language, &input.search_query, true).await?;
    Ok(Json(rows))
}

pub async fn search_dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<LanguageSearchInput>,
) -> ApiResult<Json<Vec<ArticleDetail>>> {
    let rows =
        ArticlesRepository::search(&state.db, input.language, &input.search_query, false).await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateArticleInput>,
) -> ApiResult<Json<articles::Model>> {
    Ok(Json(
        ArticlesRepository::create(&state.db, input.language, input.fields).await?,
    ))
}

pub async fn translate(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<TranslateArticleInput>,
) -> ApiResult<Json<articles::Model>> {
    let outcome = ArticlesRepository::translate(
        &state.db,
        &input.article_translation_id,
        input.language,
        input.fields,
    )
    .await?;
    translated(outcome, "Article", input.language).map(Json)
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateArticleInput>,
) -> ApiResult<Json<articles::Model>> {
    ArticlesRepository::update(&state.db, &input.id, &input.slug, input.fields)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if ArticlesRepository::delete(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
