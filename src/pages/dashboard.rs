//! 后台表单页面（仅管理员）
//!
//! 翻译页：目标语言的版本已存在时重定向到它的编辑页，
//! 否则返回以另一语言版本为初始值的表单数据。

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use super::seo::{self, Metadata};
use super::{Locale, Page, PageResponse};
use crate::AppState;
use crate::api::extract::AdminUser;
use crate::database::repository::articles_repository::{ArticleDetail, ArticlesRepository};
use crate::database::repository::downloads_repository::{DownloadDetail, DownloadsRepository};
use crate::database::repository::topics_repository::{TopicDetail, TopicsRepository};
use crate::entity::sea_orm_active_enums::Language;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct IdParams {
    id: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslateParams {
    language: String,
    translation_id: String,
}

/// 翻译表单
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateForm<T> {
    pub translation_id: String,
    pub language: Language,
    /// 另一语言的版本，作为表单初始值
    pub initial: Option<T>,
}

fn metadata(state: &AppState, locale: Language, title: &str, path: &str) -> Metadata {
    Metadata::new(&state.site, locale, title, title, &seo::locale_path(locale, path))
}

fn parse_language(value: &str) -> ApiResult<Language> {
    Language::parse(value).ok_or_else(|| ApiError::not_found("Page"))
}

fn edit_redirect(locale: Language, kind: &str, id: &str) -> String {
    seo::locale_path(locale, &format!("/dashboard/{kind}/edit/{id}"))
}

// ==================== 下载 ====================

pub async fn edit_download(
    State(state): State<AppState>,
    Locale(locale): Locale,
    _admin: AdminUser,
    Path(params): Path<IdParams>,
) -> ApiResult<PageResponse<DownloadDetail>> {
    let download = DownloadsRepository::find_detail_by_id(&state.db, &params.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Download"))?;

    let metadata = metadata(
        &state,
        locale,
        "Edit Download Dashboard",
        &format!("/dashboard/download/edit/{}", download.download.id),
    );
    Ok(Page::new(metadata, download).into())
}

pub async fn translate_download(
    State(state): State<AppState>,
    Locale(locale): Locale,
    _admin: AdminUser,
    Path(params): Path<TranslateParams>,
) -> ApiResult<PageResponse<TranslateForm<DownloadDetail>>> {
    let language = parse_language(&params.language)?;
    let group = DownloadsRepository::find_translation(&state.db, &params.translation_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Download translation"))?;

    if let Some(existing) = group.in_language(language) {
        return Ok(PageResponse::Redirect(edit_redirect(
            locale,
            "download",
            &existing.download.id,
        )));
    }

    let metadata = metadata(
        &state,
        locale,
        "Translate Download Dashboard",
        &format!("/dashboard/download/translate/{}/{}", language.as_str(), group.id),
    );
    let form = TranslateForm {
        initial: group.sibling(language).cloned(),
        translation_id: group.id,
        language,
    };
    Ok(Page::new(metadata, form).into())
}

// ==================== 话题 ====================

pub async fn edit_topic(
    State(state): State<AppState>,
    Locale(locale): Locale,
    _admin: AdminUser,
    Path(params): Path<IdParams>,
) -> ApiResult<PageResponse<TopicDetail>> {
    let topic = TopicsRepository::find_by_id(&state.db, &params.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Topic"))?;

    let metadata = metadata(
        &state,
        locale,
        "Edit Topic Dashboard",
        &format!("/dashboard/topic/edit/{}", topic.topic.id),
    );
    Ok(Page::new(metadata, topic).into())
}

pub async fn translate_topic(
    State(state): State<AppState>,
    Locale(locale): Locale,
    _admin: AdminUser,
    Path(params): Path<TranslateParams>,
) -> ApiResult<PageResponse<TranslateForm<TopicDetail>>> {
    let language = parse_language(&params.language)?;
    let group = TopicsRepository::find_translation(&state.db, &params.translation_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Topic translation"))?;

    if let Some(existing) = group.in_language(language) {
        return Ok(PageResponse::Redirect(edit_redirect(
            locale,
            "topic",
            &existing.topic.id,
        )));
    }

    let metadata = metadata(
        &state,
        locale,
        "Translate Topic Dashboard",
        &format!("/dashboard/topic/translate/{}/{}", language.as_str(), group.id),
    );
    let form = TranslateForm {
        initial: group.sibling(language).cloned(),
        translation_id: group.id,
        language,
    };
    Ok(Page::new(metadata, form).into())
}

// ==================== 文章 ====================

pub async fn edit_article(
    State(state): State<AppState>,
    Locale(locale): Locale,
    _admin: AdminUser,
    Path(params): Path<IdParams>,
) -> ApiResult<PageResponse<ArticleDetail>> {
    let article = ArticlesRepository::find_detail_by_id(&state.db, &params.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article"))?;

    let metadata = metadata(
        &state,
        locale,
        "Edit Article Dashboard",
        &format!("/dashboard/article/edit/{}", article.article.id),
    );
    Ok(Page::new(metadata, article).into())
}

pub async fn translate_article(
    State(state): State<AppState>,
    Locale(locale): Locale,
    _admin: AdminUser,
    Path(params): Path<TranslateParams>,
) -> ApiResult<PageResponse<TranslateForm<ArticleDetail>>> {
    let language = parse_language(&params.language)?;
    let group = ArticlesRepository::find_translation(&state.db, &params.translation_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article translation"))?;

    if let Some(existing) = group.in_language(language) {
        return Ok(PageResponse::Redirect(edit_redirect(
            locale,
            "article",
            &existing.article.id,
        )));
    }

    let metadata = metadata(
        &state,
        locale,
        "Translate Article Dashboard",
        &format!("/dashboard/article/translate/{}/{}", language.as_str(), group.id),
    );
    let form = TranslateForm {
        initial: group.sibling(language).cloned(),
        translation_id: group.id,
        language,
    };
    Ok(Page::new(metadata, form).into())
}
