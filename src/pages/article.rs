//! 文章页面

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use super::seo::{self, Metadata};
use super::{Locale, Page, PageResponse, ads_at};
use crate::AppState;
use crate::database::pagination::OffsetInput;
use crate::database::repository::articles_repository::{ArticleDetail, ArticlesRepository};
use crate::database::repository::settings_repository::SettingsRepository;
use crate::entity::ads;
use crate::entity::sea_orm_active_enums::{AdPosition, Status};
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Article";

#[derive(Debug, Deserialize)]
pub struct SlugParams {
    slug: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListData {
    pub articles: Vec<ArticleDetail>,
    pub ads: Vec<ads::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleAds {
    pub above_content: Vec<ads::Model>,
    pub middle_content: Vec<ads::Model>,
    pub below_content: Vec<ads::Model>,
    pub pop_ups: Vec<ads::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetailData {
    pub article: ArticleDetail,
    pub ads: ArticleAds,
}

pub async fn index(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> ApiResult<PageResponse<ArticleListData>> {
    let setting = SettingsRepository::site_setting(&state.db).await?;
    let articles =
        ArticlesRepository::find_published(&state.db, locale, OffsetInput::default()).await?;
    let ads = ads_at(&state.db, AdPosition::ArticleBelowHeader).await?;

    let metadata = Metadata::new(
        &state.site,
        locale,
        "Article",
        setting.meta_description(),
        &seo::locale_path(locale, "/article"),
    );
    Ok(Page::new(metadata, ArticleListData { articles, ads }).into())
}

pub async fn detail(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(params): Path<SlugParams>,
) -> ApiResult<PageResponse<ArticleDetailData>> {
    let db = &state.db;
    let detail = ArticlesRepository::find_detail_by_slug(db, &params.slug)
        .await?
        .filter(|a| a.article.status == Status::Published)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    if detail.article.language != locale {
        let sibling = ArticlesRepository::find_translation(db, &detail.article.article_translation_id)
            .await?
            .and_then(|group| {
                group
                    .in_language(locale)
                    .filter(|a| a.article.status == Status::Published)
                    .map(|a| a.article.slug.clone())
            })
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
        return Ok(PageResponse::Redirect(seo::locale_path(
            locale,
            &format!("/article/{sibling}"),
        )));
    }

    let ads = ArticleAds {
        above_content: ads_at(db, AdPosition::SingleArticleAboveContent).await?,
        middle_content: ads_at(db, AdPosition::SingleArticleMiddleContent).await?,
        below_content: ads_at(db, AdPosition::SingleArticleBelowContent).await?,
        pop_ups: ads_at(db, AdPosition::SingleArticlePopUps).await?,
    };

    let site = &state.site;
    let article = &detail.article;
    let path = seo::locale_path(locale, &format!("/article/{}", article.slug));
    let title = article
        .meta_title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| article.title.clone());
    let description = article
        .meta_description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| article.excerpt.clone());
    let image = detail.featured_image.as_ref().map(|m| m.url.clone());

    let metadata = Metadata::new(site, locale, title.clone(), description.clone(), &path)
        .with_image(image.as_deref());
    let json_ld = vec![
        seo::article_json_ld(
            site,
            &site.url(&path),
            &title,
            &description,
            image.as_deref(),
            article.created_at,
            article.updated_at,
        ),
        seo::breadcrumb_json_ld(&[
            (site.site_domain.clone(), site.site_url.clone()),
            ("Article".to_string(), site.url(&seo::locale_path(locale, "/article"))),
            (article.title.clone(), site.url(&path)),
        ]),
    ];

    let data = ArticleDetailData {
        article: detail,
        ads,
    };
    Ok(Page::new(metadata, data).with_json_ld(json_ld).into())
}
