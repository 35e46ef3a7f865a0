//! 页面路由
//!
//! `GET /{locale}/...` 返回页面模型：渲染所需的数据、SEO 元数据与 JSON-LD。
//! 语言不匹配时按翻译分组重定向到对应语言的版本，找不到则返回 404。
//! 站点地图以 XML 返回。

pub mod article;
pub mod dashboard;
pub mod download;
pub mod home;
pub mod seo;
pub mod sitemap;

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::AppState;
use crate::database::repository::ads_repository::AdsRepository;
use crate::entity::ads;
use crate::entity::sea_orm_active_enums::{AdPosition, Language};
use crate::error::{ApiError, ApiResult};

use self::seo::Metadata;

/// 页面模型
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub metadata: Metadata,
    pub json_ld: Vec<serde_json::Value>,
    pub data: T,
}

impl<T> Page<T> {
    pub fn new(metadata: Metadata, data: T) -> Self {
        Self {
            metadata,
            json_ld: Vec::new(),
            data,
        }
    }

    pub fn with_json_ld(mut self, json_ld: Vec<serde_json::Value>) -> Self {
        self.json_ld = json_ld;
        self
    }
}

/// 页面响应：渲染或临时重定向（307）
#[derive(Debug)]
pub enum PageResponse<T> {
    Render(Page<T>),
    Redirect(String),
}

impl<T: Serialize> IntoResponse for PageResponse<T> {
    fn into_response(self) -> Response {
        match self {
            PageResponse::Render(page) => Json(page).into_response(),
            PageResponse::Redirect(to) => Redirect::temporary(&to).into_response(),
        }
    }
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        PageResponse::Render(page)
    }
}

/// 按 slug 查到的内容与当前语言的关系
pub(crate) enum Resolved<T> {
    /// 语言与路径一致
    Current(T),
    /// 语言不一致，`to` 为当前语言的翻译版本
    Sibling { from: T, to: T },
}

/// 路径中的 `{locale}` 参数，未知语言返回 404
#[derive(Debug, Clone, Copy)]
pub struct Locale(pub Language);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found("Page"))?;

        params
            .get("locale")
            .and_then(|value| Language::parse(value))
            .map(Locale)
            .ok_or_else(|| ApiError::not_found("Page"))
    }
}

/// 某位置上启用的广告
pub(crate) async fn ads_at(
    db: &DatabaseConnection,
    position: AdPosition,
) -> ApiResult<Vec<ads::Model>> {
    Ok(AdsRepository::find_by_position(db, position).await?)
}

async fn root() -> Redirect {
    Redirect::temporary(&seo::locale_path(Language::default(), "/"))
}

/// 所有页面路由
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        // ==================== 站点地图 ====================
        .route("/sitemap.xml", get(sitemap::index))
        .route("/sitemap/download/{page}", get(sitemap::downloads_id))
        .route("/sitemap/download/en/{page}", get(sitemap::downloads_en))
        .route("/sitemap/article/{page}", get(sitemap::articles_id))
        .route("/sitemap/article/en/{page}", get(sitemap::articles_en))
        // ==================== 前台 ====================
        .route("/{locale}", get(home::home))
        .route("/{locale}/download", get(download::index))
        .route("/{locale}/download/search", get(download::search))
        .route("/{locale}/download/topic/{slug}", get(download::topic))
        .route("/{locale}/download/{type}", get(download::by_type))
        .route("/{locale}/download/{type}/{slug}", get(download::detail))
        .route(
            "/{locale}/download/{type}/{slug}/{version_slug}",
            get(download::version),
        )
        .route(
            "/{locale}/download/{type}/{slug}/{version_slug}/downloading",
            get(download::downloading),
        )
        .route("/{locale}/article", get(article::index))
        .route("/{locale}/article/{slug}", get(article::detail))
        // ==================== 后台表单 ====================
        .route("/{locale}/dashboard/download/edit/{id}", get(dashboard::edit_download))
        .route(
            "/{locale}/dashboard/download/translate/{language}/{translation_id}",
            get(dashboard::translate_download),
        )
        .route("/{locale}/dashboard/topic/edit/{id}", get(dashboard::edit_topic))
        .route(
            "/{locale}/dashboard/topic/translate/{language}/{translation_id}",
            get(dashboard::translate_topic),
        )
        .route("/{locale}/dashboard/article/edit/{id}", get(dashboard::edit_article))
        .route(
            "/{locale}/dashboard/article/translate/{language}/{translation_id}",
            get(dashboard::translate_article),
        )
}
