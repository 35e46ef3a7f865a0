//! RPC 过程
//!
//! 每个过程对应 `POST /api/<namespace>.<name>`，请求体为 JSON 输入，
//! 响应为 JSON 结果或 [`ApiError`] 错误体。访问级别由处理函数的提取器决定：
//! 无提取器为公开过程，[`extract::AuthUser`] 需要登录，[`extract::AdminUser`] 需要管理员。

pub mod ad;
pub mod article;
pub mod article_comment;
pub mod download;
pub mod download_comment;
pub mod download_file;
pub mod extract;
pub mod media;
pub mod setting;
pub mod topic;
pub mod user;

use std::time::Instant;

use axum::{Router, body::Body, http::Request, middleware::Next, response::Response, routing::post};
use serde::Serialize;

use crate::AppState;
use crate::database::repository::Translated;
use crate::entity::sea_orm_active_enums::Language;
use crate::error::{ApiError, ApiResult};

/// 按语言统计的数量
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Counts {
    pub id: u64,
    pub en: u64,
}

/// 将翻译结果转换为接口错误
pub(crate) fn translated<T>(outcome: Translated<T>, what: &str, language: Language) -> ApiResult<T> {
    match outcome {
        Translated::Created(row) => Ok(row),
        Translated::GroupNotFound => Err(ApiError::not_found(&format!("{what} translation"))),
        Translated::LanguageTaken => Err(ApiError::Conflict(format!(
            "{what} with language '{}' already exists in this translation",
            language.as_str()
        ))),
    }
}

/// 记录每个请求的方法、路径、状态码与耗时
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = started.elapsed().as_millis();
    if status.is_server_error() {
        log::error!("{} {} -> {} ({} ms)", method, path, status.as_u16(), elapsed);
    } else {
        log::info!("{} {} -> {} ({} ms)", method, path, status.as_u16(), elapsed);
    }
    response
}

/// 所有 RPC 过程的路由
pub fn router() -> Router<AppState> {
    Router::new()
        // ==================== 下载 ====================
        .route("/api/download.translationById", post(download::translation_by_id))
        .route("/api/download.byId", post(download::by_id))
        .route("/api/download.bySlug", post(download::by_slug))
        .route("/api/download.byLanguage", post(download::by_language))
        .route("/api/download.byLanguageInfinite", post(download::by_language_infinite))
        .route("/api/download.relatedInfinite", post(download::related_infinite))
        .route("/api/download.byTopicIdInfinite", post(download::by_topic_id_infinite))
        .route("/api/download.byType", post(download::by_type))
        .route("/api/download.dashboard", post(download::dashboard))
        .route("/api/download.sitemap", post(download::sitemap))
        .route("/api/download.count", post(download::count))
        .route("/api/download.countByLanguage", post(download::count_by_language))
        .route("/api/download.countDashboard", post(download::count_dashboard))
        .route("/api/download.search", post(download::search))
        .route("/api/download.searchDashboard", post(download::search_dashboard))
        .route("/api/download.create", post(download::create))
        .route("/api/download.translate", post(download::translate))
        .route("/api/download.update", post(download::update))
        .route("/api/download.delete", post(download::delete))
        // ==================== 下载文件 ====================
        .route("/api/downloadFile.all", post(download_file::all))
        .route("/api/downloadFile.dashboard", post(download_file::dashboard))
        .route("/api/downloadFile.byId", post(download_file::by_id))
        .route(
            "/api/downloadFile.byDownloadIdAndVersionSlug",
            post(download_file::by_download_id_and_version_slug),
        )
        .route("/api/downloadFile.sitemap", post(download_file::sitemap))
        .route("/api/downloadFile.count", post(download_file::count))
        .route("/api/downloadFile.search", post(download_file::search))
        .route("/api/downloadFile.create", post(download_file::create))
        .route("/api/downloadFile.update", post(download_file::update))
        .route("/api/downloadFile.delete", post(download_file::delete))
        .route("/api/downloadFile.incrementViews", post(download_file::increment_views))
        // ==================== 下载评论 ====================
        .route("/api/downloadComment.dashboard", post(download_comment::dashboard))
        .route("/api/downloadComment.byDownloadId", post(download_comment::by_download_id))
        .route(
            "/api/downloadComment.byDownloadIdInfinite",
            post(download_comment::by_download_id_infinite),
        )
        .route("/api/downloadComment.byId", post(download_comment::by_id))
        .route("/api/downloadComment.count", post(download_comment::count))
        .route(
            "/api/downloadComment.countByDownloadId",
            post(download_comment::count_by_download_id),
        )
        .route("/api/downloadComment.create", post(download_comment::create))
        .route("/api/downloadComment.update", post(download_comment::update))
        .route("/api/downloadComment.delete", post(download_comment::delete))
        .route("/api/downloadComment.updateByAdmin", post(download_comment::update_by_admin))
        .route("/api/downloadComment.deleteByAdmin", post(download_comment::delete_by_admin))
        // ==================== 话题 ====================
        .route("/api/topic.translationById", post(topic::translation_by_id))
        .route("/api/topic.byId", post(topic::by_id))
        .route("/api/topic.bySlug", post(topic::by_slug))
        .route("/api/topic.byLanguage", post(topic::by_language))
        .route("/api/topic.byType", post(topic::by_type))
        .route("/api/topic.dashboard", post(topic::dashboard))
        .route("/api/topic.search", post(topic::search))
        .route("/api/topic.count", post(topic::count))
        .route("/api/topic.countByLanguage", post(topic::count_by_language))
        .route("/api/topic.create", post(topic::create))
        .route("/api/topic.translate", post(topic::translate))
        .route("/api/topic.update", post(topic::update))
        .route("/api/topic.delete", post(topic::delete))
        // ==================== 文章 ====================
        .route("/api/article.translationById", post(article::translation_by_id))
        .route("/api/article.byId", post(article::by_id))
        .route("/api/article.bySlug", post(article::by_slug))
        .route("/api/article.byLanguage", post(article::by_language))
        .route("/api/article.byLanguageInfinite", post(article::by_language_infinite))
        .route("/api/article.byTopicIdInfinite", post(article::by_topic_id_infinite))
        .route("/api/article.dashboard", post(article::dashboard))
        .route("/api/article.sitemap", post(article::sitemap))
        .route("/api/article.count", post(article::count))
        .route("/api/article.countByLanguage", post(article::count_by_language))
        .route("/api/article.search", post(article::search))
        .route("/api/article.searchDashboard", post(article::search_dashboard))
        .route("/api/article.create", post(article::create))
        .route("/api/article.translate", post(article::translate))
        .route("/api/article.update", post(article::update))
        .route("/api/article.delete", post(article::delete))
        // ==================== 文章评论 ====================
        .route("/api/articleComment.dashboard", post(article_comment::dashboard))
        .route("/api/articleComment.byArticleId", post(article_comment::by_article_id))
        .route(
            "/api/articleComment.byArticleIdInfinite",
            post(article_comment::by_article_id_infinite),
        )
        .route("/api/articleComment.byId", post(article_comment::by_id))
        .route("/api/articleComment.count", post(article_comment::count))
        .route(
            "/api/articleComment.countByArticleId",
            post(article_comment::count_by_article_id),
        )
        .route("/api/articleComment.create", post(article_comment::create))
        .route("/api/articleComment.update", post(article_comment::update))
        .route("/api/articleComment.delete", post(article_comment::delete))
        .route("/api/articleComment.updateByAdmin", post(article_comment::update_by_admin))
        .route("/api/articleComment.deleteByAdmin", post(article_comment::delete_by_admin))
        // ==================== 媒体 ====================
        .route("/api/media.dashboard", post(media::dashboard))
        .route("/api/media.byId", post(media::by_id))
        .route("/api/media.byName", post(media::by_name))
        .route("/api/media.search", post(media::search))
        .route("/api/media.count", post(media::count))
        .route("/api/media.create", post(media::create))
        .route("/api/media.update", post(media::update))
        .route("/api/media.delete", post(media::delete))
        // ==================== 用户 ====================
        .route("/api/user.me", post(user::me))
        .route("/api/user.byId", post(user::by_id))
        .route("/api/user.byUsername", post(user::by_username))
        .route("/api/user.dashboard", post(user::dashboard))
        .route("/api/user.search", post(user::search))
        .route("/api/user.count", post(user::count))
        .route("/api/user.update", post(user::update))
        .route("/api/user.updateByAdmin", post(user::update_by_admin))
        .route("/api/user.delete", post(user::delete))
        // ==================== 广告 ====================
        .route("/api/ad.dashboard", post(ad::dashboard))
        .route("/api/ad.byId", post(ad::by_id))
        .route("/api/ad.byPosition", post(ad::by_position))
        .route("/api/ad.count", post(ad::count))
        .route("/api/ad.create", post(ad::create))
        .route("/api/ad.update", post(ad::update))
        .route("/api/ad.delete", post(ad::delete))
        // ==================== 设置与日志 ====================
        .route("/api/setting.byKey", post(setting::by_key))
        .route("/api/setting.upsert", post(setting::upsert))
        .route("/api/log.getLevel", post(setting::get_level))
        .route("/api/log.setLevel", post(setting::set_level))
}
