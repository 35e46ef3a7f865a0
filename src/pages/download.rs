//! 下载相关页面：列表、类型、搜索、话题、详情、版本与下载中页面

use axum::extract::{Path, Query, State};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use super::seo::{self, Metadata};
use super::{Locale, Page, PageResponse, Resolved, ads_at};
use crate::AppState;
use crate::database::pagination::{CursorInput, CursorPage, OffsetInput};
use crate::database::repository::download_files_repository::DownloadFilesRepository;
use crate::database::repository::downloads_repository::{DownloadDetail, DownloadsRepository};
use crate::database::repository::settings_repository::SettingsRepository;
use crate::database::repository::topics_repository::{TopicDetail, TopicsRepository};
use crate::entity::sea_orm_active_enums::{AdPosition, DownloadType, Language, Status};
use crate::entity::{ads, download_files};
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Download";
/// 详情页相关下载的数量
const RELATED_LIMIT: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct TypeParams {
    r#type: String,
}

#[derive(Debug, Deserialize)]
pub struct SlugParams {
    slug: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    r#type: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
pub struct VersionParams {
    r#type: String,
    slug: String,
    version_slug: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadListData {
    pub downloads: Vec<DownloadDetail>,
    pub ads: Vec<ads::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadSearchData {
    pub query: String,
    pub downloads: Vec<DownloadDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTopicData {
    pub topic: TopicDetail,
    pub downloads: CursorPage<DownloadDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailAds {
    pub above_content: Vec<ads::Model>,
    pub middle_content: Vec<ads::Model>,
    pub below_content: Vec<ads::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDetailData {
    pub download: DownloadDetail,
    pub related: CursorPage<DownloadDetail>,
    pub ads: DetailAds,
}

/// 版本页与下载中页面
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFileData {
    pub download: DownloadDetail,
    pub download_file: download_files::Model,
    pub ads: Vec<ads::Model>,
}

fn parse_type(value: &str) -> ApiResult<DownloadType> {
    DownloadType::parse(value).ok_or_else(|| ApiError::not_found("Page"))
}

fn type_title(download_type: DownloadType) -> &'static str {
    match download_type {
        DownloadType::App => "Download App",
        DownloadType::Game => "Download Game",
    }
}

/// 按 slug 查找已发布的下载，语言不一致时找出当前语言的翻译版本
pub(crate) async fn resolve_download(
    db: &DatabaseConnection,
    locale: Language,
    download_type: DownloadType,
    slug: &str,
) -> ApiResult<Resolved<DownloadDetail>> {
    let detail = DownloadsRepository::find_detail_by_slug(db, slug)
        .await?
        .filter(|d| d.download.status == Status::Published && d.download.r#type == download_type)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    if detail.download.language == locale {
        return Ok(Resolved::Current(detail));
    }

    let sibling = DownloadsRepository::find_translation(db, &detail.download.download_translation_id)
        .await?
        .and_then(|group| group.in_language(locale).cloned())
        .filter(|d| d.download.status == Status::Published)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Resolved::Sibling {
        from: detail,
        to: sibling,
    })
}

fn find_file<'a>(detail: &'a DownloadDetail, version_slug: &str) -> Option<&'a download_files::Model> {
    detail
        .download_files
        .iter()
        .find(|f| f.version_slug == version_slug)
}

// ==================== 列表页 ====================

pub async fn index(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> ApiResult<PageResponse<DownloadListData>> {
    let setting = SettingsRepository::site_setting(&state.db).await?;
    let downloads =
        DownloadsRepository::find_published(&state.db, locale, None, OffsetInput::default())
            .await?;
    let ads = ads_at(&state.db, AdPosition::DownloadBelowHeader).await?;

    let metadata = Metadata::new(
        &state.site,
        locale,
        "Download",
        setting.meta_description(),
        &seo::locale_path(locale, "/download"),
    );
    Ok(Page::new(metadata, DownloadListData { downloads, ads }).into())
}

pub async fn by_type(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(params): Path<TypeParams>,
) -> ApiResult<PageResponse<DownloadListData>> {
    let download_type = parse_type(&params.r#type)?;
    let downloads = DownloadsRepository::find_published(
        &state.db,
        locale,
        Some(download_type),
        OffsetInput::default(),
    )
    .await?;
    let ads = ads_at(&state.db, AdPosition::DownloadBelowHeader).await?;

    let title = type_title(download_type);
    let metadata = Metadata::new(
        &state.site,
        locale,
        title,
        format!("{} {}", state.site.site_title, title),
        &seo::locale_path(locale, &format!("/download/{}", download_type.as_str())),
    );
    Ok(Page::new(metadata, DownloadListData { downloads, ads }).into())
}

pub async fn search(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Query(params): Query<SearchParams>,
) -> ApiResult<PageResponse<DownloadSearchData>> {
    let query = params.q.unwrap_or_default().trim().to_string();
    let downloads = if query.is_empty() {
        Vec::new()
    } else {
        DownloadsRepository::search(&state.db, locale, &query, true).await?
    };

    let metadata = Metadata::new(
        &state.site,
        locale,
        "Search Download",
        format!("{} Search Download", state.site.site_title),
        &seo::locale_path(locale, "/download/search"),
    );
    Ok(Page::new(metadata, DownloadSearchData { query, downloads }).into())
}

/// 话题页：话题信息与其下第一页下载
pub async fn topic(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(params): Path<SlugParams>,
) -> ApiResult<PageResponse<DownloadTopicData>> {
    let topic = TopicsRepository::find_by_slug(&state.db, &params.slug)
        .await?
        .filter(|t| t.topic.status == Status::Published)
        .ok_or_else(|| ApiError::not_found("Topic"))?;

    if topic.topic.language != locale {
        let sibling = TopicsRepository::find_translation(&state.db, &topic.topic.topic_translation_id)
            .await?
            .and_then(|group| group.in_language(locale).map(|t| t.topic.slug.clone()))
            .ok_or_else(|| ApiError::not_found("Topic"))?;
        return Ok(PageResponse::Redirect(seo::locale_path(
            locale,
            &format!("/download/topic/{sibling}"),
        )));
    }

    let downloads = DownloadsRepository::find_by_topic_cursor(
        &state.db,
        locale,
        &topic.topic.id,
        &CursorInput::default(),
    )
    .await?;

    let title = topic
        .topic
        .meta_title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| topic.topic.title.clone());
    let description = topic
        .topic
        .meta_description
        .clone()
        .or_else(|| topic.topic.description.clone())
        .unwrap_or_default();
    let image = topic.featured_image.as_ref().map(|m| m.url.as_str());
    let metadata = Metadata::new(
        &state.site,
        locale,
        title,
        description,
        &seo::locale_path(locale, &format!("/download/topic/{}", topic.topic.slug)),
    )
    .with_image(image);

    Ok(Page::new(metadata, DownloadTopicData { topic, downloads }).into())
}

// ==================== 详情页 ====================

pub async fn detail(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(params): Path<DetailParams>,
) -> ApiResult<PageResponse<DownloadDetailData>> {
    let download_type = parse_type(&params.r#type)?;
    let detail = match resolve_download(&state.db, locale, download_type, &params.slug).await? {
        Resolved::Current(detail) => detail,
        Resolved::Sibling { to, .. } => {
            return Ok(PageResponse::Redirect(seo::locale_path(
                locale,
                &format!("/download/{}/{}", download_type.as_str(), to.download.slug),
            )));
        }
    };

    let related = match detail.topics.first() {
        Some(topic) => {
            DownloadsRepository::find_related_cursor(
                &state.db,
                locale,
                &topic.id,
                &detail.download.id,
                &CursorInput {
                    limit: Some(RELATED_LIMIT),
                    cursor: None,
                },
            )
            .await?
        }
        None => CursorPage {
            items: Vec::new(),
            next_cursor: None,
        },
    };
    let ads = DetailAds {
        above_content: ads_at(&state.db, AdPosition::SingleDownloadAboveContent).await?,
        middle_content: ads_at(&state.db, AdPosition::SingleDownloadMiddleContent).await?,
        below_content: ads_at(&state.db, AdPosition::SingleDownloadBelowContent).await?,
    };

    let site = &state.site;
    let path = seo::locale_path(
        locale,
        &format!("/download/{}/{}", download_type.as_str(), detail.download.slug),
    );
    let title = seo::download_title(locale, &detail);
    let description = seo::download_description(&detail).to_string();
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
            detail.download.created_at,
            detail.download.updated_at,
        ),
        seo::software_app_json_ld(&detail),
        seo::download_breadcrumb(site, locale, &detail),
    ];

    let data = DownloadDetailData {
        download: detail,
        related,
        ads,
    };
    Ok(Page::new(metadata, data).with_json_ld(json_ld).into())
}

/// 版本页查找结果
enum FileLookup {
    Found(DownloadDetail, download_files::Model),
    Redirect(String),
}

/// 版本页与下载中页面共用：解析下载与文件，必要时重定向
async fn resolve_file(
    db: &DatabaseConnection,
    locale: Language,
    params: &VersionParams,
    suffix: &str,
) -> ApiResult<FileLookup> {
    let download_type = parse_type(&params.r#type)?;
    match resolve_download(db, locale, download_type, &params.slug).await? {
        Resolved::Current(detail) => {
            let file = find_file(&detail, &params.version_slug)
                .cloned()
                .ok_or_else(|| ApiError::not_found("Download file"))?;
            Ok(FileLookup::Found(detail, file))
        }
        Resolved::Sibling { from, to } => {
            // 两个语言版本都必须有同一 versionSlug 的文件
            if find_file(&from, &params.version_slug).is_none() {
                return Err(ApiError::not_found("Download file"));
            }
            let file = find_file(&to, &params.version_slug)
                .ok_or_else(|| ApiError::not_found("Download file"))?;
            Ok(FileLookup::Redirect(seo::locale_path(
                locale,
                &format!(
                    "/download/{}/{}/{}{}",
                    download_type.as_str(),
                    to.download.slug,
                    file.version_slug,
                    suffix
                ),
            )))
        }
    }
}

fn file_page(
    state: &AppState,
    locale: Language,
    detail: DownloadDetail,
    file: download_files::Model,
    ads: Vec<ads::Model>,
) -> Page<DownloadFileData> {
    let site = &state.site;
    let path = seo::locale_path(
        locale,
        &format!(
            "/download/{}/{}/{}",
            detail.download.r#type.as_str(),
            detail.download.slug,
            file.version_slug
        ),
    );
    let title = seo::download_version_title(locale, &detail, &file);
    let description = seo::download_description(&detail).to_string();
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
            detail.download.created_at,
            file.updated_at,
        ),
        seo::software_app_json_ld(&detail),
        seo::download_breadcrumb(site, locale, &detail),
    ];

    let data = DownloadFileData {
        download: detail,
        download_file: file,
        ads,
    };
    Page::new(metadata, data).with_json_ld(json_ld)
}

pub async fn version(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(params): Path<VersionParams>,
) -> ApiResult<PageResponse<DownloadFileData>> {
    let (detail, file) = match resolve_file(&state.db, locale, &params, "").await? {
        FileLookup::Found(detail, file) => (detail, file),
        FileLookup::Redirect(to) => return Ok(PageResponse::Redirect(to)),
    };
    let mut ads = ads_at(&state.db, AdPosition::SingleDownloadAboveContent).await?;
    ads.extend(ads_at(&state.db, AdPosition::SingleDownloadBelowContent).await?);

    Ok(file_page(&state, locale, detail, file, ads).into())
}

/// 下载中页面：记录一次下载
pub async fn downloading(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(params): Path<VersionParams>,
) -> ApiResult<PageResponse<DownloadFileData>> {
    let (detail, mut file) =
        match resolve_file(&state.db, locale, &params, "/downloading").await? {
            FileLookup::Found(detail, file) => (detail, file),
            FileLookup::Redirect(to) => return Ok(PageResponse::Redirect(to)),
        };

    if DownloadFilesRepository::increment_views(&state.db, &file.id).await? {
        file.views += 1;
    }
    let ads = ads_at(&state.db, AdPosition::DownloadingPage).await?;

    Ok(file_page(&state, locale, detail, file, ads).into())
}
