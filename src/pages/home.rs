//! 首页

use axum::extract::State;
use serde::Serialize;

use super::seo::{self, Metadata};
use super::{Locale, Page, PageResponse, ads_at};
use crate::AppState;
use crate::database::pagination::OffsetInput;
use crate::database::repository::articles_repository::{ArticleDetail, ArticlesRepository};
use crate::database::repository::downloads_repository::{DownloadDetail, DownloadsRepository};
use crate::database::repository::settings_repository::SettingsRepository;
use crate::entity::ads;
use crate::entity::sea_orm_active_enums::{AdPosition, DownloadType};
use crate::entity::site_setting::SiteSetting;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeData {
    pub setting: SiteSetting,
    pub downloads: Vec<DownloadDetail>,
    pub apps: Vec<DownloadDetail>,
    pub games: Vec<DownloadDetail>,
    pub articles: Vec<ArticleDetail>,
    pub ads: Vec<ads::Model>,
}

pub async fn home(
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> ApiResult<PageResponse<HomeData>> {
    let db = &state.db;
    let site = &state.site;
    let setting = SettingsRepository::site_setting(db).await?;
    let first_page = OffsetInput::default();

    let downloads = DownloadsRepository::find_published(db, locale, None, first_page).await?;
    let apps =
        DownloadsRepository::find_published(db, locale, Some(DownloadType::App), first_page)
            .await?;
    let games =
        DownloadsRepository::find_published(db, locale, Some(DownloadType::Game), first_page)
            .await?;
    let articles = ArticlesRepository::find_published(db, locale, first_page).await?;
    let ads = ads_at(db, AdPosition::HomeBelowHeader).await?;

    let site_title = if setting.site_title.is_empty() {
        site.site_title.as_str()
    } else {
        setting.site_title.as_str()
    };
    let title = match setting.site_tagline.as_deref().filter(|t| !t.is_empty()) {
        Some(tagline) => format!("{site_title} | {tagline}"),
        None => site_title.to_string(),
    };
    let metadata = Metadata::new(
        site,
        locale,
        title,
        setting.meta_description(),
        &seo::locale_path(locale, "/"),
    );
    let json_ld = vec![
        seo::breadcrumb_json_ld(&[(site.site_domain.clone(), site.site_url.clone())]),
        seo::search_box_json_ld(site, locale),
    ];

    let data = HomeData {
        setting,
        downloads,
        apps,
        games,
        articles,
        ads,
    };
    Ok(Page::new(metadata, data).with_json_ld(json_ld).into())
}
