//! SEO 元数据与 schema.org JSON-LD
//!
//! 页面模型中的 `metadata` 对应 `<head>` 中的 title、description、canonical、
//! Open Graph 与 Twitter 卡片；`jsonLd` 中每个元素是一个独立的 JSON-LD 块。

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::SiteConfig;
use crate::database::repository::downloads_repository::DownloadDetail;
use crate::entity::download_files;
use crate::entity::sea_orm_active_enums::Language;

/// Open Graph 图片的固定尺寸
const OG_IMAGE_WIDTH: u32 = 1280;
const OG_IMAGE_HEIGHT: u32 = 720;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub open_graph: OpenGraph,
    pub twitter: Twitter,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub images: Vec<OgImage>,
    pub locale: Language,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Twitter {
    pub title: String,
    pub card: String,
    pub images: Vec<String>,
}

impl Metadata {
    /// 基础元数据：Open Graph 与正文标题一致，没有图片
    pub fn new(
        site: &SiteConfig,
        locale: Language,
        title: impl Into<String>,
        description: impl Into<String>,
        path: &str,
    ) -> Self {
        let title = title.into();
        let description = description.into();
        let canonical = site.url(path);

        Self {
            open_graph: OpenGraph {
                title: title.clone(),
                description: description.clone(),
                url: canonical.clone(),
                images: Vec::new(),
                locale,
            },
            twitter: Twitter {
                title: site.x_username.clone(),
                card: "summary_large_image".into(),
                images: Vec::new(),
            },
            title,
            description,
            canonical,
        }
    }

    /// 附加封面图（Open Graph 与 Twitter 共用）
    pub fn with_image(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.open_graph.images = vec![OgImage {
                url: url.to_string(),
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
            }];
            self.twitter.images = vec![url.to_string()];
        }
        self
    }
}

/// 站内路径统一带上语言前缀
pub fn locale_path(locale: Language, path: &str) -> String {
    if path.is_empty() || path == "/" {
        format!("/{}", locale.as_str())
    } else {
        format!("/{}{}", locale.as_str(), path)
    }
}

/// 毫秒时间戳转 ISO 8601
pub fn iso_date(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

// ==================== 下载页标题 ====================

fn download_name(detail: &DownloadDetail) -> &str {
    detail
        .download
        .meta_title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&detail.download.title)
}

pub fn download_description(detail: &DownloadDetail) -> &str {
    detail
        .download
        .meta_description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(&detail.download.excerpt)
}

/// 详情页标题
pub fn download_title(locale: Language, detail: &DownloadDetail) -> String {
    let name = download_name(detail);
    let os = &detail.download.operating_system;
    match locale {
        Language::Id => format!("Download {name} untuk {os} Versi Terbaru"),
        Language::En => format!("Download {name} for {os} Latest Version"),
    }
}

/// 版本页与下载中页面的标题
pub fn download_version_title(
    locale: Language,
    detail: &DownloadDetail,
    file: &download_files::Model,
) -> String {
    let name = download_name(detail);
    let os = &detail.download.operating_system;
    let version = &file.version;
    match locale {
        Language::Id => format!("Download {name} {version} untuk {os}"),
        Language::En => format!("Download {name} {version} for {os}"),
    }
}

// ==================== JSON-LD ====================

/// schema.org `Article`
pub fn article_json_ld(
    site: &SiteConfig,
    url: &str,
    title: &str,
    description: &str,
    image: Option<&str>,
    created_at: i64,
    updated_at: i64,
) -> Value {
    let logo = if site.logo_url.starts_with("http") {
        site.logo_url.clone()
    } else {
        site.url(&site.logo_url)
    };
    json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "mainEntityOfPage": { "@type": "WebPage", "@id": url },
        "headline": title,
        "description": description,
        "image": image.into_iter().collect::<Vec<_>>(),
        "datePublished": iso_date(created_at),
        "dateModified": iso_date(updated_at),
        "author": [{
            "@type": "Person",
            "name": site.site_title,
            "url": site.site_url,
        }],
        "publisher": {
            "@type": "Organization",
            "name": site.site_title,
            "logo": { "@type": "ImageObject", "url": logo },
        },
        "isAccessibleForFree": true,
    })
}

/// schema.org `SoftwareApplication`
pub fn software_app_json_ld(detail: &DownloadDetail) -> Value {
    let download = &detail.download;
    json!({
        "@context": "https://schema.org",
        "@type": "SoftwareApplication",
        "name": download_name(detail),
        "operatingSystem": download.operating_system,
        "applicationCategory": download.schema_type,
        "offers": {
            "@type": "Offer",
            "price": download.price,
            "priceCurrency": download.currency,
        },
        "aggregateRating": {
            "@type": "AggregateRating",
            "ratingValue": "4.9",
            "reviewCount": "5",
        },
    })
}

/// schema.org `BreadcrumbList`，`items` 为 (名称, 绝对地址)
pub fn breadcrumb_json_ld(items: &[(String, String)]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(index, (name, item))| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": name,
                "item": item,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

/// schema.org `WebSite` 与站内搜索入口
pub fn search_box_json_ld(site: &SiteConfig, locale: Language) -> Value {
    let target = site.url(&locale_path(locale, "/download/search?q={search_term_string}"));
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "url": site.site_url,
        "potentialAction": [{
            "@type": "SearchAction",
            "target": target,
            "query-input": "required name=search_term_string",
        }],
    })
}

/// 下载详情页的面包屑：站点 → 下载 → 类型 → 首个话题 → 当前下载
pub fn download_breadcrumb(site: &SiteConfig, locale: Language, detail: &DownloadDetail) -> Value {
    let download = &detail.download;
    let kind = download.r#type.as_str();

    let mut items = vec![
        (site.site_domain.clone(), site.site_url.clone()),
        ("Download".to_string(), site.url(&locale_path(locale, "/download"))),
        (
            kind.to_string(),
            site.url(&locale_path(locale, &format!("/download/{kind}"))),
        ),
    ];
    if let Some(topic) = detail.topics.first() {
        items.push((
            topic.title.clone(),
            site.url(&locale_path(locale, &format!("/download/topic/{}", topic.slug))),
        ));
    }
    items.push((
        download.title.clone(),
        site.url(&locale_path(
            locale,
            &format!("/download/{kind}/{}", download.slug),
        )),
    ));

    breadcrumb_json_ld(&items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::downloads;
    use crate::entity::sea_orm_active_enums::{DownloadSchemaJson, DownloadType, Status};

    fn detail(meta_title: Option<&str>) -> DownloadDetail {
        DownloadDetail {
            download: downloads::Model {
                id: "d1".into(),
                language: Language::Id,
                title: "Visual Studio Code".into(),
                slug: "visual-studio-code".into(),
                content: "<p>Editor</p>".into(),
                excerpt: "Editor".into(),
                meta_title: meta_title.map(str::to_string),
                meta_description: None,
                developer: "Microsoft".into(),
                operating_system: "Windows".into(),
                license: "Free".into(),
                official_website: "https://code.visualstudio.com".into(),
                schema_type: DownloadSchemaJson::DeveloperApp,
                r#type: DownloadType::App,
                currency: "USD".into(),
                price: "0".into(),
                status: Status::Published,
                download_translation_id: "t1".into(),
                featured_image_id: "m1".into(),
                created_at: 0,
                updated_at: 0,
            },
            featured_image: None,
            download_files: Vec::new(),
            topics: Vec::new(),
            authors: Vec::new(),
        }
    }

    #[test]
    fn download_title_depends_on_locale() {
        let detail = detail(Some("VS Code"));
        assert_eq!(
            download_title(Language::Id, &detail),
            "Download VS Code untuk Windows Versi Terbaru"
        );
        assert_eq!(
            download_title(Language::En, &detail),
            "Download VS Code for Windows Latest Version"
        );
    }

    #[test]
    fn download_title_falls_back_to_title() {
        let detail = detail(None);
        assert!(download_title(Language::Id, &detail).starts_with("Download Visual Studio Code "));
        assert_eq!(download_description(&detail), "Editor");
    }

    #[test]
    fn breadcrumb_skips_missing_topic() {
        let site = SiteConfig::default();
        let value = download_breadcrumb(&site, Language::Id, &detail(None));
        let items = value["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[3]["position"], 4);
        assert_eq!(
            items[3]["item"],
            "http://localhost:3000/id/download/app/visual-studio-code"
        );
    }

    #[test]
    fn metadata_image_fills_open_graph_and_twitter() {
        let site = SiteConfig::default();
        let metadata = Metadata::new(&site, Language::En, "Title", "Desc", "/en/download")
            .with_image(Some("https://cdn.test/a.png"));
        assert_eq!(metadata.canonical, "http://localhost:3000/en/download");
        assert_eq!(metadata.open_graph.images[0].width, 1280);
        assert_eq!(metadata.twitter.images, vec!["https://cdn.test/a.png".to_string()]);
        assert_eq!(metadata.twitter.card, "summary_large_image");
    }

    #[test]
    fn iso_date_formats_millis() {
        assert_eq!(iso_date(0), "1970-01-01T00:00:00.000Z");
    }
}
