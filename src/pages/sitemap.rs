//! 站点地图
//!
//! `/sitemap.xml` 列出各语言的入口页以及按 1000 条分页的子站点地图，
//! `/sitemap/{download,article}[/en]/{page}` 列出已发布内容的地址。

use std::fmt::Write as _;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::DateTime;

use super::seo::locale_path;
use crate::AppState;
use crate::config::SiteConfig;
use crate::database::pagination::OffsetInput;
use crate::database::repository::articles_repository::ArticlesRepository;
use crate::database::repository::downloads_repository::DownloadsRepository;
use crate::entity::sea_orm_active_enums::Language;
use crate::error::{ApiError, ApiResult};
use crate::utils::{now_millis, text::xml_escape};

/// 每个子站点地图的条目数
pub const PER_SITEMAP: u64 = 1000;

/// XML 响应
pub struct Xml(pub String);

impl IntoResponse for Xml {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
            self.0,
        )
            .into_response()
    }
}

/// 站点地图中的一个地址
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: i64,
}

fn date(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 生成 `<urlset>` 文档
pub fn render_urlset(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        let _ = writeln!(
            xml,
            "<url>\n<loc>{}</loc>\n<lastmod>{}</lastmod>\n</url>",
            xml_escape(&entry.loc),
            date(entry.last_modified)
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// 子站点地图的路径前缀，印尼语不带语言段
fn sitemap_prefix(kind: &str, language: Language) -> String {
    match language {
        Language::Id => format!("/sitemap/{kind}"),
        Language::En => format!("/sitemap/{kind}/en"),
    }
}

/// 站点地图索引的全部条目
pub fn index_entries(
    site: &SiteConfig,
    article_counts: &[(Language, u64)],
    download_counts: &[(Language, u64)],
    today: i64,
) -> Vec<SitemapEntry> {
    let mut entries = Vec::new();

    for language in Language::ALL {
        for route in ["", "/article", "/download"] {
            entries.push(SitemapEntry {
                loc: site.url(&locale_path(language, route)),
                last_modified: today,
            });
        }
    }

    for (kind, counts) in [("article", article_counts), ("download", download_counts)] {
        for &(language, count) in counts {
            let pages = count.div_ceil(PER_SITEMAP);
            let prefix = sitemap_prefix(kind, language);
            for page in 1..=pages {
                entries.push(SitemapEntry {
                    loc: site.url(&format!("{prefix}/{page}")),
                    last_modified: today,
                });
            }
        }
    }

    entries
}

pub async fn index(State(state): State<AppState>) -> ApiResult<Xml> {
    let mut article_counts = Vec::new();
    let mut download_counts = Vec::new();
    for language in Language::ALL {
        article_counts.push((
            language,
            ArticlesRepository::count_published(&state.db, Some(language)).await?,
        ));
        download_counts.push((
            language,
            DownloadsRepository::count_published(&state.db, Some(language)).await?,
        ));
    }

    let entries = index_entries(&state.site, &article_counts, &download_counts, now_millis());
    Ok(Xml(render_urlset(&entries)))
}

fn parse_page(value: &str) -> ApiResult<OffsetInput> {
    value
        .parse::<u64>()
        .ok()
        .filter(|page| *page >= 1)
        .map(|page| OffsetInput::new(page, PER_SITEMAP))
        .ok_or_else(|| ApiError::not_found("Sitemap"))
}

async fn downloads(state: &AppState, language: Language, page: &str) -> ApiResult<Xml> {
    let page = parse_page(page)?;
    let entries: Vec<SitemapEntry> = DownloadsRepository::find_sitemap(&state.db, language, page)
        .await?
        .into_iter()
        .map(|item| SitemapEntry {
            loc: state.site.url(&locale_path(
                language,
                &format!("/download/{}/{}", item.r#type.as_str(), item.slug),
            )),
            last_modified: item.updated_at,
        })
        .collect();
    Ok(Xml(render_urlset(&entries)))
}

async fn articles(state: &AppState, language: Language, page: &str) -> ApiResult<Xml> {
    let page = parse_page(page)?;
    let entries: Vec<SitemapEntry> = ArticlesRepository::find_sitemap(&state.db, language, page)
        .await?
        .into_iter()
        .map(|item| SitemapEntry {
            loc: state
                .site
                .url(&locale_path(language, &format!("/article/{}", item.slug))),
            last_modified: item.updated_at,
        })
        .collect();
    Ok(Xml(render_urlset(&entries)))
}

pub async fn downloads_id(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<Xml> {
    downloads(&state, Language::Id, &page).await
}

pub async fn downloads_en(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<Xml> {
    downloads(&state, Language::En, &page).await
}

pub async fn articles_id(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<Xml> {
    articles(&state, Language::Id, &page).await
}

pub async fn articles_en(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<Xml> {
    articles(&state, Language::En, &page).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_has_one_entry_per_thousand_rows() {
        let site = SiteConfig::default();
        let entries = index_entries(
            &site,
            &[(Language::Id, 0), (Language::En, 1)],
            &[(Language::Id, 2001), (Language::En, 1000)],
            0,
        );
        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();

        // 两种语言各 3 个入口页
        assert!(locs.contains(&"http://localhost:3000/id"));
        assert!(locs.contains(&"http://localhost:3000/en/download"));
        assert!(locs.contains(&"http://localhost:3000/sitemap/article/en/1"));
        assert!(!locs.iter().any(|l| l.starts_with("http://localhost:3000/sitemap/article/1")));
        assert!(locs.contains(&"http://localhost:3000/sitemap/download/3"));
        assert!(!locs.contains(&"http://localhost:3000/sitemap/download/4"));
        assert!(locs.contains(&"http://localhost:3000/sitemap/download/en/1"));
        assert!(!locs.contains(&"http://localhost:3000/sitemap/download/en/2"));
        assert_eq!(entries.len(), 6 + 1 + 3 + 1);
    }

    #[test]
    fn urlset_escapes_locations() {
        let xml = render_urlset(&[SitemapEntry {
            loc: "http://localhost:3000/id/article/a&b".into(),
            last_modified: 0,
        }]);
        assert!(xml.contains("<loc>http://localhost:3000/id/article/a&amp;b</loc>"));
        assert!(xml.contains("<lastmod>1970-01-01</lastmod>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn page_must_be_positive_number() {
        assert!(parse_page("0").is_err());
        assert!(parse_page("abc").is_err());
        assert_eq!(parse_page("2").unwrap().offset(), 1000);
    }
}
