//! 枚举列定义
//!
//! 所有枚举在 SQLite 中以文本形式存储，解码时遇到未知值会直接报错。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 内容语言（印尼语为默认语言）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[sea_orm(string_value = "id")]
    Id,
    #[sea_orm(string_value = "en")]
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Id, Language::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Id => "id",
            Language::En => "en",
        }
    }

    /// 另一种语言
    pub fn other(&self) -> Language {
        match self {
            Language::Id => Language::En,
            Language::En => Language::Id,
        }
    }

    pub fn parse(value: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.as_str() == value)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum DownloadType {
    #[default]
    #[sea_orm(string_value = "app")]
    App,
    #[sea_orm(string_value = "game")]
    Game,
}

impl DownloadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadType::App => "app",
            DownloadType::Game => "game",
        }
    }

    pub fn parse(value: &str) -> Option<DownloadType> {
        [DownloadType::App, DownloadType::Game]
            .into_iter()
            .find(|t| t.as_str() == value)
    }
}

/// schema.org 的 applicationCategory
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DownloadSchemaJson {
    #[sea_orm(string_value = "BusinessApp")]
    BusinessApp,
    #[sea_orm(string_value = "DesignApp")]
    DesignApp,
    #[sea_orm(string_value = "DeveloperApp")]
    DeveloperApp,
    #[default]
    #[sea_orm(string_value = "DownloadApp")]
    DownloadApp,
    #[sea_orm(string_value = "EducationalApp")]
    EducationalApp,
    #[sea_orm(string_value = "EntertainmentApp")]
    EntertainmentApp,
    #[sea_orm(string_value = "FinanceApp")]
    FinanceApp,
    #[sea_orm(string_value = "GameApp")]
    GameApp,
    #[sea_orm(string_value = "HealthApp")]
    HealthApp,
    #[sea_orm(string_value = "LifestyleApp")]
    LifestyleApp,
    #[sea_orm(string_value = "MultimediaApp")]
    MultimediaApp,
    #[sea_orm(string_value = "SecurityApp")]
    SecurityApp,
    #[sea_orm(string_value = "SocialNetworkingApp")]
    SocialNetworkingApp,
    #[sea_orm(string_value = "TravelApp")]
    TravelApp,
    #[sea_orm(string_value = "UtilitiesApp")]
    UtilitiesApp,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TopicType {
    #[default]
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "article")]
    Article,
    #[sea_orm(string_value = "review")]
    Review,
    #[sea_orm(string_value = "tutorial")]
    Tutorial,
    #[sea_orm(string_value = "movie")]
    Movie,
    #[sea_orm(string_value = "tv")]
    Tv,
    #[sea_orm(string_value = "game")]
    Game,
    #[sea_orm(string_value = "download")]
    Download,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TopicVisibility {
    #[default]
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "internal")]
    Internal,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "member")]
    Member,
    #[sea_orm(string_value = "author")]
    Author,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// 广告在页面上的插槽
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AdPosition {
    #[sea_orm(string_value = "home_below_header")]
    HomeBelowHeader,
    #[sea_orm(string_value = "article_below_header")]
    ArticleBelowHeader,
    #[sea_orm(string_value = "download_below_header")]
    DownloadBelowHeader,
    #[sea_orm(string_value = "single_article_above_content")]
    SingleArticleAboveContent,
    #[sea_orm(string_value = "single_article_middle_content")]
    SingleArticleMiddleContent,
    #[sea_orm(string_value = "single_article_below_content")]
    SingleArticleBelowContent,
    #[sea_orm(string_value = "single_article_pop_ups")]
    SingleArticlePopUps,
    #[sea_orm(string_value = "single_download_above_content")]
    SingleDownloadAboveContent,
    #[sea_orm(string_value = "single_download_middle_content")]
    SingleDownloadMiddleContent,
    #[sea_orm(string_value = "single_download_below_content")]
    SingleDownloadBelowContent,
    #[sea_orm(string_value = "single_download_pop_ups")]
    SingleDownloadPopUps,
    #[sea_orm(string_value = "downloading_page")]
    DownloadingPage,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AdType {
    #[default]
    #[sea_orm(string_value = "plain_ad")]
    PlainAd,
    #[sea_orm(string_value = "adsense")]
    Adsense,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "audio")]
    Audio,
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "document")]
    Document,
    #[sea_orm(string_value = "other")]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_other_is_symmetric() {
        for language in Language::ALL {
            assert_ne!(language, language.other());
            assert_eq!(language, language.other().other());
        }
    }

    #[test]
    fn language_serde_matches_db_value() {
        let json = serde_json::to_string(&Language::En).unwrap();
        assert_eq!(json, "\"en\"");
        assert_eq!(Language::parse("id"), Some(Language::Id));
        assert_eq!(Language::parse("fr"), None);
    }

    #[test]
    fn ad_position_uses_snake_case() {
        let json = serde_json::to_string(&AdPosition::SingleDownloadAboveContent).unwrap();
        assert_eq!(json, "\"single_download_above_content\"");
    }
}
