//! 数据传输对象 (DTO)
//!
//! RPC 过程的输入结构。字段统一使用 camelCase，
//! 校验规则通过 `validator` 声明，由 `ValidatedJson` 提取器在进入处理函数前执行。

use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::database::pagination::{CursorInput, OffsetInput};
use crate::entity::sea_orm_active_enums::{
    AdPosition, AdType, DownloadSchemaJson, DownloadType, Language, MediaType, Status, TopicType,
    TopicVisibility, UserRole,
};
use crate::utils::logs::LogLevel;

/// 辅助函数：支持 Option<Option<T>> 的反序列化
/// 用于区分"未提供字段"和"显式设为 null"
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

// ==================== 通用查询参数 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInput {
    #[serde(default)]
    pub language: Language,
}

/// 按语言的偏移分页
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePageInput {
    #[serde(default)]
    pub language: Language,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: OffsetInput,
}

/// 不区分语言的偏移分页
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    #[serde(flatten)]
    #[validate(nested)]
    pub page: OffsetInput,
}

/// 按语言的游标分页
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCursorInput {
    #[serde(default)]
    pub language: Language,
    #[serde(flatten)]
    #[validate(nested)]
    pub cursor: CursorInput,
}

/// 按话题的游标分页（下载与文章共用）
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TopicCursorInput {
    #[serde(default)]
    pub language: Language,
    #[validate(length(min = 1, message = "Topic Id is required"))]
    pub topic_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub cursor: CursorInput,
}

/// 按语言搜索
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSearchInput {
    #[serde(default)]
    pub language: Language,
    #[validate(length(min = 1, message = "Search query is required"))]
    pub search_query: String,
}

/// 不区分语言的搜索
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    #[validate(length(min = 1, message = "Search query is required"))]
    pub search_query: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SlugInput {
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
}

// ==================== 下载 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBySlugInput {
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub download_file_page: Option<u64>,
    #[validate(range(min = 1, max = 1000, message = "perPage must be between 1 and 1000"))]
    pub download_file_per_page: Option<u64>,
}

/// 下载列表：byLanguage 与 dashboard 共用，type 可选
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadPageInput {
    #[serde(default)]
    pub language: Language,
    pub r#type: Option<DownloadType>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: OffsetInput,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadByTypeInput {
    #[serde(default)]
    pub language: Language,
    pub r#type: DownloadType,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: OffsetInput,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadCursorInput {
    #[serde(default)]
    pub language: Language,
    pub r#type: Option<DownloadType>,
    #[serde(flatten)]
    #[validate(nested)]
    pub cursor: CursorInput,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRelatedInput {
    #[serde(default)]
    pub language: Language,
    #[validate(length(min = 1, message = "Topic Id is required"))]
    pub topic_id: String,
    #[validate(length(min = 1, message = "Current Download Id is required"))]
    pub current_download_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub cursor: CursorInput,
}

/// 下载的可编辑字段（create / translate / update 共用）
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    #[validate(length(min = 1, message = "Developer is required"))]
    pub developer: String,
    #[validate(length(min = 1, message = "Operating System is required"))]
    pub operating_system: String,
    #[validate(length(min = 1, message = "License is required"))]
    pub license: String,
    #[validate(length(min = 1, message = "Official Website is required"))]
    pub official_website: String,
    #[serde(default)]
    pub schema_type: DownloadSchemaJson,
    #[serde(default)]
    pub r#type: DownloadType,
    #[validate(length(min = 1, message = "Currency is required"))]
    pub currency: String,
    #[validate(length(min = 1, message = "Price is required"))]
    pub price: String,
    #[serde(default)]
    pub status: Status,
    #[validate(length(min = 1, message = "Featured Image is required"))]
    pub featured_image_id: String,
    #[validate(length(min = 1, message = "Topic is required"))]
    pub topics: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub download_files: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDownloadInput {
    #[serde(default)]
    pub language: Language,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: DownloadFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranslateDownloadInput {
    pub language: Language,
    #[validate(length(min = 1, message = "Download Translation Id is required"))]
    pub download_translation_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: DownloadFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDownloadInput {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: DownloadFields,
}

// ==================== 下载文件 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFileFields {
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Version is required"))]
    pub version: String,
    pub version_slug: Option<String>,
    #[validate(length(min = 1, message = "Download Link is required"))]
    pub download_link: String,
    #[validate(length(min = 1, message = "File Size is required"))]
    pub file_size: String,
    #[serde(default)]
    pub authors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDownloadFileInput {
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: DownloadFileFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDownloadFileInput {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: DownloadFileFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFileByVersionInput {
    #[validate(length(min = 1, message = "Download Id is required"))]
    pub download_id: String,
    #[validate(length(min = 1, message = "Version Slug is required"))]
    pub version_slug: String,
}

// ==================== 评论 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadCommentCursorInput {
    #[validate(length(min = 1, message = "Download Id is required"))]
    pub download_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub cursor: CursorInput,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDownloadCommentInput {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(min = 1, message = "Download Id is required"))]
    pub download_id: String,
    pub reply_to_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCommentCursorInput {
    #[validate(length(min = 1, message = "Article Id is required"))]
    pub article_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub cursor: CursorInput,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleCommentInput {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(min = 1, message = "Article Id is required"))]
    pub article_id: String,
    pub reply_to_id: Option<String>,
}

/// 修改评论内容（下载评论与文章评论共用）
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentInput {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

// ==================== 话题 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TopicFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub r#type: TopicType,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub visibility: TopicVisibility,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicInput {
    #[serde(default)]
    pub language: Language,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: TopicFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTopicInput {
    pub language: Language,
    #[validate(length(min = 1, message = "Topic Translation Id is required"))]
    pub topic_translation_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: TopicFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopicInput {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: TopicFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TopicByTypeInput {
    #[serde(default)]
    pub language: Language,
    pub r#type: TopicType,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: OffsetInput,
}

// ==================== 文章 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[validate(length(min = 1, message = "Featured Image is required"))]
    pub featured_image_id: String,
    #[validate(length(min = 1, message = "Topic is required"))]
    pub topics: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleInput {
    #[serde(default)]
    pub language: Language,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ArticleFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranslateArticleInput {
    pub language: Language,
    #[validate(length(min = 1, message = "Article Translation Id is required"))]
    pub article_translation_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ArticleFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleInput {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ArticleFields,
}

// ==================== 媒体 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(url(message = "Url must be a valid URL"))]
    pub url: String,
    #[serde(default)]
    pub r#type: MediaType,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaInput {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub r#type: Option<MediaType>,
}

// ==================== 用户 ====================

/// 用户修改自己的资料；未提供的字段保持不变，显式 null 会清空
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub about: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone_number: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserByAdminInput {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    pub role: UserRole,
}

// ==================== 广告 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub position: AdPosition,
    #[serde(default)]
    pub r#type: AdType,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdInput {
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: AdFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdInput {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: AdFields,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdByPositionInput {
    pub position: AdPosition,
}

// ==================== 设置与日志 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSettingInput {
    #[validate(length(min = 1, message = "Key is required"))]
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetLogLevelInput {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download_json() -> serde_json::Value {
        serde_json::json!({
            "title": "Visual Studio Code",
            "content": "<p>Editor</p>",
            "developer": "Microsoft",
            "operatingSystem": "Windows",
            "license": "Freeware",
            "officialWebsite": "https://code.visualstudio.com",
            "currency": "USD",
            "price": "0",
            "featuredImageId": "media-1",
            "topics": ["topic-1"],
        })
    }

    #[test]
    fn create_download_applies_defaults() {
        let input: CreateDownloadInput = serde_json::from_value(download_json()).unwrap();
        assert_eq!(input.language, Language::Id);
        assert_eq!(input.fields.status, Status::Draft);
        assert_eq!(input.fields.r#type, DownloadType::App);
        assert_eq!(input.fields.schema_type, DownloadSchemaJson::DownloadApp);
        assert!(input.fields.authors.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn create_download_reports_flattened_field_errors() {
        let mut json = download_json();
        json["title"] = serde_json::json!("");
        json["topics"] = serde_json::json!([]);
        let input: CreateDownloadInput = serde_json::from_value(json).unwrap();

        let err = crate::error::ApiError::from(input.validate().unwrap_err());
        match err {
            crate::error::ApiError::Validation(fields) => {
                assert_eq!(fields["title"], vec!["Title is required".to_string()]);
                assert_eq!(fields["topics"], vec!["Topic is required".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn download_file_title_needs_two_chars() {
        let input: CreateDownloadFileInput = serde_json::from_value(serde_json::json!({
            "title": "A",
            "version": "1.0",
            "downloadLink": "https://example.com/a.zip",
            "fileSize": "10 MB",
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_user_distinguishes_null_from_missing() {
        let input: UpdateUserInput =
            serde_json::from_value(serde_json::json!({ "about": null })).unwrap();
        assert_eq!(input.about, Some(None));
        assert_eq!(input.image, None);
    }
}
