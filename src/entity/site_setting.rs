//! 站点设置 JSON 结构体
//!
//! settings 表的 value 列以 JSON 文本形式存储，不同的 key 对应不同的结构。

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// settings.value 列（任意 JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, FromJsonQueryResult)]
#[serde(transparent)]
pub struct SettingValue(pub serde_json::Value);

/// 存储在 key = "settings" 下的站点信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteSetting {
    pub site_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_meta_description: Option<String>,
}

impl SiteSetting {
    /// 站点设置在 settings 表中的 key
    pub const KEY: &'static str = "settings";

    /// 解析 JSON 值，字段缺失时使用默认值
    pub fn from_value(value: &SettingValue) -> Self {
        serde_json::from_value(value.0.clone()).unwrap_or_default()
    }

    pub fn meta_title(&self) -> &str {
        self.site_meta_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.site_title)
    }

    pub fn meta_description(&self) -> &str {
        self.site_meta_description
            .as_deref()
            .or(self.site_description.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let value = SettingValue(serde_json::json!({ "siteTitle": "Unduhan" }));
        let setting = SiteSetting::from_value(&value);
        assert_eq!(setting.site_title, "Unduhan");
        assert_eq!(setting.meta_title(), "Unduhan");
        assert_eq!(setting.meta_description(), "");
    }

    #[test]
    fn meta_title_prefers_explicit_value() {
        let setting = SiteSetting {
            site_title: "Unduhan".into(),
            site_meta_title: Some("Unduhan - Download".into()),
            site_description: Some("Portal".into()),
            ..Default::default()
        };
        assert_eq!(setting.meta_title(), "Unduhan - Download");
        assert_eq!(setting.meta_description(), "Portal");
    }
}
