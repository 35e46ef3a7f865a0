//! 数据仓库
//!
//! 每张业务表对应一个 `XxxRepository`，方法均为关联函数，接收连接并返回 `Result<_, DbErr>`。
//! 多步写操作在仓库内部开启事务，父表行与关联表行在同一个事务中提交。

pub mod ads_repository;
pub mod article_comments_repository;
pub mod articles_repository;
pub mod download_comments_repository;
pub mod download_files_repository;
pub mod downloads_repository;
pub mod medias_repository;
pub mod settings_repository;
pub mod topics_repository;
pub mod users_repository;

use std::collections::HashSet;

use sea_orm::sea_query::{BinOper, Expr, IntoColumnRef, SimpleExpr};
use sea_orm::*;
use serde::Serialize;

use crate::entity::sea_orm_active_enums::Language;
use crate::entity::users;
use crate::utils::{new_id, text};

/// 向已有翻译分组追加某一语言版本的结果
#[derive(Debug)]
pub enum Translated<T> {
    Created(T),
    /// 翻译分组不存在
    GroupNotFound,
    /// 分组中已有该语言的版本
    LanguageTaken,
}

/// 翻译分组中的其他版本（后台列表展示用）
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranslationSibling {
    pub id: String,
    pub title: String,
    pub language: Language,
}

/// 内容中展示的作者信息
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
}

impl From<users::Model> for UserSummary {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            image: user.image,
        }
    }
}

/// 生成表内唯一的 slug，重复时追加 `-2`、`-3` ...
pub async fn unique_slug<E, C>(conn: &C, column: E::Column, text: &str) -> Result<String, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut base = text::slugify(text);
    if base.is_empty() {
        base = new_id()[..8].to_string();
    }

    let mut candidate = base.clone();
    let mut suffix = 1;
    while E::find()
        .filter(column.eq(candidate.as_str()))
        .one(conn)
        .await?
        .is_some()
    {
        suffix += 1;
        candidate = format!("{base}-{suffix}");
    }
    Ok(candidate)
}

/// 大小写不敏感的子串匹配：`column GLOB '*[qQ][uU]...*'`，非 ASCII 字母同样适用
pub fn contains_insensitive<T>(column: T, query: &str) -> SimpleExpr
where
    T: IntoColumnRef,
{
    Expr::col(column).binary(BinOper::Custom("GLOB"), text::glob_pattern(query))
}

/// 去重并保持原有顺序（关联表主键不允许重复）
pub fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// 空字符串视为未提供
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_ids_keeps_first_occurrence() {
        let ids = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_ids(&ids), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn non_empty_filters_blank() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
    }
}
