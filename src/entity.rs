//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义、枚举列与 JSON 数据结构。

pub mod prelude;

// === 枚举列与 JSON 数据结构 ===
pub mod sea_orm_active_enums;
pub mod site_setting;

// === SeaORM 实体（对应数据库表）===
pub mod ads;
pub mod article_authors;
pub mod article_comments;
pub mod article_topics;
pub mod article_translations;
pub mod articles;
pub mod download_authors;
pub mod download_comments;
pub mod download_download_files;
pub mod download_file_authors;
pub mod download_files;
pub mod download_topics;
pub mod download_translations;
pub mod downloads;
pub mod medias;
pub mod sessions;
pub mod settings;
pub mod topic_translations;
pub mod topics;
pub mod users;
