//! 预导入模块
//!
//! 提供常用类型的快捷导入。

pub use super::ads::Entity as Ads;
pub use super::article_authors::Entity as ArticleAuthors;
pub use super::article_comments::Entity as ArticleComments;
pub use super::article_topics::Entity as ArticleTopics;
pub use super::article_translations::Entity as ArticleTranslations;
pub use super::articles::Entity as Articles;
pub use super::download_authors::Entity as DownloadAuthors;
pub use super::download_comments::Entity as DownloadComments;
pub use super::download_download_files::Entity as DownloadDownloadFiles;
pub use super::download_file_authors::Entity as DownloadFileAuthors;
pub use super::download_files::Entity as DownloadFiles;
pub use super::download_topics::Entity as DownloadTopics;
pub use super::download_translations::Entity as DownloadTranslations;
pub use super::downloads::Entity as Downloads;
pub use super::medias::Entity as Medias;
pub use super::sessions::Entity as Sessions;
pub use super::settings::Entity as Settings;
pub use super::topic_translations::Entity as TopicTranslations;
pub use super::topics::Entity as Topics;
pub use super::users::Entity as Users;
