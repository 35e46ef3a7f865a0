use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

/// 同一翻译组内每种语言只允许一条记录
///
/// 应用层在写事务内也会检查，但并发创建时仍需数据库约束兜底。
#[derive(DeriveMigrationName)]
pub struct Migration;

const UNIQUE_INDEXES: [(&str, &str, &str); 3] = [
    (
        "uq_downloads_translation_language",
        "downloads",
        "download_translation_id",
    ),
    (
        "uq_topics_translation_language",
        "topics",
        "topic_translation_id",
    ),
    (
        "uq_articles_translation_language",
        "articles",
        "article_translation_id",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for (index_name, table_name, translation_column) in UNIQUE_INDEXES {
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(
                    r#"CREATE UNIQUE INDEX IF NOT EXISTS "{}" ON "{}" ("{}", "language")"#,
                    index_name, table_name, translation_column
                ),
            ))
            .await?;
        }

        println!("[MIGRATION] translation language unique indexes created");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for (index_name, _, _) in UNIQUE_INDEXES {
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(r#"DROP INDEX IF EXISTS "{}""#, index_name),
            ))
            .await?;
        }

        Ok(())
    }
}
