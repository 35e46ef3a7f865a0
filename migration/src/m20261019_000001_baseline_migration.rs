use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement, TransactionTrait};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // 开启事务，保证所有操作的原子性
        let txn = conn.begin().await?;

        create_identity_tables(&txn).await?;
        create_download_tables(&txn).await?;
        create_topic_tables(&txn).await?;
        create_article_tables(&txn).await?;
        create_site_tables(&txn).await?;
        create_indexes(&txn).await?;
        seed_default_settings(&txn).await?;

        txn.commit().await?;

        println!("[MIGRATION] v1 baseline schema created successfully");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let txn = conn.begin().await?;

        // 先删除关联表，再删除被引用的主表
        let tables = [
            "article_comments",
            "_article_authors",
            "_article_topics",
            "articles",
            "article_translations",
            "download_comments",
            "_download_file_authors",
            "_download_authors",
            "_download_topics",
            "_download_download_files",
            "download_files",
            "downloads",
            "download_translations",
            "topics",
            "topic_translations",
            "ads",
            "settings",
            "medias",
            "sessions",
            "users",
        ];
        for table in tables {
            txn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(r#"DROP TABLE IF EXISTS "{}""#, table),
            ))
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

async fn execute_all<C>(conn: &C, statements: &[&str]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    for sql in statements {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, *sql))
            .await?;
    }
    Ok(())
}

/// 用户、会话与媒体表
async fn create_identity_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    execute_all(
        conn,
        &[
            r#"CREATE TABLE "users" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "name" TEXT NOT NULL,
                "username" TEXT NOT NULL UNIQUE,
                "email" TEXT NOT NULL UNIQUE,
                "image" TEXT,
                "phone_number" TEXT,
                "about" TEXT,
                "role" TEXT NOT NULL DEFAULT 'user',
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL
            )"#,
            r#"CREATE TABLE "sessions" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "user_id" TEXT NOT NULL,
                "expires_at" INTEGER NOT NULL,
                "created_at" INTEGER NOT NULL,
                FOREIGN KEY("user_id") REFERENCES "users"("id") ON DELETE CASCADE
            )"#,
            r#"CREATE TABLE "medias" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "name" TEXT NOT NULL UNIQUE,
                "url" TEXT NOT NULL,
                "type" TEXT NOT NULL DEFAULT 'image',
                "description" TEXT,
                "author_id" TEXT,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL,
                FOREIGN KEY("author_id") REFERENCES "users"("id") ON DELETE SET NULL
            )"#,
        ],
    )
    .await
}

/// 下载、下载文件及其关联表
async fn create_download_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    execute_all(
        conn,
        &[
            r#"CREATE TABLE "download_translations" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL
            )"#,
            r#"CREATE TABLE "downloads" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "language" TEXT NOT NULL DEFAULT 'id',
                "title" TEXT NOT NULL,
                "slug" TEXT NOT NULL UNIQUE,
                "content" TEXT NOT NULL,
                "excerpt" TEXT NOT NULL,
                "meta_title" TEXT,
                "meta_description" TEXT,
                "developer" TEXT NOT NULL,
                "operating_system" TEXT NOT NULL,
                "license" TEXT NOT NULL,
                "official_website" TEXT NOT NULL,
                "schema_type" TEXT NOT NULL DEFAULT 'DownloadApp',
                "type" TEXT NOT NULL DEFAULT 'app',
                "currency" TEXT NOT NULL,
                "price" TEXT NOT NULL,
                "status" TEXT NOT NULL DEFAULT 'draft',
                "download_translation_id" TEXT NOT NULL,
                "featured_image_id" TEXT NOT NULL,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL,
                FOREIGN KEY("download_translation_id") REFERENCES "download_translations"("id"),
                FOREIGN KEY("featured_image_id") REFERENCES "medias"("id")
            )"#,
            r#"CREATE TABLE "download_files" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "title" TEXT NOT NULL UNIQUE,
                "version" TEXT NOT NULL,
                "version_slug" TEXT NOT NULL,
                "download_link" TEXT NOT NULL,
                "file_size" TEXT NOT NULL,
                "views" INTEGER NOT NULL DEFAULT 0,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL
            )"#,
            r#"CREATE TABLE "_download_download_files" (
                "download_id" TEXT NOT NULL,
                "download_file_id" TEXT NOT NULL,
                PRIMARY KEY("download_id", "download_file_id"),
                FOREIGN KEY("download_id") REFERENCES "downloads"("id"),
                FOREIGN KEY("download_file_id") REFERENCES "download_files"("id")
            )"#,
            r#"CREATE TABLE "_download_authors" (
                "download_id" TEXT NOT NULL,
                "user_id" TEXT NOT NULL,
                PRIMARY KEY("download_id", "user_id"),
                FOREIGN KEY("download_id") REFERENCES "downloads"("id"),
                FOREIGN KEY("user_id") REFERENCES "users"("id")
            )"#,
            r#"CREATE TABLE "_download_file_authors" (
                "download_file_id" TEXT NOT NULL,
                "user_id" TEXT NOT NULL,
                PRIMARY KEY("download_file_id", "user_id"),
                FOREIGN KEY("download_file_id") REFERENCES "download_files"("id"),
                FOREIGN KEY("user_id") REFERENCES "users"("id")
            )"#,
            r#"CREATE TABLE "download_comments" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "content" TEXT NOT NULL,
                "reply_to_id" TEXT NOT NULL DEFAULT '',
                "download_id" TEXT NOT NULL,
                "author_id" TEXT NOT NULL,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL,
                FOREIGN KEY("download_id") REFERENCES "downloads"("id"),
                FOREIGN KEY("author_id") REFERENCES "users"("id")
            )"#,
        ],
    )
    .await
}

/// 话题表（_download_topics 依赖 topics，因此放在此处创建）
async fn create_topic_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    execute_all(
        conn,
        &[
            r#"CREATE TABLE "topic_translations" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL
            )"#,
            r#"CREATE TABLE "topics" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "language" TEXT NOT NULL DEFAULT 'id',
                "title" TEXT NOT NULL,
                "slug" TEXT NOT NULL UNIQUE,
                "description" TEXT,
                "type" TEXT NOT NULL DEFAULT 'all',
                "status" TEXT NOT NULL DEFAULT 'draft',
                "visibility" TEXT NOT NULL DEFAULT 'public',
                "meta_title" TEXT,
                "meta_description" TEXT,
                "topic_translation_id" TEXT NOT NULL,
                "featured_image_id" TEXT,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL,
                FOREIGN KEY("topic_translation_id") REFERENCES "topic_translations"("id"),
                FOREIGN KEY("featured_image_id") REFERENCES "medias"("id")
            )"#,
            r#"CREATE TABLE "_download_topics" (
                "download_id" TEXT NOT NULL,
                "topic_id" TEXT NOT NULL,
                PRIMARY KEY("download_id", "topic_id"),
                FOREIGN KEY("download_id") REFERENCES "downloads"("id"),
                FOREIGN KEY("topic_id") REFERENCES "topics"("id")
            )"#,
        ],
    )
    .await
}

/// 文章表
async fn create_article_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    execute_all(
        conn,
        &[
            r#"CREATE TABLE "article_translations" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL
            )"#,
            r#"CREATE TABLE "articles" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "language" TEXT NOT NULL DEFAULT 'id',
                "title" TEXT NOT NULL,
                "slug" TEXT NOT NULL UNIQUE,
                "content" TEXT NOT NULL,
                "excerpt" TEXT NOT NULL,
                "meta_title" TEXT,
                "meta_description" TEXT,
                "status" TEXT NOT NULL DEFAULT 'draft',
                "article_translation_id" TEXT NOT NULL,
                "featured_image_id" TEXT NOT NULL,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL,
                FOREIGN KEY("article_translation_id") REFERENCES "article_translations"("id"),
                FOREIGN KEY("featured_image_id") REFERENCES "medias"("id")
            )"#,
            r#"CREATE TABLE "_article_topics" (
                "article_id" TEXT NOT NULL,
                "topic_id" TEXT NOT NULL,
                PRIMARY KEY("article_id", "topic_id"),
                FOREIGN KEY("article_id") REFERENCES "articles"("id"),
                FOREIGN KEY("topic_id") REFERENCES "topics"("id")
            )"#,
            r#"CREATE TABLE "_article_authors" (
                "article_id" TEXT NOT NULL,
                "user_id" TEXT NOT NULL,
                PRIMARY KEY("article_id", "user_id"),
                FOREIGN KEY("article_id") REFERENCES "articles"("id"),
                FOREIGN KEY("user_id") REFERENCES "users"("id")
            )"#,
            r#"CREATE TABLE "article_comments" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "content" TEXT NOT NULL,
                "reply_to_id" TEXT NOT NULL DEFAULT '',
                "article_id" TEXT NOT NULL,
                "author_id" TEXT NOT NULL,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL,
                FOREIGN KEY("article_id") REFERENCES "articles"("id"),
                FOREIGN KEY("author_id") REFERENCES "users"("id")
            )"#,
        ],
    )
    .await
}

/// 广告与站点设置表
async fn create_site_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    execute_all(
        conn,
        &[
            r#"CREATE TABLE "ads" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "title" TEXT NOT NULL UNIQUE,
                "content" TEXT NOT NULL,
                "position" TEXT NOT NULL,
                "type" TEXT NOT NULL DEFAULT 'plain_ad',
                "active" INTEGER NOT NULL DEFAULT 1,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL
            )"#,
            r#"CREATE TABLE "settings" (
                "id" TEXT NOT NULL PRIMARY KEY,
                "key" TEXT NOT NULL UNIQUE,
                "value" TEXT NOT NULL,
                "created_at" INTEGER NOT NULL,
                "updated_at" INTEGER NOT NULL
            )"#,
        ],
    )
    .await
}

async fn create_indexes<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let indexes = [
        // 列表查询：language + status，按 updated_at 倒序
        (
            "idx_downloads_listing",
            "downloads",
            "language, status, updated_at",
        ),
        ("idx_downloads_type", "downloads", "type"),
        (
            "idx_downloads_translation",
            "downloads",
            "download_translation_id",
        ),
        ("idx_topics_listing", "topics", "language, status, updated_at"),
        ("idx_topics_translation", "topics", "topic_translation_id"),
        (
            "idx_articles_listing",
            "articles",
            "language, status, updated_at",
        ),
        (
            "idx_articles_translation",
            "articles",
            "article_translation_id",
        ),
        // 关联表反向索引
        ("idx_download_topics_topic", "_download_topics", "topic_id"),
        ("idx_article_topics_topic", "_article_topics", "topic_id"),
        (
            "idx_download_files_link",
            "_download_download_files",
            "download_file_id",
        ),
        // 评论
        (
            "idx_download_comments_download",
            "download_comments",
            "download_id, created_at",
        ),
        (
            "idx_article_comments_article",
            "article_comments",
            "article_id, created_at",
        ),
        ("idx_ads_position", "ads", "position"),
        ("idx_sessions_user", "sessions", "user_id"),
    ];

    for (index_name, table_name, columns) in &indexes {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!(
                r#"CREATE INDEX IF NOT EXISTS "{}" ON "{}" ({})"#,
                index_name, table_name, columns
            ),
        ))
        .await?;
    }

    Ok(())
}

/// 写入默认站点设置
async fn seed_default_settings<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let value = serde_json::json!({
        "siteTitle": "Unduhan",
        "siteTagline": "Download aplikasi dan game terbaru",
        "siteDescription": "Portal download aplikasi dan game gratis",
    });

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        r#"INSERT INTO "settings" ("id", "key", "value", "created_at", "updated_at")
           VALUES ('default-settings', 'settings', ?,
                   CAST(strftime('%s', 'now') AS INTEGER) * 1000,
                   CAST(strftime('%s', 'now') AS INTEGER) * 1000)"#,
        [value.to_string().into()],
    ))
    .await?;

    Ok(())
}
