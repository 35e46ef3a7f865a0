use std::fs;
use std::path::Path;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr};
use url::Url;

use unduhan_path::resolve_data_dir;

// ==================== 数据库连接管理 ====================

/// 根据配置建立 SeaORM 连接
///
/// `database_url` 为空时使用 unduhan-path 解析出的默认数据库文件。
pub async fn establish_connection(
    database_url: Option<&str>,
) -> Result<DatabaseConnection, DbErr> {
    let connection_string = match database_url {
        Some(url) => url.to_string(),
        None => default_connection_string()?,
    };
    connect(connection_string).await
}

/// 连接指定路径的 SQLite 文件（不存在时创建）
pub async fn connect_file(db_path: &Path) -> Result<DatabaseConnection, DbErr> {
    connect(sqlite_url(db_path)?).await
}

fn default_connection_string() -> Result<String, DbErr> {
    let data_dir = resolve_data_dir().map_err(|e| DbErr::Conn(RuntimeErr::Internal(e)))?;
    let db_path = data_dir.db_path();

    if !db_path.exists() {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DbErr::Conn(RuntimeErr::Internal(format!("无法创建数据库目录: {}", e)))
            })?;
        }
        log::info!("首次启动，创建{}模式数据库: {}", data_dir.mode(), db_path.display());
    } else {
        log::info!("使用{}模式数据库: {}", data_dir.mode(), db_path.display());
    }

    sqlite_url(&db_path)
}

/// 使用 `url` crate 安全地构建连接字符串
fn sqlite_url(db_path: &Path) -> Result<String, DbErr> {
    let db_url = Url::from_file_path(db_path).map_err(|_| {
        DbErr::Conn(RuntimeErr::Internal(format!(
            "Invalid database path: {}",
            db_path.display()
        )))
    })?;

    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

async fn connect(connection_string: String) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(connection_string);
    options
        .max_connections(1) // 对于本地 SQLite，连接池大小为 1 即可
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    log::debug!("数据库连接串: {}", options.get_url());

    Database::connect(options).await
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}
