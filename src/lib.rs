pub mod api;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod pages;
pub mod utils;

use std::sync::Arc;

use axum::Router;
use clap::Parser;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use config::{Cli, Command, SiteConfig};
use database::db;
use database::repository::users_repository::UsersRepository;
use utils::logs::init_logger;

/// 处理函数共享的状态
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub site: Arc<SiteConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, site: SiteConfig) -> Self {
        Self {
            db,
            site: Arc::new(site),
        }
    }
}

/// RPC 过程与页面路由，附带请求日志
pub fn build_router(state: AppState) -> Router {
    api::router()
        .merge(pages::router())
        .layer(axum::middleware::from_fn(api::log_requests))
        .with_state(state)
}

/// 建立连接并执行数据库迁移
pub async fn init_database(database_url: Option<&str>) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let conn = db::establish_connection(database_url).await?;
    log::info!("数据库连接建立成功");

    log::info!("开始执行数据库迁移...");
    migration::Migrator::up(&conn, None).await?;
    log::info!("数据库迁移完成");

    Ok(conn)
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

async fn serve(state: AppState, bind: std::net::SocketAddr) -> Result<(), BoxError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("服务已启动: http://{}", listener.local_addr()?);

    let conn = state.db.clone();
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("监听退出信号失败: {}", e);
            }
            log::info!("收到退出信号，正在关闭服务...");
        })
        .await?;

    // 退出前关闭数据库连接
    match db::close_connection(conn).await {
        Ok(_) => log::info!("数据库连接已成功关闭"),
        Err(e) => log::error!("关闭数据库连接时出错: {}", e),
    }
    Ok(())
}

async fn create_admin(
    conn: &DatabaseConnection,
    name: &str,
    username: &str,
    email: &str,
) -> Result<(), BoxError> {
    let user = UsersRepository::upsert_admin(conn, name, username, email).await?;
    let session = UsersRepository::create_session(conn, &user.id).await?;
    log::info!("管理员账号已就绪: {}", user.username);
    println!("{}", session.id);
    Ok(())
}

async fn start(cli: Cli) -> Result<(), BoxError> {
    let conn = init_database(cli.config.database_url.as_deref()).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let state = AppState::new(conn, cli.config.site.clone());
            serve(state, cli.config.bind).await
        }
        Command::CreateAdmin {
            name,
            username,
            email,
        } => {
            let result = create_admin(&conn, &name, &username, &email).await;
            if let Err(e) = db::close_connection(conn).await {
                log::error!("关闭数据库连接时出错: {}", e);
            }
            result
        }
    }
}

pub fn run() {
    let cli = Cli::parse();
    init_logger(cli.config.log_level);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("无法创建异步运行时: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(start(cli)) {
        log::error!("启动失败: {}", e);
        std::process::exit(1);
    }
}
