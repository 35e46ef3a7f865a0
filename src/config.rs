//! 命令行与环境变量配置

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::utils::logs::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "unduhan")]
#[command(about = "Bilingual download and article portal server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: AppConfig,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 创建（或提升）管理员账号并输出一个会话 token
    CreateAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AppConfig {
    /// 监听地址
    #[arg(long, env = "UNDUHAN_BIND", default_value = "127.0.0.1:3000", global = true)]
    pub bind: SocketAddr,

    /// 数据库连接串，未指定时使用默认数据目录下的 SQLite 文件
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// 日志级别：error / warn / info / debug / trace / off
    #[arg(long, env = "UNDUHAN_LOG_LEVEL", default_value = "info", value_parser = parse_log_level, global = true)]
    pub log_level: LogLevel,

    #[command(flatten)]
    pub site: SiteConfig,
}

/// 生成 SEO 元数据所需的站点信息
#[derive(Args, Debug, Clone)]
pub struct SiteConfig {
    #[arg(long, env = "UNDUHAN_SITE_URL", default_value = "http://localhost:3000", global = true)]
    pub site_url: String,

    #[arg(long, env = "UNDUHAN_SITE_TITLE", default_value = "Unduhan", global = true)]
    pub site_title: String,

    #[arg(long, env = "UNDUHAN_SITE_DOMAIN", default_value = "localhost", global = true)]
    pub site_domain: String,

    #[arg(long, env = "UNDUHAN_LOGO_URL", default_value = "/icon.png", global = true)]
    pub logo_url: String,

    #[arg(long, env = "UNDUHAN_X_USERNAME", default_value = "@unduhan", global = true)]
    pub x_username: String,
}

impl SiteConfig {
    /// 拼接站内绝对地址
    pub fn url(&self, path: &str) -> String {
        let base = self.site_url.trim_end_matches('/');
        if path.is_empty() || path == "/" {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".into(),
            site_title: "Unduhan".into(),
            site_domain: "localhost".into(),
            logo_url: "/icon.png".into(),
            x_username: "@unduhan".into(),
        }
    }
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value).ok_or_else(|| format!("无效的日志级别: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_admin_subcommand() {
        let cli = Cli::try_parse_from([
            "unduhan",
            "create-admin",
            "--name",
            "Admin",
            "--username",
            "admin",
            "--email",
            "admin@example.com",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Command::CreateAdmin { ref username, .. }) if username == "admin"));
        assert_eq!(cli.config.log_level, LogLevel::Debug);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let result = Cli::try_parse_from(["unduhan", "--log-level", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn site_url_joins_paths() {
        let site = SiteConfig {
            site_url: "https://unduhan.test/".into(),
            ..Default::default()
        };
        assert_eq!(site.url("/id/download"), "https://unduhan.test/id/download");
        assert_eq!(site.url(""), "https://unduhan.test");
    }
}
