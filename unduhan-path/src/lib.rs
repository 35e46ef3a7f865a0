//! 数据目录解析
//!
//! 查找顺序：`UNDUHAN_DATA_DIR` 环境变量 → 可执行文件旁的 `resources/`（便携模式）
//! → 系统应用数据目录。

use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "UNDUHAN_DATA_DIR";
pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "unduhan.db";
pub const RESOURCE_DIR: &str = "resources";

/// 数据目录的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDir {
    /// 由环境变量指定
    Env(PathBuf),
    /// 可执行文件旁的 resources 目录
    Portable(PathBuf),
    /// 系统应用数据目录
    System(PathBuf),
}

impl DataDir {
    pub fn path(&self) -> &Path {
        match self {
            DataDir::Env(p) | DataDir::Portable(p) | DataDir::System(p) => p,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            DataDir::Env(_) => "环境变量",
            DataDir::Portable(_) => "便携",
            DataDir::System(_) => "标准",
        }
    }

    /// 数据目录下的数据库文件
    pub fn db_path(&self) -> PathBuf {
        db_file_in(self.path())
    }
}

fn db_file_in(base: &Path) -> PathBuf {
    base.join(DB_DATA_DIR).join(DB_FILE_NAME)
}

/// 可执行文件同级的 resources 目录中已有数据库时视为便携模式
fn portable_dir() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let resources = exe_path.parent()?.join(RESOURCE_DIR);
    db_file_in(&resources).exists().then_some(resources)
}

fn system_dir() -> Result<PathBuf, String> {
    use directories::ProjectDirs;

    let dirs = ProjectDirs::from("id", "unduhan", "unduhan")
        .ok_or_else(|| "无法获取系统目录信息".to_string())?;
    Ok(dirs.data_dir().to_path_buf())
}

/// 按查找顺序确定数据目录
pub fn resolve_data_dir() -> Result<DataDir, String> {
    resolve_with(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

fn resolve_with(env_dir: Option<PathBuf>) -> Result<DataDir, String> {
    if let Some(dir) = env_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(DataDir::Env(dir));
    }
    if let Some(dir) = portable_dir() {
        return Ok(DataDir::Portable(dir));
    }
    system_dir().map(DataDir::System)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_dir_takes_precedence() {
        let dir = resolve_with(Some(PathBuf::from("/srv/unduhan"))).unwrap();
        assert_eq!(dir, DataDir::Env(PathBuf::from("/srv/unduhan")));
        assert_eq!(dir.db_path(), PathBuf::from("/srv/unduhan/data/unduhan.db"));
        assert_eq!(dir.mode(), "环境变量");
    }

    #[test]
    fn empty_env_dir_is_ignored() {
        let dir = resolve_with(Some(PathBuf::new()));
        assert!(!matches!(dir, Ok(DataDir::Env(_))));
    }
}
