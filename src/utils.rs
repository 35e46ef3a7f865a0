//! 通用工具
//!
//! ID 生成、时间戳以及文本处理等与业务无关的辅助函数。

pub mod logs;
pub mod text;

/// 生成新的字符串主键（32 位十六进制 UUID v4）
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 当前时间（Unix 毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_unique_hex() {
        let a = new_id();
        let b = new_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
