//! 分页
//!
//! 两种分页方式：
//! - 偏移分页（`page` / `perPage`），用于后台列表与站点地图
//! - 游标分页（`limit` / `cursor`），用于前台的无限滚动列表
//!
//! 游标是排序列（毫秒时间戳）的值，查询条件为 `列 < cursor`，
//! 时间戳相同的行可能在翻页时被跳过或重复。

use sea_orm::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_CURSOR_LIMIT: u64 = 50;
pub const DEFAULT_PER_PAGE: u64 = 10;

/// 偏移分页参数
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OffsetInput {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: u64,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 1000, message = "perPage must be between 1 and 1000"))]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

impl Default for OffsetInput {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl OffsetInput {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// 超大页码截断到 SQLite 可接受的最大偏移
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(i64::MAX as u64)
    }

    /// 为查询附加 OFFSET / LIMIT
    pub fn apply<Q: QuerySelect>(&self, query: Q) -> Q {
        query.offset(self.offset()).limit(self.per_page)
    }
}

/// 游标分页参数
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CursorInput {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u64>,
    pub cursor: Option<i64>,
}

impl CursorInput {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_CURSOR_LIMIT)
    }
}

/// 游标分页结果
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<i64>,
}

impl<T> CursorPage<T> {
    /// 由多取一行的查询结果构造分页
    ///
    /// 多出的一行只用来判断是否还有下一页，随后被丢弃；
    /// nextCursor 取本页最后一行的排序值，下一页从它之后开始。
    pub fn from_rows(mut rows: Vec<T>, limit: u64, key: impl Fn(&T) -> i64) -> Self {
        let mut next_cursor = None;
        if rows.len() as u64 > limit {
            rows.truncate(limit as usize);
            next_cursor = rows.last().map(&key);
        }
        Self {
            items: rows,
            next_cursor,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

/// 对查询执行游标分页：按 `column` 倒序，取 `limit + 1` 行
pub async fn fetch_cursor_page<E, C>(
    conn: &C,
    query: Select<E>,
    column: E::Column,
    input: &CursorInput,
    key: impl Fn(&E::Model) -> i64,
) -> Result<CursorPage<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let limit = input.limit();
    let mut query = query.order_by_desc(column);
    if let Some(cursor) = input.cursor {
        query = query.filter(column.lt(cursor));
    }

    let rows = query.limit(limit + 1).all(conn).await?;
    Ok(CursorPage::from_rows(rows, limit, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_drops_lookahead_row() {
        let page = CursorPage::from_rows(vec![50, 40, 30, 20], 3, |v| *v);
        assert_eq!(page.items, vec![50, 40, 30]);
        assert_eq!(page.next_cursor, Some(30));
    }

    #[test]
    fn from_rows_last_page_has_no_cursor() {
        let page = CursorPage::from_rows(vec![20, 10], 3, |v| *v);
        assert_eq!(page.items, vec![20, 10]);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn offset_input_defaults() {
        let input: OffsetInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.page, 1);
        assert_eq!(input.per_page, DEFAULT_PER_PAGE);
        assert_eq!(OffsetInput::new(3, 20).offset(), 40);
    }

    #[test]
    fn offset_saturates_on_huge_page() {
        assert_eq!(OffsetInput::new(u64::MAX, 1000).offset(), i64::MAX as u64);
        assert_eq!(OffsetInput::new(4_294_967_297, 1000).offset(), 4_294_967_296_000);
    }

    #[test]
    fn cursor_limit_defaults_to_fifty() {
        let input: CursorInput = serde_json::from_str(r#"{"limit": null}"#).unwrap();
        assert_eq!(input.limit(), 50);
        assert!(input.validate().is_ok());

        let too_big = CursorInput {
            limit: Some(101),
            cursor: None,
        };
        assert!(too_big.validate().is_err());
    }
}
