//! 文章评论数据仓库
//!
//! 评论只有两层：reply_to_id 为空的顶层评论，以及指向顶层评论的回复。

use std::collections::HashMap;

use sea_orm::*;
use serde::Serialize;

use super::UserSummary;
use crate::database::pagination::{CursorInput, CursorPage, OffsetInput, fetch_cursor_page};
use crate::entity::article_comments;
use crate::entity::prelude::*;
use crate::utils::{new_id, now_millis};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCommentItem {
    #[serde(flatten)]
    pub comment: article_comments::Model,
    pub author: Option<UserSummary>,
}

/// 顶层评论及其回复
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCommentThread {
    #[serde(flatten)]
    pub comment: article_comments::Model,
    pub author: Option<UserSummary>,
    pub replies: Vec<ArticleCommentItem>,
}

/// 新建评论的结果
#[derive(Debug)]
pub enum NewComment<T> {
    Created(T),
    /// 被回复的评论不存在或不属于同一文章
    InvalidReplyTarget,
}

/// 文章评论数据仓库
pub struct ArticleCommentsRepository;

impl ArticleCommentsRepository {
    // ==================== 关联数据组装 ====================

    async fn with_authors<C>(
        conn: &C,
        rows: Vec<article_comments::Model>,
    ) -> Result<Vec<ArticleCommentItem>, DbErr>
    where
        C: ConnectionTrait,
    {
        let authors = rows.load_one(Users, conn).await?;
        Ok(rows
            .into_iter()
            .zip(authors)
            .map(|(comment, author)| ArticleCommentItem {
                comment,
                author: author.map(UserSummary::from),
            })
            .collect())
    }

    /// 为顶层评论加载作者与回复（回复按时间正序）
    async fn threads<C>(
        conn: &C,
        rows: Vec<article_comments::Model>,
    ) -> Result<Vec<ArticleCommentThread>, DbErr>
    where
        C: ConnectionTrait,
    {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = rows.iter().map(|c| c.id.clone()).collect();
        let replies = ArticleComments::find()
            .filter(article_comments::Column::ReplyToId.is_in(ids))
            .order_by_asc(article_comments::Column::CreatedAt)
            .all(conn)
            .await?;

        let mut grouped: HashMap<String, Vec<ArticleCommentItem>> = HashMap::new();
        for reply in Self::with_authors(conn, replies).await? {
            grouped
                .entry(reply.comment.reply_to_id.clone())
                .or_default()
                .push(reply);
        }

        Ok(Self::with_authors(conn, rows)
            .await?
            .into_iter()
            .map(|item| ArticleCommentThread {
                replies: grouped.remove(&item.comment.id).unwrap_or_default(),
                comment: item.comment,
                author: item.author,
            })
            .collect())
    }

    // ==================== 查询操作 ====================

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<article_comments::Model>, DbErr> {
        ArticleComments::find_by_id(id).one(db).await
    }

    /// 评论及其回复
    pub async fn find_thread(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<ArticleCommentThread>, DbErr> {
        let Some(comment) = Self::find_by_id(db, id).await? else {
            return Ok(None);
        };
        Ok(Self::threads(db, vec![comment]).await?.into_iter().next())
    }

    /// 某文章的全部顶层评论（新的在前）
    pub async fn find_by_article(
        db: &DatabaseConnection,
        article_id: &str,
    ) -> Result<Vec<ArticleCommentThread>, DbErr> {
        let rows = ArticleComments::find()
            .filter(article_comments::Column::ArticleId.eq(article_id))
            .filter(article_comments::Column::ReplyToId.eq(""))
            .order_by_desc(article_comments::Column::CreatedAt)
            .all(db)
            .await?;
        Self::threads(db, rows).await
    }

    /// 无限滚动：顶层评论按创建时间倒序
    pub async fn find_by_article_cursor(
        db: &DatabaseConnection,
        article_id: &str,
        cursor: &CursorInput,
    ) -> Result<CursorPage<ArticleCommentThread>, DbErr> {
        let query = ArticleComments::find()
            .filter(article_comments::Column::ArticleId.eq(article_id))
            .filter(article_comments::Column::ReplyToId.eq(""));
        let page = fetch_cursor_page(
            db,
            query,
            article_comments::Column::CreatedAt,
            cursor,
            |c| c.created_at,
        )
        .await?;

        Ok(CursorPage {
            items: Self::threads(db, page.items).await?,
            next_cursor: page.next_cursor,
        })
    }

    /// 后台列表：所有评论（含回复）
    pub async fn find_dashboard(
        db: &DatabaseConnection,
        page: OffsetInput,
    ) -> Result<Vec<ArticleCommentItem>, DbErr> {
        let rows = page
            .apply(ArticleComments::find().order_by_desc(article_comments::Column::CreatedAt))
            .all(db)
            .await?;
        Self::with_authors(db, rows).await
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        ArticleComments::find().count(db).await
    }

    /// 某文章的顶层评论数
    pub async fn count_by_article(
        db: &DatabaseConnection,
        article_id: &str,
    ) -> Result<u64, DbErr> {
        ArticleComments::find()
            .filter(article_comments::Column::ArticleId.eq(article_id))
            .filter(article_comments::Column::ReplyToId.eq(""))
            .count(db)
            .await
    }

    // ==================== 写操作 ====================

    /// 新建评论；回复只能指向同一文章下的顶层评论
    pub async fn create(
        db: &DatabaseConnection,
        author_id: &str,
        article_id: &str,
        content: String,
        reply_to_id: Option<String>,
    ) -> Result<NewComment<article_comments::Model>, DbErr> {
        let reply_to_id = reply_to_id.filter(|id| !id.is_empty());

        if let Some(target_id) = &reply_to_id {
            let target = Self::find_by_id(db, target_id).await?;
            let valid = target
                .map(|t| t.article_id == article_id && t.reply_to_id.is_empty())
                .unwrap_or(false);
            if !valid {
                return Ok(NewComment::InvalidReplyTarget);
            }
        }

        let now = now_millis();
        let comment = article_comments::ActiveModel {
            id: Set(new_id()),
            content: Set(content),
            reply_to_id: Set(reply_to_id.unwrap_or_default()),
            article_id: Set(article_id.to_string()),
            author_id: Set(author_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Ok(NewComment::Created(comment))
    }

    pub async fn update_content(
        db: &DatabaseConnection,
        id: &str,
        content: String,
    ) -> Result<article_comments::Model, DbErr> {
        article_comments::ActiveModel {
            id: Set(id.to_string()),
            content: Set(content),
            updated_at: Set(now_millis()),
            ..Default::default()
        }
        .update(db)
        .await
    }

    /// 删除评论及其全部回复
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        ArticleComments::delete_many()
            .filter(article_comments::Column::ReplyToId.eq(id))
            .exec(&txn)
            .await?;
        let result = ArticleComments::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
