//! 用户与会话数据仓库

use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Serialize;

use super::{contains_insensitive, non_empty};
use crate::database::dto::UpdateUserInput;
use crate::database::pagination::OffsetInput;
use crate::entity::prelude::*;
use crate::entity::sea_orm_active_enums::UserRole;
use crate::entity::{
    article_authors, article_comments, download_authors, download_comments, download_file_authors,
    medias, sessions, users,
};
use crate::utils::{new_id, now_millis};

const SEARCH_LIMIT: u64 = 10;
/// 会话有效期：30 天
const SESSION_TTL_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// 公开的用户资料（不含邮箱与电话）
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
    pub about: Option<String>,
    pub role: UserRole,
    pub created_at: i64,
}

impl From<users::Model> for UserProfile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            image: user.image,
            about: user.about,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// 用户数据仓库
pub struct UsersRepository;

impl UsersRepository {
    // ==================== 查询操作 ====================

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        Users::find_by_id(id).one(db).await
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .one(db)
            .await
    }

    pub async fn find_dashboard(
        db: &DatabaseConnection,
        page: OffsetInput,
    ) -> Result<Vec<users::Model>, DbErr> {
        page.apply(Users::find().order_by_desc(users::Column::CreatedAt))
            .all(db)
            .await
    }

    /// 按姓名、用户名或邮箱搜索
    pub async fn search(db: &DatabaseConnection, query: &str) -> Result<Vec<users::Model>, DbErr> {
        Users::find()
            .filter(
                Condition::any()
                    .add(contains_insensitive((Users, users::Column::Name), query))
                    .add(contains_insensitive((Users, users::Column::Username), query))
                    .add(contains_insensitive((Users, users::Column::Email), query)),
            )
            .order_by_desc(users::Column::CreatedAt)
            .limit(SEARCH_LIMIT)
            .all(db)
            .await
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Users::find().count(db).await
    }

    // ==================== 写操作 ====================

    /// 修改自己的资料，未提供的字段保持不变
    pub async fn update_profile(
        db: &DatabaseConnection,
        id: &str,
        input: UpdateUserInput,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(existing) = Self::find_by_id(db, id).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(about) = input.about {
            active.about = Set(non_empty(about));
        }
        if let Some(image) = input.image {
            active.image = Set(non_empty(image));
        }
        if let Some(phone_number) = input.phone_number {
            active.phone_number = Set(non_empty(phone_number));
        }
        active.updated_at = Set(now_millis());

        Ok(Some(active.update(db).await?))
    }

    pub async fn update_role(
        db: &DatabaseConnection,
        id: &str,
        role: UserRole,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(existing) = Self::find_by_id(db, id).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = existing.into();
        active.role = Set(role);
        active.updated_at = Set(now_millis());
        Ok(Some(active.update(db).await?))
    }

    /// 删除用户：作者关联、评论（含他人对其评论的回复）、会话一并删除，媒体作者置空
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        let Some(user) = Users::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        DownloadAuthors::delete_many()
            .filter(download_authors::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        ArticleAuthors::delete_many()
            .filter(article_authors::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        DownloadFileAuthors::delete_many()
            .filter(download_file_authors::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        let download_comment_ids: Vec<String> = DownloadComments::find()
            .filter(download_comments::Column::AuthorId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        DownloadComments::delete_many()
            .filter(
                Condition::any()
                    .add(download_comments::Column::AuthorId.eq(id))
                    .add(download_comments::Column::ReplyToId.is_in(download_comment_ids)),
            )
            .exec(&txn)
            .await?;

        let article_comment_ids: Vec<String> = ArticleComments::find()
            .filter(article_comments::Column::AuthorId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        ArticleComments::delete_many()
            .filter(
                Condition::any()
                    .add(article_comments::Column::AuthorId.eq(id))
                    .add(article_comments::Column::ReplyToId.is_in(article_comment_ids)),
            )
            .exec(&txn)
            .await?;

        Sessions::delete_many()
            .filter(sessions::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        Medias::update_many()
            .col_expr(medias::Column::AuthorId, Expr::value(Option::<String>::None))
            .filter(medias::Column::AuthorId.eq(id))
            .exec(&txn)
            .await?;

        Users::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        log::info!("已删除用户 {} ({})", user.username, id);
        Ok(true)
    }

    /// 创建管理员；用户名或邮箱已存在时提升为管理员
    pub async fn upsert_admin(
        db: &DatabaseConnection,
        name: &str,
        username: &str,
        email: &str,
    ) -> Result<users::Model, DbErr> {
        let existing = Users::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(username))
                    .add(users::Column::Email.eq(email)),
            )
            .one(db)
            .await?;

        let now = now_millis();
        match existing {
            Some(user) => {
                let mut active: users::ActiveModel = user.into();
                active.role = Set(UserRole::Admin);
                active.updated_at = Set(now);
                active.update(db).await
            }
            None => {
                users::ActiveModel {
                    id: Set(new_id()),
                    name: Set(name.to_string()),
                    username: Set(username.to_string()),
                    email: Set(email.to_string()),
                    image: Set(None),
                    phone_number: Set(None),
                    about: Set(None),
                    role: Set(UserRole::Admin),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(db)
                .await
            }
        }
    }

    // ==================== 会话 ====================

    /// 为用户创建新会话，返回 token
    pub async fn create_session(
        db: &DatabaseConnection,
        user_id: &str,
    ) -> Result<sessions::Model, DbErr> {
        let now = now_millis();
        sessions::ActiveModel {
            id: Set(new_id()),
            user_id: Set(user_id.to_string()),
            expires_at: Set(now + SESSION_TTL_MS),
            created_at: Set(now),
        }
        .insert(db)
        .await
    }

    /// 由 token 查找会话用户；过期会话视为不存在
    pub async fn find_by_session(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        let found = Sessions::find_by_id(token)
            .find_also_related(Users)
            .one(db)
            .await?;

        match found {
            Some((session, user)) if session.expires_at > now_millis() => Ok(user),
            _ => Ok(None),
        }
    }
}
