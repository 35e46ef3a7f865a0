//! `articleComment.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, AuthUser, ValidatedJson};
use crate::AppState;
use crate::database::dto::{
    ArticleCommentCursorInput, CreateArticleCommentInput, PageInput, UpdateCommentInput,
};
use crate::database::pagination::CursorPage;
use crate::database::repository::article_comments_repository::{
    ArticleCommentItem, ArticleCommentThread, ArticleCommentsRepository, NewComment,
};
use crate::entity::article_comments;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Article comment";

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> ApiResult<Json<Vec<ArticleCommentItem>>> {
    Ok(Json(
        ArticleCommentsRepository::find_dashboard(&state.db, input.page).await?,
    ))
}

pub async fn by_article_id(
    State(state): State<AppState>,
    Json(article_id): Json<String>,
) -> ApiResult<Json<Vec<ArticleCommentThread>>> {
    Ok(Json(
        ArticleCommentsRepository::find_by_article(&state.db, &article_id).await?,
    ))
}

pub async fn by_article_id_infinite(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ArticleCommentCursorInput>,
) -> ApiResult<Json<CursorPage<ArticleCommentThread>>> {
    let page = ArticleCommentsRepository::find_by_article_cursor(
        &state.db,
        &input.article_id,
        &input.cursor,
    )
    .await?;
    Ok(Json(page))
}

pub async fn by_id(
    State(state): State<AppState>,
    Json(id): Json<String>,
) -> ApiResult<Json<ArticleCommentThread>> {
    ArticleCommentsRepository::find_thread(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(ArticleCommentsRepository::count(&state.db).await?))
}

pub async fn count_by_article_id(
    State(state): State<AppState>,
    Json(article_id): Json<String>,
) -> ApiResult<Json<u64>> {
    Ok(Json(
        ArticleCommentsRepository::count_by_article(&state.db, &article_id).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateArticleCommentInput>,
) -> ApiResult<Json<article_comments::Model>> {
    let outcome = ArticleCommentsRepository::create(
        &state.db,
        &user.id,
        &input.article_id,
        input.content,
        input.reply_to_id,
    )
    .await?;

    match outcome {
        NewComment::Created(comment) => Ok(Json(comment)),
        NewComment::InvalidReplyTarget => Err(ApiError::BadRequest(
            "Reply target must be a top-level comment on the same article".into(),
        )),
    }
}

/// 评论作者本人修改
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateCommentInput>,
) -> ApiResult<Json<article_comments::Model>> {
    let comment = ArticleCommentsRepository::find_by_id(&state.db, &input.id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    if comment.author_id != user.id {
        return Err(ApiError::Unauthorized(
            "Only the author of the article comment is allowed to update it".into(),
        ));
    }

    let updated =
        ArticleCommentsRepository::update_content(&state.db, &input.id, input.content).await?;
    Ok(Json(updated))
}

/// 评论作者本人删除，回复一并删除
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    let comment = ArticleCommentsRepository::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    if comment.author_id != user.id {
        return Err(ApiError::Unauthorized(
            "Only the author of the article comment is allowed to delete it".into(),
        ));
    }

    Ok(Json(ArticleCommentsRepository::delete(&state.db, &id).await?))
}

pub async fn update_by_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateCommentInput>,
) -> ApiResult<Json<article_comments::Model>> {
    if ArticleCommentsRepository::find_by_id(&state.db, &input.id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    let updated =
        ArticleCommentsRepository::update_content(&state.db, &input.id, input.content).await?;
    Ok(Json(updated))
}

pub async fn delete_by_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if ArticleCommentsRepository::delete(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
