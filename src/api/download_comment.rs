//! `downloadComment.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, AuthUser, ValidatedJson};
use crate::AppState;
use crate::database::dto::{
    CreateDownloadCommentInput, DownloadCommentCursorInput, PageInput, UpdateCommentInput,
};
use crate::database::pagination::CursorPage;
use crate::database::repository::download_comments_repository::{
    DownloadCommentItem, DownloadCommentThread, DownloadCommentsRepository, NewComment,
};
use crate::entity::download_comments;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "Download comment";

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> ApiResult<Json<Vec<DownloadCommentItem>>> {
    Ok(Json(
        DownloadCommentsRepository::find_dashboard(&state.db, input.page).await?,
    ))
}

pub async fn by_download_id(
    State(state): State<AppState>,
    Json(download_id): Json<String>,
) -> ApiResult<Json<Vec<DownloadCommentThread>>> {
    Ok(Json(
        DownloadCommentsRepository::find_by_download(&state.db, &download_id).await?,
    ))
}

pub async fn by_download_id_infinite(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<DownloadCommentCursorInput>,
) -> ApiResult<Json<CursorPage<DownloadCommentThread>>> {
    let page = DownloadCommentsRepository::find_by_download_cursor(
        &state.db,
        &input.download_id,
        &input.cursor,
    )
    .await?;
    Ok(Json(page))
}

pub async fn by_id(
    State(state): State<AppState>,
    Json(id): Json<String>,
) -> ApiResult<Json<DownloadCommentThread>> {
    DownloadCommentsRepository::find_thread(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(DownloadCommentsRepository::count(&state.db).await?))
}

pub async fn count_by_download_id(
    State(state): State<AppState>,
    Json(download_id): Json<String>,
) -> ApiResult<Json<u64>> {
    Ok(Json(
        DownloadCommentsRepository::count_by_download(&state.db, &download_id).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateDownloadCommentInput>,
) -> ApiResult<Json<download_comments::Model>> {
    let outcome = DownloadCommentsRepository::create(
        &state.db,
        &user.id,
        &input.download_id,
        input.content,
        input.reply_to_id,
    )
    .await?;

    match outcome {
        NewComment::Created(comment) => Ok(Json(comment)),
        NewComment::InvalidReplyTarget => Err(ApiError::BadRequest(
            "Reply target must be a top-level comment on the same download".into(),
        )),
    }
}

/// 评论作者本人修改
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateCommentInput>,
) -> ApiResult<Json<download_comments::Model>> {
    let comment = DownloadCommentsRepository::find_by_id(&state.db, &input.id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    if comment.author_id != user.id {
        return Err(ApiError::Unauthorized(
            "Only the author of the download comment is allowed to update it".into(),
        ));
    }

    let updated =
        DownloadCommentsRepository::update_content(&state.db, &input.id, input.content).await?;
    Ok(Json(updated))
}

/// 评论作者本人删除，回复一并删除
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    let comment = DownloadCommentsRepository::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    if comment.author_id != user.id {
        return Err(ApiError::Unauthorized(
            "Only the author of the download comment is allowed to delete it".into(),
        ));
    }

    Ok(Json(DownloadCommentsRepository::delete(&state.db, &id).await?))
}

pub async fn update_by_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateCommentInput>,
) -> ApiResult<Json<download_comments::Model>> {
    if DownloadCommentsRepository::find_by_id(&state.db, &input.id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    let updated =
        DownloadCommentsRepository::update_content(&state.db, &input.id, input.content).await?;
    Ok(Json(updated))
}

pub async fn delete_by_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if DownloadCommentsRepository::delete(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
