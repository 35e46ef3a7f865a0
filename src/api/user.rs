//! `user.*` 过程

use axum::{Json, extract::State};

use super::extract::{AdminUser, AuthUser, ValidatedJson};
use crate::AppState;
use crate::database::dto::{PageInput, SearchInput, UpdateUserByAdminInput, UpdateUserInput};
use crate::database::repository::users_repository::{UserProfile, UsersRepository};
use crate::entity::users;
use crate::error::{ApiError, ApiResult};

const NOT_FOUND: &str = "User";

/// 当前登录用户
pub async fn me(AuthUser(user): AuthUser) -> Json<users::Model> {
    Json(user)
}

pub async fn by_id(
    State(state): State<AppState>,
    Json(id): Json<String>,
) -> ApiResult<Json<UserProfile>> {
    UsersRepository::find_by_id(&state.db, &id)
        .await?
        .map(|u| Json(UserProfile::from(u)))
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn by_username(
    State(state): State<AppState>,
    Json(username): Json<String>,
) -> ApiResult<Json<UserProfile>> {
    UsersRepository::find_by_username(&state.db, &username)
        .await?
        .map(|u| Json(UserProfile::from(u)))
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> ApiResult<Json<Vec<users::Model>>> {
    Ok(Json(UsersRepository::find_dashboard(&state.db, input.page).await?))
}

pub async fn search(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<SearchInput>,
) -> ApiResult<Json<Vec<users::Model>>> {
    Ok(Json(UsersRepository::search(&state.db, &input.search_query).await?))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(UsersRepository::count(&state.db).await?))
}

/// 修改自己的资料
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateUserInput>,
) -> ApiResult<Json<users::Model>> {
    UsersRepository::update_profile(&state.db, &user.id, input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn update_by_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<UpdateUserByAdminInput>,
) -> ApiResult<Json<users::Model>> {
    UsersRepository::update_role(&state.db, &input.id, input.role)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(id): Json<String>,
) -> ApiResult<Json<bool>> {
    if admin.id == id {
        return Err(ApiError::BadRequest("You cannot delete your own account".into()));
    }
    if UsersRepository::delete(&state.db, &id).await? {
        Ok(Json(true))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
