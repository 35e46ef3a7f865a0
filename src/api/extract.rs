//! 请求提取器：校验后的 JSON 输入与登录用户

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::AppState;
use crate::database::repository::users_repository::UsersRepository;
use crate::entity::sea_orm_active_enums::UserRole;
use crate::entity::users;
use crate::error::ApiError;

/// 反序列化并执行 `validator` 校验的 JSON 输入
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// 已登录用户
#[derive(Debug, Clone)]
pub struct AuthUser(pub users::Model);

/// 管理员
#[derive(Debug, Clone)]
pub struct AdminUser(pub users::Model);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("You must be signed in".into()))?;

        match UsersRepository::find_by_session(&state.db, token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                log::debug!("无效或已过期的会话 token");
                Err(ApiError::Unauthorized("Session is invalid or expired".into()))
            }
        }
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            log::warn!("用户 {} 尝试访问管理员接口", user.username);
            return Err(ApiError::Forbidden(
                "You do not have permission to perform this action".into(),
            ));
        }
        Ok(AdminUser(user))
    }
}
