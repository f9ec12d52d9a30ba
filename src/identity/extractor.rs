// region:    --- Imports
use super::commands::find_user;
use super::model::User;
use crate::error::AppError;
use crate::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

// endregion: --- Imports

/// 인증은 앞단(프록시/프레임워크)이 담당하고, 인증된 사용자 id를 이 헤더로 넘긴다
pub const USER_ID_HEADER: &str = "x-user-id";

/// 로그인한 사용자 (없으면 401)
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 로그인하지 않았을 수도 있는 사용자
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(MaybeUser(None));
        };

        let user_id: i64 = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| AppError::Unauthorized("Invalid user header.".to_string()))?;

        let mut conn = state.db.pool().acquire().await?;
        match find_user(&mut conn, user_id).await? {
            Some(user) => Ok(MaybeUser(Some(user))),
            None => Err(AppError::Unauthorized("Unknown user.".to_string())),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        MaybeUser::from_request_parts(parts, state)
            .await?
            .0
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Login required.".to_string()))
    }
}
