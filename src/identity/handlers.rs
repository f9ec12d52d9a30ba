// region:    --- Imports
use super::commands;
use super::model::{LoginCommand, RegisterCommand};
use crate::error::AppResult;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

// endregion: --- Imports

/// 회원가입
pub async fn handle_register(
    State(state): State<AppState>,
    Json(cmd): Json<RegisterCommand>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 회원가입 요청", "Handler");
    let user = commands::register(&state.db, cmd).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 로그인
pub async fn handle_login(
    State(state): State<AppState>,
    Json(cmd): Json<LoginCommand>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 로그인 요청", "Handler");
    let user = commands::authenticate(&state.db, cmd).await?;
    Ok(Json(user))
}
