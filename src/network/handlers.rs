// region:    --- Imports
use super::model::{PageQuery, PostForm};
use super::{commands, query};
use crate::error::AppResult;
use crate::identity::{CurrentUser, MaybeUser};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;

// endregion: --- Imports

// region:    --- Command Handlers

/// 게시글 작성
pub async fn handle_new_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(form): Json<PostForm>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 게시글 작성 요청 user: {}", "Handler", user.id);
    let mut conn = state.db.pool().acquire().await?;
    let post = commands::create_post(&mut conn, &user, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New Post successful.", "post": post })),
    ))
}

/// 게시글 수정
pub async fn handle_update_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
    Json(form): Json<PostForm>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 게시글 수정 요청 post: {}", "Handler", post_id);
    let mut conn = state.db.pool().acquire().await?;
    let post = commands::update_post(&mut conn, &user, post_id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post update successful.", "post": post })),
    ))
}

/// 좋아요 토글
pub async fn handle_like_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let (liked, likes) = commands::toggle_like(&mut conn, &user, post_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post update successful.", "likes": likes, "liked": liked })),
    ))
}

/// 팔로우
pub async fn handle_follow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    commands::create_follow(&mut conn, &user, user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New Follow successful." })),
    ))
}

/// 언팔로우
pub async fn handle_unfollow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    commands::delete_follow(&mut conn, &user, user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Unfollow successful." })),
    ))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 전체 게시글
pub async fn handle_get_all_posts(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(page): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 전체 게시글 조회", "HandlerQuery");
    let mut conn = state.db.pool().acquire().await?;
    let posts = query::posts_from_all_users(
        &mut conn,
        viewer.map(|u| u.id),
        page.number(),
        state.config.page_size,
    )
    .await?;
    Ok(Json(posts))
}

/// 팔로잉 피드
pub async fn handle_get_following_posts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 팔로잉 피드 조회 user: {}", "HandlerQuery", user.id);
    let mut conn = state.db.pool().acquire().await?;
    let posts = query::posts_from_users_followed_by(
        &mut conn,
        user.id,
        page.number(),
        state.config.page_size,
    )
    .await?;
    Ok(Json(posts))
}

/// 프로필과 해당 사용자의 게시글
pub async fn handle_get_profile(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(user_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 프로필 조회 user: {}", "HandlerQuery", user_id);
    let viewer_id = viewer.map(|u| u.id);
    let mut conn = state.db.pool().acquire().await?;
    let profile = query::profile(&mut conn, user_id, viewer_id).await?;
    let posts = query::posts_from_user(
        &mut conn,
        user_id,
        viewer_id,
        page.number(),
        state.config.page_size,
    )
    .await?;
    Ok(Json(json!({ "profile": profile, "posts": posts })))
}

// endregion: --- Query Handlers
