/// 소셜 네트워크 앱: 게시글, 좋아요, 팔로우, 피드
pub mod commands;
pub mod handlers;
pub mod model;
pub mod queries;
pub mod query;

use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;

/// 네트워크 라우터 (`/network` 아래에 마운트)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::handle_get_all_posts))
        .route("/following", get(handlers::handle_get_following_posts))
        .route("/profile/:id", get(handlers::handle_get_profile))
        .route("/post", post(handlers::handle_new_post))
        .route("/post/:id", put(handlers::handle_update_post))
        .route("/like/:id", put(handlers::handle_like_post))
        .route(
            "/follow/:id",
            post(handlers::handle_follow).delete(handlers::handle_unfollow),
        )
}
