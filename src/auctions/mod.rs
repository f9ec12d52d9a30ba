/// 경매 앱: 상품 등록, 입찰, 댓글, 관심 목록
pub mod commands;
pub mod handlers;
pub mod model;
pub mod queries;
pub mod query;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;

/// 경매 라우터 (`/auctions` 아래에 마운트)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::handle_get_active_listings))
        .route("/categories", get(handlers::handle_get_categories))
        .route("/category/:category", get(handlers::handle_get_category))
        .route("/watchlist", get(handlers::handle_get_watchlist))
        .route("/listings", post(handlers::handle_create_listing))
        .route("/listing/:id", get(handlers::handle_get_listing))
        .route("/listing/:id/bid", post(handlers::handle_place_bid))
        .route("/listing/:id/comment", post(handlers::handle_add_comment))
        .route("/listing/:id/close", post(handlers::handle_close_auction))
        .route(
            "/listing/watchlist/:id",
            post(handlers::handle_toggle_watchlist),
        )
}
