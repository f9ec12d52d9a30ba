/// 재고 관리 앱: 매장, 조사 기간, 종류별 목록, 품목, 재고 합계
pub mod commands;
pub mod handlers;
pub mod model;
pub mod queries;
pub mod query;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;

/// 재고 관리 라우터 (`/stocklist` 아래에 마운트)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stores",
            get(handlers::handle_get_stores).post(handlers::handle_create_store),
        )
        .route(
            "/store/:id",
            get(handlers::handle_get_store)
                .put(handlers::handle_update_store)
                .delete(handlers::handle_delete_store),
        )
        .route(
            "/store/:id/sessions",
            get(handlers::handle_get_sessions).post(handlers::handle_create_session),
        )
        .route("/items/:store_id", get(handlers::handle_get_items))
        .route("/create_item/:store_id", post(handlers::handle_create_item))
        .route("/create_lists/:session_id", post(handlers::handle_create_lists))
        .route(
            "/create_list_item/:list_id/:item_id",
            post(handlers::handle_create_list_item),
        )
        .route("/import_items/:session_id", post(handlers::handle_import_items))
        .route("/session/:id/stock", get(handlers::handle_get_stock))
        .route(
            "/session/:id/stock/:item_id",
            get(handlers::handle_get_item_stock),
        )
}
