/// 백과사전 앱: 파일 기반 마크다운 항목 저장소
pub mod handlers;
pub mod render;
pub mod store;

pub use store::{EntryStore, FileEntryStore, SearchResult};

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;

/// 백과사전 라우터 (`/wiki` 아래에 마운트)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::handle_index))
        .route(
            "/wiki/:title",
            get(handlers::handle_get_entry).put(handlers::handle_edit_entry),
        )
        .route("/search", get(handlers::handle_search))
        .route("/new", post(handlers::handle_new_entry))
        .route("/random", get(handlers::handle_random))
}
