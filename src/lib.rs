// region:    --- Modules
pub mod amount;
pub mod auctions;
pub mod config;
pub mod database;
pub mod encyclopedia;
pub mod error;
pub mod identity;
pub mod network;
pub mod relations;
pub mod stocklist;
pub mod validation;

// endregion: --- Modules

// region:    --- Imports
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::encyclopedia::EntryStore;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// endregion: --- Imports

// region:    --- App State

/// 모든 핸들러가 공유하는 상태
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub entries: Arc<dyn EntryStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseManager, entries: impl EntryStore + 'static, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            entries: Arc::new(entries),
            config: Arc::new(config),
        }
    }
}

// endregion: --- App State

// region:    --- Router

/// 네 개의 앱을 각자의 경로 아래에 마운트한 라우터
pub fn app(state: AppState) -> Router {
    // 브라우저 클라이언트를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/register", post(identity::handlers::handle_register))
        .route("/login", post(identity::handlers::handle_login))
        .nest("/auctions", auctions::routes())
        .nest("/wiki", encyclopedia::routes())
        .nest("/network", network::routes())
        .nest("/stocklist", stocklist::routes())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 2)) // CSV 가져오기를 위한 2MB 제한
        .with_state(state)
}

// endregion: --- Router
