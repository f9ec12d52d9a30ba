// region:    --- Imports
use campus_apps::config::Config;
use campus_apps::database::DatabaseManager;
use campus_apps::encyclopedia::FileEntryStore;
use campus_apps::{app, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
            return Err(e.into());
        }
    };

    // DatabaseManager 생성
    let db_manager = DatabaseManager::new(&config.database_url).await?;

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database(config.reset_database).await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 백과사전 항목 저장소
    let entries = FileEntryStore::open(config.wiki_entries_dir.clone()).await?;

    // 리스너 생성
    let listener = TcpListener::bind(config.server_addr.as_str()).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    let routes_all = app(AppState::new(db_manager, entries, config));

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
