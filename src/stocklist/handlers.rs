// region:    --- Imports
use super::model::{ImportList, ItemForm, ListItemForm, NewListForm, SessionForm, StoreForm};
use super::{commands, query};
use crate::error::AppResult;
use crate::identity::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;

// endregion: --- Imports

// region:    --- Store Handlers

/// 매장 목록
pub async fn handle_get_stores(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let stores = query::stores_for(&mut conn, user.id).await?;
    Ok(Json(json!({ "stores": stores })))
}

/// 매장 생성
pub async fn handle_create_store(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(form): Json<StoreForm>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 매장 생성 요청 user: {}", "Handler", user.id);
    let mut conn = state.db.pool().acquire().await?;
    let store = commands::create_store(&mut conn, &user, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New Store successful.", "store": store })),
    ))
}

/// 매장과 조사 기간
pub async fn handle_get_store(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(store_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let store = query::store(&mut conn, user.id, store_id).await?;
    let sessions = query::sessions_for(&mut conn, store.id).await?;
    Ok(Json(json!({ "store": store, "sessions": sessions })))
}

/// 매장 이름 변경
pub async fn handle_update_store(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(store_id): Path<i64>,
    Json(form): Json<StoreForm>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 매장 이름 변경 요청 store: {}", "Handler", store_id);
    let mut conn = state.db.pool().acquire().await?;
    let store = commands::rename_store(&mut conn, &user, store_id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Store update successful.", "store": store })),
    ))
}

/// 매장 삭제
pub async fn handle_delete_store(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(store_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    commands::delete_store(&mut conn, &user, store_id).await?;
    Ok(Json(json!({ "message": "Store deleted." })))
}

// endregion: --- Store Handlers

// region:    --- Session Handlers

/// 조사 기간 목록
pub async fn handle_get_sessions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(store_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let store = query::store(&mut conn, user.id, store_id).await?;
    let sessions = query::sessions_for(&mut conn, store.id).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

/// 조사 기간 생성
pub async fn handle_create_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(store_id): Path<i64>,
    Json(form): Json<SessionForm>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let session = commands::create_session(&mut conn, &user, store_id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New Session successful.", "session": session })),
    ))
}

/// 조사 기간 재고 합계
pub async fn handle_get_stock(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(session_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 재고 합계 조회 session: {}", "HandlerQuery", session_id);
    let mut conn = state.db.pool().acquire().await?;
    let session = query::session(&mut conn, user.id, session_id).await?;
    let totals = query::stock_totals(&mut conn, session.id).await?;
    Ok(Json(json!({ "session": session, "totals": totals })))
}

/// 품목 하나의 재고 합계
pub async fn handle_get_item_stock(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((session_id, item_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let session = query::session(&mut conn, user.id, session_id).await?;
    let totals = query::item_totals(&mut conn, session.id, item_id).await?;
    let net_change = totals.net_change();
    Ok(Json(json!({ "totals": totals, "net_change": net_change })))
}

// endregion: --- Session Handlers

// region:    --- Item & List Handlers

/// 매장 품목과 목록
pub async fn handle_get_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(store_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let store = query::store(&mut conn, user.id, store_id).await?;
    let items = query::items_for(&mut conn, store.id).await?;
    Ok(Json(items))
}

/// 품목 생성
pub async fn handle_create_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(store_id): Path<i64>,
    Json(form): Json<ItemForm>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let item = commands::create_item(&mut conn, &user, store_id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New Item successful.", "item": item })),
    ))
}

/// 목록 여러 개 생성
pub async fn handle_create_lists(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(session_id): Path<i64>,
    Json(forms): Json<Vec<NewListForm>>,
) -> AppResult<impl IntoResponse> {
    let lists = commands::create_lists(&state.db, &user, session_id, forms).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New Lists successful.", "lists": lists })),
    ))
}

/// 목록 항목 입력
pub async fn handle_create_list_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((list_id, item_id)): Path<(i64, i64)>,
    Json(form): Json<ListItemForm>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let list_item = commands::set_list_item(&mut conn, &user, list_id, item_id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "List Item successful.", "list_item": list_item })),
    ))
}

/// 목록 가져오기
pub async fn handle_import_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(session_id): Path<i64>,
    Json(lists): Json<Vec<ImportList>>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 목록 가져오기 요청 session: {}", "Handler", session_id);
    let summary = commands::import_items(&state.db, &user, session_id, lists).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Import successful.", "summary": summary })),
    ))
}

// endregion: --- Item & List Handlers
