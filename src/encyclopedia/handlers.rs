// region:    --- Imports
use super::render::to_html;
use super::store::{validate_title, EntryStore};
use crate::error::{AppError, AppResult};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

// endregion: --- Imports

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct NewEntryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EditEntryForm {
    #[serde(default)]
    pub content: String,
}

async fn require_entry(entries: &dyn EntryStore, title: &str) -> AppResult<String> {
    entries
        .get_entry(title)
        .await?
        .ok_or_else(|| AppError::not_found("Entry not found."))
}

// region:    --- Query Handlers

/// 항목 제목 목록
pub async fn handle_index(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = state.entries.list_entries().await?;
    Ok(Json(json!({ "entries": entries })))
}

/// 항목 조회 (마크다운 원문과 HTML)
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 항목 조회: {}", "HandlerQuery", title);
    let content = require_entry(state.entries.as_ref(), &title).await?;
    let html = to_html(&content);
    Ok(Json(json!({ "title": title, "content": content, "html": html })))
}

/// 제목 검색
pub async fn handle_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 항목 검색: {}", "HandlerQuery", query.q);
    let result = state.entries.search(&query.q).await?;
    Ok(Json(result))
}

/// 임의의 항목
pub async fn handle_random(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let title = state
        .entries
        .random_entry()
        .await?
        .ok_or_else(|| AppError::not_found("No entries yet."))?;
    Ok(Json(json!({ "title": title })))
}

// endregion: --- Query Handlers

// region:    --- Command Handlers

/// 새 항목. 같은 제목이 있으면 400
pub async fn handle_new_entry(
    State(state): State<AppState>,
    Json(form): Json<NewEntryForm>,
) -> AppResult<impl IntoResponse> {
    let title = validate_title(&form.title)?;
    info!("{:<12} --> 새 항목 요청: {}", "Handler", title);
    if state.entries.get_entry(title).await?.is_some() {
        return Err(AppError::Duplicate(format!(
            "An entry titled \"{}\" already exists.",
            title
        )));
    }

    state.entries.save_entry(title, &form.content).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New entry saved.", "title": title })),
    ))
}

/// 항목 수정 (덮어쓰기)
pub async fn handle_edit_entry(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Json(form): Json<EditEntryForm>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 항목 수정 요청: {}", "Handler", title);
    require_entry(state.entries.as_ref(), &title).await?;
    state.entries.save_entry(&title, &form.content).await?;
    Ok(Json(json!({ "message": "Entry saved.", "title": title })))
}

// endregion: --- Command Handlers
