// region:    --- Imports
use super::model::{BidForm, BidOutcome, CommentForm, NewListingForm};
use super::{commands, query};
use crate::error::AppResult;
use crate::identity::{CurrentUser, MaybeUser};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::info;

// endregion: --- Imports

// region:    --- Command Handlers

/// 상품 등록
pub async fn handle_create_listing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(form): Json<NewListingForm>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 상품 등록 요청 user: {}", "Handler", user.id);
    let mut conn = state.db.pool().acquire().await?;
    let listing = commands::create_listing(&mut conn, &user, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New listing created.", "listing": listing })),
    ))
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<i64>,
    Json(form): Json<BidForm>,
) -> AppResult<Response> {
    info!("{:<12} --> 입찰 요청 listing: {}", "Handler", listing_id);
    let mut conn = state.db.pool().acquire().await?;
    let response = match commands::place_bid(&mut conn, &user, listing_id, form).await? {
        BidOutcome::Accepted { bid } => (
            StatusCode::CREATED,
            Json(json!({ "message": "Bid placed.", "bid": bid })),
        )
            .into_response(),
        BidOutcome::Rejected { min_bid, message } => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": message, "min_bid": min_bid })),
        )
            .into_response(),
    };
    Ok(response)
}

/// 댓글 등록
pub async fn handle_add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<i64>,
    Json(form): Json<CommentForm>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let comment = commands::add_comment(&mut conn, &user, listing_id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Comment added.", "comment": comment })),
    ))
}

/// 경매 종료
pub async fn handle_close_auction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let listing = commands::close_auction(&mut conn, &user, listing_id).await?;
    Ok(Json(
        json!({ "message": "Auction closed.", "listing": listing }),
    ))
}

/// 관심 목록 토글
pub async fn handle_toggle_watchlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let watching = commands::toggle_watch(&mut conn, &user, listing_id).await?;
    Ok(Json(json!({ "watching": watching })))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 진행 중인 상품 조회
pub async fn handle_get_active_listings(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 진행 중인 상품 조회", "HandlerQuery");
    let mut conn = state.db.pool().acquire().await?;
    let listings = query::active_listings(&mut conn).await?;
    let active_listings_count = query::active_listing_count(&mut conn).await?;
    Ok(Json(json!({
        "listings": listings,
        "active_listings_count": active_listings_count,
    })))
}

/// 카테고리 목록 조회
pub async fn handle_get_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let categories = query::categories(&mut conn).await?;
    Ok(Json(json!({ "categories": categories })))
}

/// 카테고리별 상품 조회
pub async fn handle_get_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let listings = query::listings_in_category(&mut conn, &category).await?;
    Ok(Json(json!({ "category": category, "listings": listings })))
}

/// 관심 목록 조회
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.pool().acquire().await?;
    let listings = query::watchlist(&mut conn, user.id).await?;
    Ok(Json(json!({ "listings": listings })))
}

/// 상품 상세 조회
pub async fn handle_get_listing(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(listing_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "HandlerQuery", listing_id);
    let mut conn = state.db.pool().acquire().await?;
    let detail = query::listing_detail(&mut conn, listing_id, viewer.map(|u| u.id)).await?;
    let bids = query::bid_history(&mut conn, listing_id).await?;
    Ok(Json(json!({ "detail": detail, "bids": bids })))
}

// endregion: --- Query Handlers
