// region:    --- Imports
use super::model::{Bid, Category, Comment, ListingDetail, ListingSummary};
use super::queries;
use crate::error::{AppError, AppResult};
use crate::relations;
use sqlx::SqliteConnection;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 진행 중인 상품 조회
pub async fn active_listings(conn: &mut SqliteConnection) -> AppResult<Vec<ListingSummary>> {
    info!("{:<12} --> 진행 중인 상품 조회", "Query");
    let listings = sqlx::query_as::<_, ListingSummary>(queries::GET_ACTIVE_LISTINGS)
        .fetch_all(conn)
        .await?;
    Ok(listings)
}

/// 진행 중인 상품 수
pub async fn active_listing_count(conn: &mut SqliteConnection) -> AppResult<i64> {
    let count = sqlx::query_scalar(queries::COUNT_ACTIVE_LISTINGS)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// 카테고리 목록 조회
pub async fn categories(conn: &mut SqliteConnection) -> AppResult<Vec<Category>> {
    info!("{:<12} --> 카테고리 목록 조회", "Query");
    let categories = sqlx::query_as::<_, Category>(queries::GET_CATEGORIES)
        .fetch_all(conn)
        .await?;
    Ok(categories)
}

/// 카테고리별 상품 조회
pub async fn listings_in_category(
    conn: &mut SqliteConnection,
    category: &str,
) -> AppResult<Vec<ListingSummary>> {
    info!("{:<12} --> 카테고리별 상품 조회: {}", "Query", category);
    let listings = sqlx::query_as::<_, ListingSummary>(queries::GET_LISTINGS_IN_CATEGORY)
        .bind(category)
        .fetch_all(conn)
        .await?;
    Ok(listings)
}

/// 관심 목록 조회
pub async fn watchlist(conn: &mut SqliteConnection, user_id: i64) -> AppResult<Vec<ListingSummary>> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "Query", user_id);
    let listings = sqlx::query_as::<_, ListingSummary>(queries::GET_WATCHLIST)
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(listings)
}

/// 상품 조회 (없으면 None)
pub async fn find_listing(
    conn: &mut SqliteConnection,
    listing_id: i64,
) -> AppResult<Option<ListingSummary>> {
    let listing = sqlx::query_as::<_, ListingSummary>(queries::GET_LISTING)
        .bind(listing_id)
        .fetch_optional(conn)
        .await?;
    Ok(listing)
}

/// 상품 조회 (없으면 404)
pub async fn get_listing(conn: &mut SqliteConnection, listing_id: i64) -> AppResult<ListingSummary> {
    find_listing(conn, listing_id)
        .await?
        .ok_or_else(|| AppError::not_found("Listing not found."))
}

/// 최고 입찰 조회
pub async fn highest_bid(conn: &mut SqliteConnection, listing_id: i64) -> AppResult<Option<Bid>> {
    let bid = sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
        .bind(listing_id)
        .fetch_optional(conn)
        .await?;
    Ok(bid)
}

/// 입찰 이력 조회
pub async fn bid_history(conn: &mut SqliteConnection, listing_id: i64) -> AppResult<Vec<Bid>> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    let bids = sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
        .bind(listing_id)
        .fetch_all(conn)
        .await?;
    Ok(bids)
}

/// 상품 댓글 조회
pub async fn comments(conn: &mut SqliteConnection, listing_id: i64) -> AppResult<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>(queries::GET_COMMENTS)
        .bind(listing_id)
        .fetch_all(conn)
        .await?;
    Ok(comments)
}

/// 상품 상세 조회
pub async fn listing_detail(
    conn: &mut SqliteConnection,
    listing_id: i64,
    viewer_id: Option<i64>,
) -> AppResult<ListingDetail> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", listing_id);
    let listing = get_listing(&mut *conn, listing_id).await?;
    let comments = comments(&mut *conn, listing_id).await?;
    let highest_bid = highest_bid(&mut *conn, listing_id).await?;
    let watching = match viewer_id {
        Some(user_id) => relations::exists(&mut *conn, &queries::WATCH, user_id, listing_id).await?,
        None => false,
    };

    Ok(ListingDetail {
        min_bid: listing.min_bid(),
        can_bid: listing.can_bid(),
        listing,
        comments,
        highest_bid,
        watching,
    })
}

// endregion: --- Query Handlers
