/// 경매 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 입찰
/// 3. 댓글
/// 4. 경매 종료
/// 5. 관심 목록 토글
// region:    --- Imports
use super::model::{
    Bid, BidForm, BidOutcome, Comment, CommentForm, ListingSummary, NewListingForm, MAX_BID,
    MAX_CATEGORY_LENGTH, MAX_COMMENT_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_IMG_URL_LENGTH,
    MAX_TITLE_LENGTH, MIN_BID, PRICE_CHANGED_MESSAGE,
};
use super::{queries, query};
use crate::amount::Money;
use crate::error::{AppError, AppResult, FieldErrors};
use crate::identity::User;
use crate::relations;
use crate::validation::{in_range, optional_text, required_text, REQUIRED};
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Validation

/// 검증된 상품 등록 값
#[derive(Debug, Clone)]
pub struct ValidListing {
    pub title: String,
    pub description: String,
    pub category: String,
    pub starting_bid: Money,
    pub img_url: String,
}

/// 금액 필드 검증 (필수, 시스템 범위 내)
pub fn validate_money(errors: &mut FieldErrors, field: &str, value: &serde_json::Value) -> Money {
    match Money::from_json(value) {
        Ok(Some(amount)) => {
            in_range(errors, field, amount, MIN_BID, MAX_BID);
            amount
        }
        Ok(None) => {
            errors.add(field, REQUIRED);
            Money::ZERO
        }
        Err(e) => {
            errors.add(field, e.to_string());
            Money::ZERO
        }
    }
}

/// 상품 등록 폼 검증
pub fn validate_listing(form: &NewListingForm) -> Result<ValidListing, FieldErrors> {
    let mut errors = FieldErrors::new();
    let listing = ValidListing {
        title: required_text(&mut errors, "title", &form.title, MAX_TITLE_LENGTH),
        description: required_text(
            &mut errors,
            "description",
            &form.description,
            MAX_DESCRIPTION_LENGTH,
        ),
        category: optional_text(&mut errors, "category", &form.category, MAX_CATEGORY_LENGTH),
        starting_bid: validate_money(&mut errors, "starting_bid", &form.starting_bid),
        img_url: optional_text(&mut errors, "img_url", &form.img_url, MAX_IMG_URL_LENGTH),
    };
    errors.into_result(listing)
}

// endregion: --- Validation

// region:    --- Commands

/// 1. 상품 등록
pub async fn create_listing(
    conn: &mut SqliteConnection,
    owner: &User,
    form: NewListingForm,
) -> AppResult<ListingSummary> {
    info!("{:<12} --> 상품 등록 요청: {:?}", "Command", form);
    let valid = validate_listing(&form)?;

    let listing_id: i64 = sqlx::query_scalar(queries::INSERT_LISTING)
        .bind(owner.id)
        .bind(&valid.title)
        .bind(&valid.description)
        .bind(&valid.category)
        .bind(valid.starting_bid)
        .bind(&valid.img_url)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

    info!("{:<12} --> 상품 등록 성공 id: {}", "Command", listing_id);
    query::get_listing(conn, listing_id).await
}

/// 2. 입찰
/// 비교와 삽입을 하나의 조건부 INSERT로 처리하므로 동시 입찰이 같은 최고가를 보고 둘 다 통과할 수 없다.
pub async fn place_bid(
    conn: &mut SqliteConnection,
    bidder: &User,
    listing_id: i64,
    form: BidForm,
) -> AppResult<BidOutcome> {
    info!(
        "{:<12} --> 입찰 요청 listing: {}, bidder: {}, amount: {}",
        "Command", listing_id, bidder.id, form.amount
    );

    let mut errors = FieldErrors::new();
    let amount = validate_money(&mut errors, "amount", &form.amount);
    errors.into_result(())?;

    let listing = query::get_listing(&mut *conn, listing_id).await?;
    if !listing.listing.active {
        return Err(AppError::validation("amount", "This auction is closed."));
    }

    let bid_id: Option<i64> = sqlx::query_scalar(queries::PLACE_BID)
        .bind(listing_id)
        .bind(bidder.id)
        .bind(amount)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

    match bid_id {
        Some(bid_id) => {
            let bid = sqlx::query_as::<_, Bid>(queries::GET_BID)
                .bind(bid_id)
                .fetch_one(&mut *conn)
                .await?;
            info!("{:<12} --> 입찰 성공: {}", "Command", bid.amount);
            Ok(BidOutcome::Accepted { bid })
        }
        None => {
            // 그 사이 다른 입찰로 최소 금액이 바뀌었을 수 있으므로 다시 조회
            let listing = query::get_listing(conn, listing_id).await?;
            warn!(
                "{:<12} --> 입찰 거절: {} (최소 {})",
                "Command",
                amount,
                listing.min_bid()
            );
            Ok(BidOutcome::Rejected {
                min_bid: listing.min_bid(),
                message: PRICE_CHANGED_MESSAGE.to_string(),
            })
        }
    }
}

/// 3. 댓글
pub async fn add_comment(
    conn: &mut SqliteConnection,
    user: &User,
    listing_id: i64,
    form: CommentForm,
) -> AppResult<Comment> {
    info!("{:<12} --> 댓글 등록 listing: {}", "Command", listing_id);
    let mut errors = FieldErrors::new();
    let text = required_text(&mut errors, "text", &form.text, MAX_COMMENT_LENGTH);
    errors.into_result(())?;

    query::get_listing(&mut *conn, listing_id).await?;

    let comment_id: i64 = sqlx::query_scalar(queries::INSERT_COMMENT)
        .bind(listing_id)
        .bind(user.id)
        .bind(&text)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

    let comment = sqlx::query_as::<_, Comment>(queries::GET_COMMENT)
        .bind(comment_id)
        .fetch_one(conn)
        .await?;
    Ok(comment)
}

/// 4. 경매 종료 (소유자만 가능)
pub async fn close_auction(
    conn: &mut SqliteConnection,
    user: &User,
    listing_id: i64,
) -> AppResult<ListingSummary> {
    info!("{:<12} --> 경매 종료 요청 listing: {}", "Command", listing_id);
    let listing = query::get_listing(&mut *conn, listing_id).await?;
    if listing.listing.owner_id != user.id {
        warn!(
            "{:<12} --> 소유자가 아닌 사용자의 종료 시도: {}",
            "Command", user.id
        );
        return Err(AppError::Forbidden(
            "Only the owner can close this auction.".to_string(),
        ));
    }

    sqlx::query(queries::CLOSE_LISTING)
        .bind(listing_id)
        .execute(&mut *conn)
        .await?;

    query::get_listing(conn, listing_id).await
}

/// 5. 관심 목록 토글. 토글 후 관심 여부를 돌려준다
pub async fn toggle_watch(
    conn: &mut SqliteConnection,
    user: &User,
    listing_id: i64,
) -> AppResult<bool> {
    info!("{:<12} --> 관심 목록 토글 listing: {}", "Command", listing_id);
    query::get_listing(&mut *conn, listing_id).await?;
    let watching = relations::toggle(conn, &queries::WATCH, user.id, listing_id).await?;
    Ok(watching)
}

// endregion: --- Commands
