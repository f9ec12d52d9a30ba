use crate::amount::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 시스템 최소 입찰가 (0.01)
pub const MIN_BID: Money = Money::from_units(1);
/// 시스템 최대 입찰가 (99999.99)
pub const MAX_BID: Money = Money::from_units(9_999_999);
/// 최소 입찰 단위
pub const MIN_BID_INCREMENT: Money = Money::from_units(1);

pub const MAX_TITLE_LENGTH: usize = 50;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_CATEGORY_LENGTH: usize = 30;
pub const MAX_IMG_URL_LENGTH: usize = 200;
pub const MAX_COMMENT_LENGTH: usize = 200;

pub const PRICE_CHANGED_MESSAGE: &str =
    "The price has changed. Your bid was below the new minimum bid.";

// 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub starting_bid: Money,
    pub img_url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// 최고 입찰가/입찰 수가 붙은 상품
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ListingSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub owner: String,
    pub max_bid: Option<Money>,
    pub bid_count: i64,
}

impl ListingSummary {
    /// 다음 입찰 최소 금액
    pub fn min_bid(&self) -> Money {
        match self.max_bid {
            Some(max_bid) => max_bid + MIN_BID_INCREMENT,
            None => self.listing.starting_bid,
        }
    }

    /// 입찰 가능 여부
    pub fn can_bid(&self) -> bool {
        self.listing.active && self.min_bid() <= MAX_BID
    }
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub username: String,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

// 댓글 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// 카테고리별 상품 수
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub category: String,
    pub count: i64,
}

// 상품 상세
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    pub listing: ListingSummary,
    pub comments: Vec<Comment>,
    pub highest_bid: Option<Bid>,
    pub min_bid: Money,
    pub can_bid: bool,
    pub watching: bool,
}

// 상품 등록 폼
#[derive(Debug, Deserialize)]
pub struct NewListingForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub starting_bid: serde_json::Value,
    #[serde(default)]
    pub img_url: String,
}

// 입찰 폼
#[derive(Debug, Deserialize)]
pub struct BidForm {
    #[serde(default, alias = "bid")]
    pub amount: serde_json::Value,
}

// 댓글 폼
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(alias = "comment")]
    pub text: String,
}

/// 입찰 결과. 거절은 오류가 아닌 정상 분기
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BidOutcome {
    Accepted { bid: Bid },
    Rejected { min_bid: Money, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(starting_bid: &str, max_bid: Option<&str>, active: bool) -> ListingSummary {
        ListingSummary {
            listing: Listing {
                id: 1,
                owner_id: 1,
                title: "Lamp".to_string(),
                description: "A lamp".to_string(),
                category: String::new(),
                starting_bid: starting_bid.parse().unwrap(),
                img_url: String::new(),
                active,
                created_at: Utc::now(),
            },
            owner: "Mike".to_string(),
            max_bid: max_bid.map(|m| m.parse().unwrap()),
            bid_count: max_bid.map_or(0, |_| 1),
        }
    }

    #[test]
    fn min_bid_is_starting_bid_without_bids() {
        assert_eq!(summary("10.00", None, true).min_bid().to_string(), "10.00");
    }

    #[test]
    fn min_bid_is_one_increment_above_highest_bid() {
        assert_eq!(
            summary("10.00", Some("12.50"), true).min_bid().to_string(),
            "12.51"
        );
    }

    #[test]
    fn cannot_bid_on_closed_or_maxed_out_listing() {
        assert!(!summary("10.00", None, false).can_bid());
        assert!(!summary("10.00", Some("99999.99"), true).can_bid());
        assert!(summary("10.00", Some("99999.98"), true).can_bid());
    }
}
