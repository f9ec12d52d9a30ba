use crate::relations::Relation;

/// 최고 입찰가/입찰 수가 포함된 상품 조회 SELECT 절
macro_rules! listing_summary_select {
    () => {
        r#"
    SELECT l.id, l.owner_id, l.title, l.description, l.category, l.starting_bid,
           l.img_url, l.active, l.created_at,
           u.username AS owner,
           (SELECT MAX(b.amount) FROM bids b WHERE b.listing_id = l.id) AS max_bid,
           (SELECT COUNT(*) FROM bids b WHERE b.listing_id = l.id) AS bid_count
    FROM listings l
    JOIN users u ON u.id = l.owner_id
"#
    };
}

/// 상품 조회
pub const GET_LISTING: &str = concat!(listing_summary_select!(), "WHERE l.id = $1");

/// 진행 중인 상품 조회 (최신순)
pub const GET_ACTIVE_LISTINGS: &str = concat!(
    listing_summary_select!(),
    "WHERE l.active = 1 ORDER BY l.created_at DESC, l.id DESC"
);

/// 카테고리별 진행 중인 상품 조회
pub const GET_LISTINGS_IN_CATEGORY: &str = concat!(
    listing_summary_select!(),
    "WHERE l.active = 1 AND l.category = $1 ORDER BY l.created_at DESC, l.id DESC"
);

/// 관심 목록 상품 조회
pub const GET_WATCHLIST: &str = concat!(
    listing_summary_select!(),
    "JOIN watchlist w ON w.listing_id = l.id WHERE w.user_id = $1 ORDER BY l.created_at DESC, l.id DESC"
);

/// 진행 중인 상품 수
pub const COUNT_ACTIVE_LISTINGS: &str = "SELECT COUNT(*) FROM listings WHERE active = 1";

/// 카테고리 목록 (빈 카테고리 제외)
pub const GET_CATEGORIES: &str = r#"
    SELECT category, COUNT(*) AS count
    FROM listings
    WHERE active = 1 AND category <> ''
    GROUP BY category
    ORDER BY category
"#;

/// 상품 생성
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (owner_id, title, description, category, starting_bid, img_url, active, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, 1, $7)
    RETURNING id
"#;

/// 경매 종료
pub const CLOSE_LISTING: &str = "UPDATE listings SET active = 0 WHERE id = $1";

/// 조건부 입찰: 진행 중이고, 입찰이 없으면 시작가 이상, 있으면 최고가 초과일 때만 삽입
pub const PLACE_BID: &str = r#"
    INSERT INTO bids (listing_id, user_id, amount, created_at)
    SELECT l.id, $2, $3, $4
    FROM listings l
    WHERE l.id = $1
      AND l.active = 1
      AND (
        (NOT EXISTS (SELECT 1 FROM bids b WHERE b.listing_id = l.id) AND $3 >= l.starting_bid)
        OR $3 > (SELECT MAX(b.amount) FROM bids b WHERE b.listing_id = l.id)
      )
    RETURNING id
"#;

/// 입찰 조회
pub const GET_BID: &str = r#"
    SELECT b.id, b.listing_id, b.user_id, u.username, b.amount, b.created_at
    FROM bids b
    JOIN users u ON u.id = b.user_id
    WHERE b.id = $1
"#;

/// 최고 입찰 조회
pub const GET_HIGHEST_BID: &str = r#"
    SELECT b.id, b.listing_id, b.user_id, u.username, b.amount, b.created_at
    FROM bids b
    JOIN users u ON u.id = b.user_id
    WHERE b.listing_id = $1
    ORDER BY b.amount DESC, b.id ASC
    LIMIT 1
"#;

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT b.id, b.listing_id, b.user_id, u.username, b.amount, b.created_at
    FROM bids b
    JOIN users u ON u.id = b.user_id
    WHERE b.listing_id = $1
    ORDER BY b.created_at DESC, b.id DESC
"#;

/// 댓글 생성
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (listing_id, user_id, text, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id
"#;

/// 댓글 조회
pub const GET_COMMENT: &str = r#"
    SELECT c.id, c.listing_id, c.user_id, u.username, c.text, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
    WHERE c.id = $1
"#;

/// 상품 댓글 조회 (최신순)
pub const GET_COMMENTS: &str = r#"
    SELECT c.id, c.listing_id, c.user_id, u.username, c.text, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
    WHERE c.listing_id = $1
    ORDER BY c.created_at DESC, c.id DESC
"#;

/// 관심 목록 관계
pub const WATCH: Relation = Relation {
    name: "watchlist",
    exists: "SELECT user_id FROM watchlist WHERE user_id = $1 AND listing_id = $2",
    insert: "INSERT INTO watchlist (user_id, listing_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    delete: "DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2",
};
