// region:    --- Stores

pub const INSERT_STORE: &str =
    "INSERT INTO stores (owner_id, name) VALUES ($1, $2) RETURNING id, owner_id, name";

pub const GET_STORES_FOR_OWNER: &str =
    "SELECT id, owner_id, name FROM stores WHERE owner_id = $1 ORDER BY name";

/// 소유자 본인의 매장만 조회
pub const GET_STORE: &str = "SELECT id, owner_id, name FROM stores WHERE id = $1 AND owner_id = $2";

pub const RENAME_STORE: &str = "UPDATE stores SET name = $1 WHERE id = $2 AND owner_id = $3";

pub const DELETE_STORE: &str = "DELETE FROM stores WHERE id = $1 AND owner_id = $2";

// endregion: --- Stores

// region:    --- Sessions

pub const INSERT_SESSION: &str = r#"
    INSERT INTO stock_sessions (store_id, name, start_date, end_date)
    VALUES ($1, $2, $3, $4)
    RETURNING id, store_id, name, start_date, end_date
"#;

pub const GET_SESSIONS_FOR_STORE: &str = r#"
    SELECT id, store_id, name, start_date, end_date
    FROM stock_sessions
    WHERE store_id = $1
    ORDER BY start_date DESC, id DESC
"#;

/// 매장 소유자 기준 조사 기간 조회
pub const GET_SESSION: &str = r#"
    SELECT s.id, s.store_id, s.name, s.start_date, s.end_date
    FROM stock_sessions s
    JOIN stores st ON st.id = s.store_id
    WHERE s.id = $1 AND st.owner_id = $2
"#;

// endregion: --- Sessions

// region:    --- Lists

pub const INSERT_LIST: &str = r#"
    INSERT INTO lists (session_id, owner_id, name, list_type, origin, date_added)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, session_id, owner_id, name, list_type, origin, date_added
"#;

pub const GET_LIST: &str = r#"
    SELECT id, session_id, owner_id, name, list_type, origin, date_added
    FROM lists
    WHERE id = $1 AND owner_id = $2
"#;

/// 매장의 모든 목록과 항목 수
pub const GET_LISTS_FOR_STORE: &str = r#"
    SELECT l.id, l.name, l.list_type, COUNT(li.id) AS count
    FROM lists l
    JOIN stock_sessions s ON s.id = l.session_id
    LEFT JOIN list_items li ON li.list_id = l.id
    WHERE s.store_id = $1
    GROUP BY l.id, l.name, l.list_type
    ORDER BY l.id
"#;

/// 목록이 속한 매장
pub const GET_LIST_STORE: &str = r#"
    SELECT s.store_id
    FROM lists l
    JOIN stock_sessions s ON s.id = l.session_id
    WHERE l.id = $1
"#;

// endregion: --- Lists

// region:    --- Items

pub const INSERT_ITEM: &str =
    "INSERT INTO items (store_id, name) VALUES ($1, $2) RETURNING id, store_id, name";

pub const GET_ITEM: &str = "SELECT id, store_id, name FROM items WHERE id = $1 AND store_id = $2";

pub const GET_ITEM_BY_NAME: &str =
    "SELECT id, store_id, name FROM items WHERE store_id = $1 AND name = $2";

pub const GET_ITEMS_FOR_STORE: &str =
    "SELECT id, store_id, name FROM items WHERE store_id = $1 ORDER BY id";

/// 매장 품목들의 목록 항목
pub const GET_LIST_ITEMS_FOR_STORE: &str = r#"
    SELECT li.id, li.list_id, li.item_id, li.amount
    FROM list_items li
    JOIN items i ON i.id = li.item_id
    WHERE i.store_id = $1
    ORDER BY li.id
"#;

// endregion: --- Items

// region:    --- List Items

pub const INSERT_LIST_ITEM: &str = r#"
    INSERT INTO list_items (list_id, item_id, amount)
    VALUES ($1, $2, $3)
    RETURNING id, list_id, item_id, amount
"#;

/// 같은 (목록, 품목) 항목이 있으면 수량 갱신
pub const UPDATE_LIST_ITEM: &str = r#"
    UPDATE list_items SET amount = $3
    WHERE id = (SELECT id FROM list_items WHERE list_id = $1 AND item_id = $2 ORDER BY id LIMIT 1)
    RETURNING id, list_id, item_id, amount
"#;

// endregion: --- List Items

// region:    --- Stock Totals

/// 조사 기간 내 품목별 종류별 합계. $1 = 조사 기간
macro_rules! stock_totals_select {
    () => {
        r#"
    SELECT i.id AS item_id, i.name,
           COALESCE(SUM(CASE WHEN l.list_type = 'AD' THEN li.amount END), 0) AS total_added,
           COALESCE(SUM(CASE WHEN l.list_type = 'SU' THEN li.amount END), 0) AS total_subtracted,
           COALESCE(SUM(CASE WHEN l.list_type = 'CO' THEN li.amount END), 0) AS total_counted
    FROM stock_sessions s
    JOIN items i ON i.store_id = s.store_id
    LEFT JOIN lists l ON l.session_id = s.id
    LEFT JOIN list_items li ON li.list_id = l.id AND li.item_id = i.id
    WHERE s.id = $1
"#
    };
}

pub const GET_STOCK_TOTALS: &str = concat!(
    stock_totals_select!(),
    "GROUP BY i.id, i.name ORDER BY i.name, i.id"
);

pub const GET_ITEM_STOCK_TOTALS: &str = concat!(
    stock_totals_select!(),
    "AND i.id = $2 GROUP BY i.id, i.name"
);

// endregion: --- Stock Totals
