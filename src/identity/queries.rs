/// 사용자 조회
pub const GET_USER: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1";

/// 사용자명으로 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";

/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, username, email, password_hash, created_at
"#;
