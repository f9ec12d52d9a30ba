use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 사용자 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// 회원가입 명령
#[derive(Deserialize)]
pub struct RegisterCommand {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

// 로그인 명령
#[derive(Deserialize)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}
