/// 사용자 관련 커맨드 처리
/// 1. 회원가입
/// 2. 로그인
// region:    --- Imports
use super::model::{LoginCommand, RegisterCommand, User};
use super::password::{hash_password, verify_password};
use super::queries;
use crate::database::DatabaseManager;
use crate::error::{map_unique, AppError, AppResult, FieldErrors};
use crate::validation::required_text;
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{info, warn};

// endregion: --- Imports

pub const MAX_USERNAME_LENGTH: usize = 150;

// region:    --- Commands

/// 1. 회원가입
pub async fn register(db_manager: &DatabaseManager, cmd: RegisterCommand) -> AppResult<User> {
    info!("{:<12} --> 회원가입 요청: {}", "Command", cmd.username);

    let mut errors = FieldErrors::new();
    let username = required_text(&mut errors, "username", &cmd.username, MAX_USERNAME_LENGTH);
    if cmd.password.is_empty() {
        errors.add("password", crate::validation::REQUIRED);
    } else if cmd.password != cmd.confirmation {
        errors.add("confirmation", "Passwords must match.");
    }
    errors.into_result(())?;

    let user = sqlx::query_as::<_, User>(queries::INSERT_USER)
        .bind(&username)
        .bind(cmd.email.trim())
        .bind(hash_password(&cmd.password))
        .bind(Utc::now())
        .fetch_one(db_manager.pool())
        .await
        .map_err(|e| map_unique(e, "Username already taken."))?;

    info!("{:<12} --> 회원가입 성공 id: {}", "Command", user.id);
    Ok(user)
}

/// 2. 로그인
pub async fn authenticate(db_manager: &DatabaseManager, cmd: LoginCommand) -> AppResult<User> {
    info!("{:<12} --> 로그인 요청: {}", "Command", cmd.username);

    let user = sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
        .bind(cmd.username.trim())
        .fetch_optional(db_manager.pool())
        .await?;

    match user {
        Some(user) if verify_password(&cmd.password, &user.password_hash) => Ok(user),
        _ => {
            warn!("{:<12} --> 로그인 실패: {}", "Command", cmd.username);
            Err(AppError::Unauthorized(
                "Invalid username and/or password.".to_string(),
            ))
        }
    }
}

/// 사용자 조회
pub async fn find_user(conn: &mut SqliteConnection, user_id: i64) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(queries::GET_USER)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

/// 존재하는 사용자 조회 (없으면 404)
pub async fn require_user(conn: &mut SqliteConnection, user_id: i64) -> AppResult<User> {
    find_user(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;

    fn register_cmd(username: &str, password: &str, confirmation: &str) -> RegisterCommand {
        RegisterCommand {
            username: username.to_string(),
            email: format!("{}@test.com", username),
            password: password.to_string(),
            confirmation: confirmation.to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let user = register(&db_manager, register_cmd("Mike", "12345", "12345"))
            .await
            .unwrap();
        assert_eq!(user.username, "Mike");

        let logged_in = authenticate(
            &db_manager,
            LoginCommand {
                username: "Mike".to_string(),
                password: "12345".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_reported() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        register(&db_manager, register_cmd("Mike", "pw", "pw"))
            .await
            .unwrap();
        let err = register(&db_manager, register_cmd("Mike", "pw", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(msg) if msg == "Username already taken."));
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let err = register(&db_manager, register_cmd("Mike", "pw", "other"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Passwords must match.");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        register(&db_manager, register_cmd("Mike", "pw", "pw"))
            .await
            .unwrap();
        let err = authenticate(
            &db_manager,
            LoginCommand {
                username: "Mike".to_string(),
                password: "nope".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
