/// 네트워크 커맨드 처리
/// 1. 게시글 작성/수정
/// 2. 좋아요 토글
/// 3. 팔로우/언팔로우
// region:    --- Imports
use super::model::{Follow, Post, PostForm, MAX_POST_LENGTH};
use super::{queries, query};
use crate::error::{AppError, AppResult};
use crate::identity::commands::require_user;
use crate::identity::User;
use crate::relations;
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Validation

/// 게시글 본문 검증 (1자 이상, 최대 길이 이하)
pub fn validate_post_text(text: &str) -> AppResult<String> {
    let text = text.trim();
    let length = text.chars().count();
    if length == 0 || length > MAX_POST_LENGTH {
        return Err(AppError::validation(
            "text",
            format!("Post should be {} characters or less", MAX_POST_LENGTH),
        ));
    }
    Ok(text.to_string())
}

// endregion: --- Validation

// region:    --- Posts

/// 1. 게시글 작성
pub async fn create_post(conn: &mut SqliteConnection, user: &User, form: PostForm) -> AppResult<Post> {
    info!("{:<12} --> 게시글 작성 user: {}", "Command", user.id);
    let text = validate_post_text(&form.text)?;

    let post_id: i64 = sqlx::query_scalar(queries::INSERT_POST)
        .bind(user.id)
        .bind(&text)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

    query::get_post(conn, post_id, Some(user.id)).await
}

/// 1. 게시글 수정 (작성자만 가능)
pub async fn update_post(
    conn: &mut SqliteConnection,
    user: &User,
    post_id: i64,
    form: PostForm,
) -> AppResult<Post> {
    info!("{:<12} --> 게시글 수정 post: {}", "Command", post_id);
    let owner_id: Option<i64> = sqlx::query_scalar(queries::GET_POST_OWNER)
        .bind(post_id)
        .fetch_optional(&mut *conn)
        .await?;

    match owner_id {
        None => return Err(AppError::not_found("Post not found.")),
        Some(owner_id) if owner_id != user.id => {
            warn!("{:<12} --> 작성자가 아닌 사용자의 수정 시도: {}", "Command", user.id);
            return Err(AppError::Forbidden(
                "You can only edit your own posts.".to_string(),
            ));
        }
        Some(_) => {}
    }

    let text = validate_post_text(&form.text)?;
    sqlx::query(queries::UPDATE_POST)
        .bind(&text)
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

    query::get_post(conn, post_id, Some(user.id)).await
}

// endregion: --- Posts

// region:    --- Likes

/// 2. 좋아요 토글. (좋아요 여부, 토글 후 좋아요 수)
pub async fn toggle_like(
    conn: &mut SqliteConnection,
    user: &User,
    post_id: i64,
) -> AppResult<(bool, i64)> {
    info!("{:<12} --> 좋아요 토글 post: {}", "Command", post_id);
    query::get_post(&mut *conn, post_id, None).await?;

    let liked = relations::toggle(&mut *conn, &queries::LIKE, user.id, post_id).await?;
    let likes: i64 = sqlx::query_scalar(queries::COUNT_LIKES)
        .bind(post_id)
        .fetch_one(conn)
        .await?;
    Ok((liked, likes))
}

// endregion: --- Likes

// region:    --- Follows

/// 3. 팔로우 생성. 이미 팔로우 중이면 `Duplicate`
pub async fn create_follow(
    conn: &mut SqliteConnection,
    from_user: &User,
    to_user_id: i64,
) -> AppResult<Follow> {
    info!(
        "{:<12} --> 팔로우 요청 {} -> {}",
        "Command", from_user.id, to_user_id
    );
    let to_user = require_user(&mut *conn, to_user_id).await?;
    if to_user.id == from_user.id {
        return Err(AppError::validation("user", "You cannot follow yourself."));
    }

    if !relations::insert(conn, &queries::FOLLOW, from_user.id, to_user_id).await? {
        return Err(AppError::Duplicate(format!(
            "{} is already following {}",
            from_user.username, to_user.username
        )));
    }
    Ok(Follow {
        from_user: from_user.username.clone(),
        to_user: to_user.username,
    })
}

/// 3. 팔로우 삭제. 팔로우 중이 아니면 `NotFound`
pub async fn delete_follow(
    conn: &mut SqliteConnection,
    from_user: &User,
    to_user_id: i64,
) -> AppResult<()> {
    info!(
        "{:<12} --> 언팔로우 요청 {} -> {}",
        "Command", from_user.id, to_user_id
    );
    let to_user = require_user(&mut *conn, to_user_id).await?;

    if !relations::delete(conn, &queries::FOLLOW, from_user.id, to_user_id).await? {
        return Err(AppError::not_found(format!(
            "{} is not following {}",
            from_user.username, to_user.username
        )));
    }
    Ok(())
}

// endregion: --- Follows

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseManager;
    use crate::identity::commands::register;
    use crate::identity::model::RegisterCommand;

    async fn user(db_manager: &DatabaseManager, name: &str) -> User {
        register(
            db_manager,
            RegisterCommand {
                username: name.to_string(),
                email: String::new(),
                password: "secret".to_string(),
                confirmation: "secret".to_string(),
            },
        )
        .await
        .unwrap()
    }

    fn form(text: &str) -> PostForm {
        PostForm {
            text: text.to_string(),
        }
    }

    #[test]
    fn post_length_is_bounded() {
        assert!(validate_post_text(&"a".repeat(MAX_POST_LENGTH)).is_ok());
        let err = validate_post_text(&"a".repeat(MAX_POST_LENGTH + 1)).unwrap_err();
        assert_eq!(err.to_string(), "Post should be 200 characters or less");
        assert!(validate_post_text("   ").is_err());
    }

    #[tokio::test]
    async fn long_posts_are_rejected_at_create_and_update() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "james").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        let long = "x".repeat(MAX_POST_LENGTH + 1);
        assert!(matches!(
            create_post(&mut conn, &james, form(&long)).await,
            Err(AppError::Validation(_))
        ));

        let post = create_post(&mut conn, &james, form("hello")).await.unwrap();
        assert!(matches!(
            update_post(&mut conn, &james, post.id, form(&long)).await,
            Err(AppError::Validation(_))
        ));
        let unchanged = query::get_post(&mut conn, post.id, None).await.unwrap();
        assert_eq!(unchanged.text, "hello");
    }

    #[tokio::test]
    async fn only_the_author_can_edit() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "james").await;
        let mike = user(&db_manager, "mike").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        let post = create_post(&mut conn, &james, form("hello")).await.unwrap();
        assert!(matches!(
            update_post(&mut conn, &mike, post.id, form("hijack")).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            update_post(&mut conn, &james, 999, form("gone")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn toggling_like_twice_restores_state() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "james").await;
        let mike = user(&db_manager, "mike").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        let post = create_post(&mut conn, &james, form("hello")).await.unwrap();
        assert_eq!(toggle_like(&mut conn, &mike, post.id).await.unwrap(), (true, 1));
        assert_eq!(toggle_like(&mut conn, &mike, post.id).await.unwrap(), (false, 0));
    }

    #[tokio::test]
    async fn follow_twice_and_unfollow_without_follow_fail() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "James").await;
        let mike = user(&db_manager, "Mike").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        let follow = create_follow(&mut conn, &james, mike.id).await.unwrap();
        assert_eq!(follow.to_string(), "James is following Mike");

        match create_follow(&mut conn, &james, mike.id).await {
            Err(AppError::Duplicate(message)) => {
                assert_eq!(message, "James is already following Mike")
            }
            other => panic!("expected duplicate, got {:?}", other),
        }

        delete_follow(&mut conn, &james, mike.id).await.unwrap();
        match delete_follow(&mut conn, &james, mike.id).await {
            Err(AppError::NotFound(message)) => assert_eq!(message, "James is not following Mike"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn self_and_unknown_follows_are_rejected() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "james").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        assert!(matches!(
            create_follow(&mut conn, &james, james.id).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create_follow(&mut conn, &james, 999).await,
            Err(AppError::NotFound(_))
        ));
    }
}
