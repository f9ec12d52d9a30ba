// region:    --- Imports
use super::model::{Page, Pagination, Post, Profile};
use super::queries;
use crate::error::{AppError, AppResult};
use sqlx::SqliteConnection;
use tracing::info;

// endregion: --- Imports

/// 비로그인 조회자는 존재하지 않는 id 0으로 바인딩
fn viewer_id(viewer: Option<i64>) -> i64 {
    viewer.unwrap_or(0)
}

// region:    --- Posts

/// 게시글 조회 (없으면 404)
pub async fn get_post(
    conn: &mut SqliteConnection,
    post_id: i64,
    viewer: Option<i64>,
) -> AppResult<Post> {
    sqlx::query_as::<_, Post>(queries::GET_POST)
        .bind(viewer_id(viewer))
        .bind(post_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found."))
}

/// 전체 게시글 (최신순, 페이지 단위)
pub async fn posts_from_all_users(
    conn: &mut SqliteConnection,
    viewer: Option<i64>,
    page: i64,
    per_page: i64,
) -> AppResult<Page<Post>> {
    info!("{:<12} --> 전체 게시글 조회 page: {}", "Query", page);
    let count: i64 = sqlx::query_scalar(queries::COUNT_ALL_POSTS)
        .fetch_one(&mut *conn)
        .await?;
    let pagination = Pagination::new(page, count, per_page);

    let items = sqlx::query_as::<_, Post>(queries::GET_ALL_POSTS)
        .bind(viewer_id(viewer))
        .bind(pagination.per_page)
        .bind(pagination.offset())
        .fetch_all(conn)
        .await?;
    Ok(Page { pagination, items })
}

/// 사용자 게시글 (최신순, 페이지 단위)
pub async fn posts_from_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    viewer: Option<i64>,
    page: i64,
    per_page: i64,
) -> AppResult<Page<Post>> {
    info!("{:<12} --> 사용자 게시글 조회 user: {}", "Query", user_id);
    let count: i64 = sqlx::query_scalar(queries::COUNT_POSTS_FROM_USER)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    let pagination = Pagination::new(page, count, per_page);

    let items = sqlx::query_as::<_, Post>(queries::GET_POSTS_FROM_USER)
        .bind(viewer_id(viewer))
        .bind(user_id)
        .bind(pagination.per_page)
        .bind(pagination.offset())
        .fetch_all(conn)
        .await?;
    Ok(Page { pagination, items })
}

/// 팔로우한 사용자들의 게시글 (최신순, 페이지 단위)
pub async fn posts_from_users_followed_by(
    conn: &mut SqliteConnection,
    user_id: i64,
    page: i64,
    per_page: i64,
) -> AppResult<Page<Post>> {
    info!("{:<12} --> 팔로잉 피드 조회 user: {}", "Query", user_id);
    let count: i64 = sqlx::query_scalar(queries::COUNT_POSTS_FROM_FOLLOWED)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    let pagination = Pagination::new(page, count, per_page);

    let items = sqlx::query_as::<_, Post>(queries::GET_POSTS_FROM_FOLLOWED)
        .bind(user_id)
        .bind(user_id)
        .bind(pagination.per_page)
        .bind(pagination.offset())
        .fetch_all(conn)
        .await?;
    Ok(Page { pagination, items })
}

// endregion: --- Posts

// region:    --- Profile

/// 프로필 조회 (없으면 404)
pub async fn profile(
    conn: &mut SqliteConnection,
    user_id: i64,
    viewer: Option<i64>,
) -> AppResult<Profile> {
    sqlx::query_as::<_, Profile>(queries::GET_PROFILE)
        .bind(user_id)
        .bind(viewer_id(viewer))
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))
}

// endregion: --- Profile

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseManager;
    use crate::identity::commands::register;
    use crate::identity::model::RegisterCommand;
    use crate::identity::User;
    use crate::network::commands::{create_follow, create_post, toggle_like};
    use crate::network::model::PostForm;

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

    async fn post(conn: &mut SqliteConnection, user: &User, text: &str) -> Post {
        create_post(
            conn,
            user,
            PostForm {
                text: text.to_string(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn feed_contains_only_followed_users_newest_first() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "james").await;
        let mike = user(&db_manager, "mike").await;
        let anna = user(&db_manager, "anna").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        post(&mut conn, &mike, "first").await;
        post(&mut conn, &anna, "not followed").await;
        post(&mut conn, &mike, "second").await;
        create_follow(&mut conn, &james, mike.id).await.unwrap();

        let feed = posts_from_users_followed_by(&mut conn, james.id, 1, 10)
            .await
            .unwrap();
        let texts: Vec<&str> = feed.items.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(feed.pagination.count, 2);
    }

    #[tokio::test]
    async fn posts_are_annotated_with_likes() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "james").await;
        let mike = user(&db_manager, "mike").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        let hello = post(&mut conn, &james, "hello").await;
        toggle_like(&mut conn, &mike, hello.id).await.unwrap();

        let as_mike = get_post(&mut conn, hello.id, Some(mike.id)).await.unwrap();
        assert_eq!(as_mike.likes, 1);
        assert!(as_mike.liked);

        let anonymous = get_post(&mut conn, hello.id, None).await.unwrap();
        assert!(!anonymous.liked);
    }

    #[tokio::test]
    async fn pages_split_posts() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "james").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        for i in 0..12 {
            post(&mut conn, &james, &format!("post {}", i)).await;
        }

        let first = posts_from_all_users(&mut conn, None, 1, 10).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert!(first.pagination.has_next);

        let last = posts_from_user(&mut conn, james.id, None, 99, 10)
            .await
            .unwrap();
        assert_eq!(last.pagination.page, 2);
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.items[1].text, "post 0");
    }

    #[tokio::test]
    async fn profile_counts_follows() {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let james = user(&db_manager, "james").await;
        let mike = user(&db_manager, "mike").await;
        let mut conn = db_manager.pool().acquire().await.unwrap();

        create_follow(&mut conn, &james, mike.id).await.unwrap();

        let mike_profile = profile(&mut conn, mike.id, Some(james.id)).await.unwrap();
        assert_eq!(mike_profile.followers, 1);
        assert_eq!(mike_profile.following, 0);
        assert!(mike_profile.is_following);

        assert!(matches!(
            profile(&mut conn, 999, None).await,
            Err(AppError::NotFound(_))
        ));
    }
}
