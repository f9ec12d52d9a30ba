/// 다대다 멤버십 관계 (관심 목록, 좋아요, 팔로우)
/// 모든 쓰기는 유니크 제약을 키로 하는 조건부 쓰기로 처리한다.
// region:    --- Imports
use sqlx::{Connection, SqliteConnection};
use tracing::debug;

// endregion: --- Imports

// region:    --- Relation

/// 관계 테이블별 SQL. 파라미터는 모두 ($1 = 주체, $2 = 대상)
pub struct Relation {
    pub name: &'static str,
    pub exists: &'static str,
    pub insert: &'static str,
    pub delete: &'static str,
}

/// 관계 존재 여부
pub async fn exists(
    conn: &mut SqliteConnection,
    relation: &Relation,
    subject: i64,
    target: i64,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar(relation.exists)
        .bind(subject)
        .bind(target)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

/// 관계 생성. 이미 있으면 false
pub async fn insert(
    conn: &mut SqliteConnection,
    relation: &Relation,
    subject: i64,
    target: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(relation.insert)
        .bind(subject)
        .bind(target)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// 관계 삭제. 없었으면 false
pub async fn delete(
    conn: &mut SqliteConnection,
    relation: &Relation,
    subject: i64,
    target: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(relation.delete)
        .bind(subject)
        .bind(target)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// 토글: 있으면 삭제, 없으면 생성. 토글 후의 멤버십 상태를 돌려준다
pub async fn toggle(
    conn: &mut SqliteConnection,
    relation: &Relation,
    subject: i64,
    target: i64,
) -> Result<bool, sqlx::Error> {
    let mut tx = conn.begin().await?;

    let member = if delete(&mut tx, relation, subject, target).await? {
        false
    } else {
        insert(&mut tx, relation, subject, target).await?
    };

    tx.commit().await?;
    debug!(
        "{:<12} --> {} 토글 ({} -> {}): {}",
        "Relation", relation.name, subject, target, member
    );
    Ok(member)
}

// endregion: --- Relation
