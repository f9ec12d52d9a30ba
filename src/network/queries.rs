use crate::relations::Relation;

/// 게시글 조회 SELECT 절. $1 = 조회자 id (비로그인 시 0)
macro_rules! post_select {
    () => {
        r#"
    SELECT p.id, p.user_id, u.username, p.text, p.created_at,
           (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS likes,
           EXISTS (SELECT 1 FROM post_likes pl WHERE pl.post_id = p.id AND pl.user_id = $1) AS liked
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#
    };
}

/// 게시글 조회
pub const GET_POST: &str = concat!(post_select!(), "WHERE p.id = $2");

/// 전체 게시글 (최신순)
pub const GET_ALL_POSTS: &str = concat!(
    post_select!(),
    "ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3"
);

/// 사용자 게시글 (최신순)
pub const GET_POSTS_FROM_USER: &str = concat!(
    post_select!(),
    "WHERE p.user_id = $2 ORDER BY p.created_at DESC, p.id DESC LIMIT $3 OFFSET $4"
);

/// 팔로우한 사용자들의 게시글 (최신순)
pub const GET_POSTS_FROM_FOLLOWED: &str = concat!(
    post_select!(),
    "WHERE p.user_id IN (SELECT f.to_user_id FROM follows f WHERE f.from_user_id = $2) ",
    "ORDER BY p.created_at DESC, p.id DESC LIMIT $3 OFFSET $4"
);

pub const COUNT_ALL_POSTS: &str = "SELECT COUNT(*) FROM posts";

pub const COUNT_POSTS_FROM_USER: &str = "SELECT COUNT(*) FROM posts WHERE user_id = $1";

pub const COUNT_POSTS_FROM_FOLLOWED: &str = r#"
    SELECT COUNT(*) FROM posts
    WHERE user_id IN (SELECT to_user_id FROM follows WHERE from_user_id = $1)
"#;

/// 게시글 작성
pub const INSERT_POST: &str =
    "INSERT INTO posts (user_id, text, created_at) VALUES ($1, $2, $3) RETURNING id";

/// 게시글 작성자 조회
pub const GET_POST_OWNER: &str = "SELECT user_id FROM posts WHERE id = $1";

/// 게시글 수정
pub const UPDATE_POST: &str = "UPDATE posts SET text = $1 WHERE id = $2";

/// 좋아요 수
pub const COUNT_LIKES: &str = "SELECT COUNT(*) FROM post_likes WHERE post_id = $1";

/// 프로필 조회. $1 = 대상, $2 = 조회자 (비로그인 시 0)
pub const GET_PROFILE: &str = r#"
    SELECT u.id, u.username,
           (SELECT COUNT(*) FROM follows f WHERE f.to_user_id = u.id) AS followers,
           (SELECT COUNT(*) FROM follows f WHERE f.from_user_id = u.id) AS following,
           EXISTS (SELECT 1 FROM follows f WHERE f.from_user_id = $2 AND f.to_user_id = u.id) AS is_following
    FROM users u
    WHERE u.id = $1
"#;

/// 좋아요 관계 (사용자 -> 게시글)
pub const LIKE: Relation = Relation {
    name: "like",
    exists: "SELECT user_id FROM post_likes WHERE user_id = $1 AND post_id = $2",
    insert: "INSERT INTO post_likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    delete: "DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2",
};

/// 팔로우 관계 (팔로워 -> 대상)
pub const FOLLOW: Relation = Relation {
    name: "follow",
    exists: "SELECT id FROM follows WHERE from_user_id = $1 AND to_user_id = $2",
    insert: "INSERT INTO follows (from_user_id, to_user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    delete: "DELETE FROM follows WHERE from_user_id = $1 AND to_user_id = $2",
};
