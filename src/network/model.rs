use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_POST_LENGTH: usize = 200;

// 게시글 모델 (좋아요 수, 조회자 좋아요 여부 포함)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub liked: bool,
}

// 프로필
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub followers: i64,
    pub following: i64,
    pub is_following: bool,
}

// 팔로우 관계
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Follow {
    pub from_user: String,
    pub to_user: String,
}

impl std::fmt::Display for Follow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is following {}", self.from_user, self.to_user)
    }
}

// 게시글 작성/수정 폼
#[derive(Debug, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
}

// 페이지 요청
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// 숫자가 아닌 페이지 요청은 1페이지
    pub fn number(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// 페이지 위치 계산
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub num_pages: i64,
    pub per_page: i64,
    pub count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    /// 범위를 벗어난 페이지는 가장 가까운 유효 페이지로 보정
    pub fn new(requested: i64, count: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        let count = count.max(0);
        let num_pages = (count / per_page + i64::from(count % per_page != 0)).max(1);
        let page = requested.clamp(1, num_pages);
        Self {
            page,
            num_pages,
            per_page,
            count,
            has_next: page < num_pages,
            has_previous: page > 1,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

// 페이지 결과
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_pages() {
        let p = Pagination::new(9, 25, 10);
        assert_eq!(p.page, 3);
        assert_eq!(p.num_pages, 3);
        assert!(!p.has_next);
        assert!(p.has_previous);
        assert_eq!(p.offset(), 20);

        let p = Pagination::new(-4, 25, 10);
        assert_eq!(p.page, 1);
        assert!(p.has_next);
        assert!(!p.has_previous);
    }

    #[test]
    fn empty_result_has_one_page() {
        let p = Pagination::new(1, 0, 10);
        assert_eq!(p.num_pages, 1);
        assert_eq!(p.offset(), 0);
        assert!(!p.has_next);
    }

    #[test]
    fn huge_page_size_does_not_overflow() {
        let p = Pagination::new(1, 5, i64::MAX);
        assert_eq!(p.num_pages, 1);
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(3, i64::MAX, 1);
        assert_eq!(p.num_pages, i64::MAX);
        assert_eq!(p.offset(), 2);

        let p = Pagination::new(i64::MAX, i64::MAX, i64::MAX);
        assert_eq!(p.page, 1);
        assert!(!p.has_next);
    }

    #[test]
    fn non_numeric_page_is_first_page() {
        let q = PageQuery {
            page: Some("abc".to_string()),
        };
        assert_eq!(q.number(), 1);
        assert_eq!(PageQuery::default().number(), 1);
    }

    #[test]
    fn follow_reads_naturally() {
        let follow = Follow {
            from_user: "James".to_string(),
            to_user: "Mike".to_string(),
        };
        assert_eq!(follow.to_string(), "James is following Mike");
    }
}
