/// 사용자 등록/로그인 및 요청 사용자 식별
pub mod commands;
pub mod extractor;
pub mod handlers;
pub mod model;
pub mod password;
pub mod queries;

pub use extractor::{CurrentUser, MaybeUser, USER_ID_HEADER};
pub use model::User;
