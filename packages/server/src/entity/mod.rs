pub mod photo;
pub mod user;
pub mod user_like;
