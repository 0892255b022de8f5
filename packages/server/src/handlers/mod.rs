pub mod auth;
pub mod photos;
pub mod users;
