mod common;

mod auth;
mod likes;
