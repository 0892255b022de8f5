pub mod credentials;
pub mod directory;
pub mod likes;
pub mod photos;
