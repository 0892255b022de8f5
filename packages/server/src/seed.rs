use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::Index;
use sea_orm::*;
use serde::Deserialize;
use tracing::info;

use crate::entity::{photo, user, user_like};
use crate::services::credentials::normalize_username;
use crate::utils::password;

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't create secondary or partial indexes, so we
/// create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    // Photo lookups by owner: list, main photo, main-photo flips.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_photo_user")
        .table(photo::Entity)
        .col(photo::Column::UserId)
        .to_owned();
    report_index("idx_photo_user", db.execute(backend.build(&stmt)).await);

    // "Who liked me" lookups; the primary key already covers the liker side.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_user_like_likee")
        .table(user_like::Entity)
        .col(user_like::Column::LikeeId)
        .to_owned();
    report_index("idx_user_like_likee", db.execute(backend.build(&stmt)).await);

    // At most one main photo per user. This one is load-bearing, so failure
    // is an error rather than a warning.
    db.execute_unprepared(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_photo_single_main ON photo (user_id) WHERE is_main",
    )
    .await?;
    info!("Ensured index idx_photo_single_main exists");

    Ok(())
}

fn report_index(name: &str, result: Result<ExecResult, DbErr>) {
    match result {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub known_as: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub introduction: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photos: Vec<SeedPhoto>,
}

#[derive(Debug, Deserialize)]
pub struct SeedPhoto {
    pub url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_main: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Seed demo users from a JSON file when the `user` table is empty.
///
/// Returns the number of users inserted. Seeded photos have no remote
/// object (`public_id` is null).
pub async fn seed_users(db: &DatabaseConnection, path: &Path) -> Result<usize, SeedError> {
    if user::Entity::find().count(db).await? > 0 {
        info!("User table not empty, skipping seed");
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path).await?;
    let users: Vec<SeedUser> = serde_json::from_str(&raw)?;

    let count = users.len();
    for seed in users {
        insert_seed_user(db, seed).await?;
    }

    info!("Seeded {} users from {}", count, path.display());
    Ok(count)
}

async fn insert_seed_user(db: &DatabaseConnection, seed: SeedUser) -> Result<(), DbErr> {
    let username = normalize_username(&seed.username);
    let digest = password::hash_password(&seed.password);
    let now = Utc::now();

    let txn = db.begin().await?;

    let user = user::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(digest.hash),
        password_salt: Set(digest.salt),
        known_as: Set(seed.known_as.unwrap_or(username)),
        gender: Set(seed.gender.map(|g| g.to_lowercase())),
        date_of_birth: Set(seed.date_of_birth),
        city: Set(seed.city),
        country: Set(seed.country),
        introduction: Set(seed.introduction),
        looking_for: Set(seed.looking_for),
        interests: Set(seed.interests),
        created: Set(seed.created.unwrap_or(now)),
        last_active: Set(seed.last_active.unwrap_or(now)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let main_index = seed
        .photos
        .iter()
        .position(|p| p.is_main)
        .or(if seed.photos.is_empty() { None } else { Some(0) });

    for (i, p) in seed.photos.into_iter().enumerate() {
        photo::ActiveModel {
            user_id: Set(user.id),
            url: Set(p.url),
            public_id: Set(None),
            description: Set(p.description),
            date_added: Set(now),
            is_main: Set(Some(i) == main_index),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await
}
