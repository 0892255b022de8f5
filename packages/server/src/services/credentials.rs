use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    SqlErr,
};

use crate::entity::user;
use crate::error::AppError;
use crate::utils::password;

/// Profile attributes captured at registration.
#[derive(Debug, Default, Clone)]
pub struct NewProfile {
    pub known_as: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Usernames are compared and stored lower-cased.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Registers identities and verifies their passwords.
pub struct CredentialService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CredentialService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Case-insensitive existence check.
    pub async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(normalize_username(username)))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Create a new identity with a freshly salted password hash.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        profile: NewProfile,
    ) -> Result<user::Model, AppError> {
        let username = normalize_username(username);
        if self.exists(&username).await? {
            return Err(AppError::UsernameTaken);
        }

        let digest = password::hash_password(password);
        let now = Utc::now();

        let new_user = user::ActiveModel {
            username: Set(username.clone()),
            password_hash: Set(digest.hash),
            password_salt: Set(digest.salt),
            known_as: Set(profile
                .known_as
                .map(|k| k.trim().to_string())
                .unwrap_or_else(|| username.clone())),
            gender: Set(profile.gender.map(|g| g.trim().to_lowercase())),
            date_of_birth: Set(profile.date_of_birth),
            city: Set(profile.city),
            country: Set(profile.country),
            introduction: Set(None),
            looking_for: Set(None),
            interests: Set(None),
            created: Set(now),
            last_active: Set(now),
            ..Default::default()
        };

        new_user
            .insert(self.conn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    tracing::debug!("Registration race condition: unique constraint caught on insert");
                    AppError::UsernameTaken
                }
                _ => AppError::from(e),
            })
    }

    /// Return the identity if `password` matches the stored hash.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> Result<user::Model, AppError> {
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(normalize_username(username)))
            .one(self.conn)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash, &user.password_salt) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }
}
