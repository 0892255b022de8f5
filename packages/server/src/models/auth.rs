use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (1-32 chars, alphanumeric and underscores). Case-insensitive.
    #[schema(example = "alice")]
    pub username: String,
    /// Password (4-8 characters).
    #[schema(example = "pass1")]
    pub password: String,
    /// Display name; defaults to the username.
    #[schema(example = "Alice")]
    pub known_as: Option<String>,
    /// `male` or `female`.
    #[schema(example = "female")]
    pub gender: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "1994-05-17")]
    pub date_of_birth: Option<NaiveDate>,
    #[schema(example = "Lisbon")]
    pub city: Option<String>,
    #[schema(example = "Portugal")]
    pub country: Option<String>,
}

/// Accepted gender values.
pub const GENDERS: &[&str] = &["male", "female"];

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    let password_len = payload.password.chars().count();
    if !(4..=8).contains(&password_len) {
        return Err(AppError::Validation(
            "Password must be 4-8 characters".into(),
        ));
    }
    if let Some(known_as) = &payload.known_as {
        validate_known_as(known_as)?;
    }
    if let Some(gender) = &payload.gender
        && !GENDERS.contains(&gender.trim().to_lowercase().as_str())
    {
        return Err(AppError::Validation(
            "Gender must be one of: male, female".into(),
        ));
    }
    if let Some(dob) = payload.date_of_birth
        && dob > chrono::Utc::now().date_naive()
    {
        return Err(AppError::Validation(
            "Date of birth cannot be in the future".into(),
        ));
    }
    Ok(())
}

/// Validate a trimmed display name (1-64 characters).
pub fn validate_known_as(known_as: &str) -> Result<(), AppError> {
    let known_as = known_as.trim();
    if known_as.is_empty() || known_as.chars().count() > 64 {
        return Err(AppError::Validation(
            "Known-as name must be 1-64 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Username of the account to log into (case-insensitive).
    #[schema(example = "alice")]
    pub username: String,
    /// Account password.
    #[schema(example = "pass1")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    /// ID of the newly created user.
    #[schema(example = 42)]
    pub id: i32,
    /// Stored (lower-cased) username.
    #[schema(example = "alice")]
    pub username: String,
}

impl From<user::Model> for RegisterResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// HS512 JWT bearer token valid for 1 day.
    #[schema(example = "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Alice")]
    pub known_as: String,
    /// URL of the user's main photo, if any.
    pub photo_url: Option<String>,
}

/// Current authenticated user, as read from the token.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    /// Display name carried in the token.
    #[schema(example = "Alice")]
    pub name: String,
}
