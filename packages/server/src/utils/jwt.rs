use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::entity::user;

/// How long an issued token stays valid, in seconds (one day).
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing key is not configured")]
    MissingKey,
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims carried by every bearer token.
///
/// Validators must check `sub` (user id), `name` (display name) and `exp`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, as a decimal string.
    pub sub: String,
    /// Display name at the time of issue.
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Sign a new token for `user`, expiring one day from now.
pub fn issue(user: &user::Model, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingKey);
    }

    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        name: user.known_as.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
    };

    let token = encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify the signature and expiry of a token and return its claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingKey);
    }

    let mut validation = Validation::new(ALGORITHM);
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
