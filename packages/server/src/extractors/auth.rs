use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{self, Claims, TokenError};

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. Operations that
/// act on a specific identity check ownership via `require_self()`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    /// Display name carried in the token.
    pub name: String,
}

impl AuthUser {
    /// Returns `Ok(())` if the caller is `user_id`, `Err(Unauthorized)` otherwise.
    pub fn require_self(&self, user_id: i32) -> Result<(), AppError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

/// Verify the bearer token in `headers` and return its claims.
pub fn bearer_claims(headers: &HeaderMap, secret: &str) -> Result<Claims, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::TokenMissing)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;

    jwt::verify(token, secret).map_err(|e| match e {
        TokenError::MissingKey => AppError::from(e),
        TokenError::Jwt(_) => AppError::TokenInvalid,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(&parts.headers, &state.config.auth.jwt_secret)?;
        let user_id = claims.user_id().ok_or(AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id,
            name: claims.name,
        })
    }
}
