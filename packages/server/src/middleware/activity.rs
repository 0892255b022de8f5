//! Last-active tracking for authenticated callers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::entity::user;
use crate::extractors::auth::bearer_claims;
use crate::state::AppState;

/// Stamp the caller's `last_active` after any successful request carrying a
/// valid bearer token. Requests without one pass through untouched.
pub async fn track_activity(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let user_id = bearer_claims(request.headers(), &state.config.auth.jwt_secret)
        .ok()
        .and_then(|claims| claims.user_id());

    let response = next.run(request).await;

    if let Some(user_id) = user_id
        && response.status().is_success()
    {
        let result = user::Entity::update_many()
            .col_expr(user::Column::LastActive, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(user_id))
            .exec(&state.db)
            .await;
        if let Err(e) = result {
            tracing::warn!(user_id, "Failed to update last_active: {}", e);
        }
    }

    response
}
