use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::PAGINATION_HEADER;
use crate::models::user::{
    UpdateUserRequest, UserDetail, UserListItem, UserListQuery, validate_update_user,
};
use crate::services::directory::DirectoryService;
use crate::services::likes::LikeService;
use crate::services::photos::PhotoService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "Browse other users",
    description = "Returns one page of users other than the caller as a bare JSON array. Pagination metadata is sent in the `Pagination` response header as `{\"currentPage\",\"itemsPerPage\",\"totalItems\",\"totalPages\"}`. Gender defaults to the opposite of the caller's. Results are sorted by `last_active` (default) or `created`, newest first.",
    params(UserListQuery),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserListItem>,
            headers(("Pagination" = String, description = "JSON pagination metadata"))),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let query = query.into_directory_query()?;

    let page = DirectoryService::new(&state.db)
        .list(auth_user.user_id, &query)
        .await?;

    let items = UserListItem::from_page(page.users, &page.main_photos, Utc::now().date_naive());

    Ok((
        [(PAGINATION_HEADER, page.pagination.header_value())],
        Json(items),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user's profile",
    description = "Returns the full profile of a user, including all of their photos.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserDetail),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_user(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserDetail>, AppError> {
    let user = DirectoryService::new(&state.db).get(id).await?;
    let photos = PhotoService::new(&state.db).list_for_user(id).await?;

    Ok(Json(UserDetail::new(user, photos, Utc::now().date_naive())))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Users",
    operation_id = "updateUser",
    summary = "Update your own profile",
    description = "Partially updates the caller's profile. Omitted fields are left unchanged; nullable fields accept `null` to clear them. Only the profile owner may update it.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "Profile updated"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<StatusCode, AppError> {
    auth_user.require_self(id)?;
    validate_update_user(&payload)?;

    DirectoryService::new(&state.db)
        .update(id, payload.into())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/like/{recipient_id}",
    tag = "Users",
    operation_id = "likeUser",
    summary = "Like another user",
    description = "Records that user `id` (the caller) likes `recipient_id`. Each pair can be liked once.",
    params(
        ("id" = i32, Path, description = "Liker (caller) user ID"),
        ("recipient_id" = i32, Path, description = "Likee user ID"),
    ),
    responses(
        (status = 200, description = "Like recorded"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Recipient not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already liked (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn like_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, recipient_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    auth_user.require_self(id)?;

    LikeService::new(&state.db).add(id, recipient_id).await?;

    Ok(StatusCode::OK)
}
