use axum::{
    Json,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::photo::{PhotoResponse, PhotoUploadForm, validate_description};
use crate::services::photos::{PhotoService, PhotoUpload};
use crate::state::AppState;
use crate::utils::filename::validate_photo_filename;

/// Multipart overhead allowed on top of the configured photo size.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn photo_upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let max = usize::try_from(max_upload_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD))
}

#[utoipa::path(
    get,
    path = "/{photo_id}",
    tag = "Photos",
    operation_id = "getPhoto",
    summary = "Get a photo",
    params(
        ("id" = i32, Path, description = "Owner user ID"),
        ("photo_id" = i32, Path, description = "Photo ID"),
    ),
    responses(
        (status = 200, description = "Photo", body = PhotoResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_photo(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path((user_id, photo_id)): Path<(i32, i32)>,
) -> Result<Json<PhotoResponse>, AppError> {
    let photo = PhotoService::new(&state.db).get(photo_id).await?;
    if photo.user_id != user_id {
        return Err(AppError::NotFound("Photo not found".into()));
    }
    Ok(Json(PhotoResponse::from(photo)))
}

#[utoipa::path(
    get,
    path = "/main",
    tag = "Photos",
    operation_id = "getMainPhoto",
    summary = "Get a user's main photo",
    params(("id" = i32, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Main photo", body = PhotoResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User has no main photo (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_main_photo(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<PhotoResponse>, AppError> {
    let photo = PhotoService::new(&state.db).get_main(user_id).await?;
    Ok(Json(PhotoResponse::from(photo)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Photos",
    operation_id = "addPhoto",
    summary = "Upload a photo",
    description = "Uploads an image to the photo store (cropped to 500x500 around the face where the store supports it) and records it. The first photo a user adds becomes their main photo. Only the owner may upload.",
    params(("id" = i32, Path, description = "Owner user ID")),
    request_body(content = PhotoUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo added", body = PhotoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Photo store failure (UPLOAD_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn add_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_self(user_id)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .ok_or_else(|| AppError::Validation("File name is required".into()))?;
                let file_name = validate_photo_filename(file_name)
                    .map_err(|e| AppError::Validation(e.message().into()))?
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((file_name, data.to_vec()));
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid description: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    validate_description(text)?;
                    description = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::Validation("File is empty".into()));
    }
    let max = state.config.storage.max_upload_size;
    if data.len() as u64 > max {
        return Err(AppError::Validation(format!(
            "Photo exceeds maximum size of {max} bytes"
        )));
    }

    let photo = PhotoService::new(&state.db)
        .add(
            &*state.photo_store,
            user_id,
            PhotoUpload {
                data: &data,
                file_name: &file_name,
                description,
            },
        )
        .await?;

    tracing::info!(photo_id = photo.id, is_main = photo.is_main, "Photo added");
    Ok((StatusCode::CREATED, Json(PhotoResponse::from(photo))))
}

#[utoipa::path(
    post,
    path = "/{photo_id}/set-main",
    tag = "Photos",
    operation_id = "setMainPhoto",
    summary = "Make a photo the main photo",
    description = "Marks the photo as the owner's main photo and demotes the previous one. Only the owner may do this.",
    params(
        ("id" = i32, Path, description = "Owner user ID"),
        ("photo_id" = i32, Path, description = "Photo ID"),
    ),
    responses(
        (status = 204, description = "Main photo changed"),
        (status = 400, description = "Photo is already main (ALREADY_MAIN)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn set_main_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((user_id, photo_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    auth_user.require_self(user_id)?;

    PhotoService::new(&state.db).set_main(user_id, photo_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{photo_id}",
    tag = "Photos",
    operation_id = "deletePhoto",
    summary = "Delete a photo",
    description = "Deletes a non-main photo. Photos held in a remote store are removed there first; the record is kept unless the store confirms the deletion.",
    params(
        ("id" = i32, Path, description = "Owner user ID"),
        ("photo_id" = i32, Path, description = "Photo ID"),
    ),
    responses(
        (status = 200, description = "Photo deleted"),
        (status = 400, description = "Main photo cannot be deleted (CANNOT_DELETE_MAIN)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
        (status = 502, description = "Photo store did not confirm deletion (UPLOAD_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((user_id, photo_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    auth_user.require_self(user_id)?;

    PhotoService::new(&state.db)
        .delete(&*state.photo_store, user_id, photo_id)
        .await?;

    tracing::info!("Photo deleted");
    Ok(StatusCode::OK)
}
