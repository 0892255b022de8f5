use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use storage::{PhotoStore, Transformation};

use crate::entity::{photo, user};
use crate::error::AppError;

/// A photo to be uploaded for a user.
pub struct PhotoUpload<'b> {
    pub data: &'b [u8],
    pub file_name: &'b str,
    pub description: Option<String>,
}

/// Owns each user's photo collection and its single main photo.
///
/// Every write that touches `is_main` runs in a transaction that first
/// takes a row lock on the owning user, so concurrent main-photo changes
/// for one user serialize.
pub struct PhotoService<'a, C: ConnectionTrait + TransactionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> PhotoService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, photo_id: i32) -> Result<photo::Model, AppError> {
        photo::Entity::find_by_id(photo_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo not found".into()))
    }

    pub async fn get_main(&self, user_id: i32) -> Result<photo::Model, AppError> {
        photo::Entity::find()
            .filter(photo::Column::UserId.eq(user_id))
            .filter(photo::Column::IsMain.eq(true))
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("User has no main photo".into()))
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<photo::Model>, AppError> {
        Ok(photo::Entity::find()
            .filter(photo::Column::UserId.eq(user_id))
            .all(self.conn)
            .await?)
    }

    /// Upload to the store, then record the photo.
    ///
    /// The first photo a user adds becomes their main photo. If the record
    /// cannot be saved, the uploaded object is destroyed again.
    pub async fn add(
        &self,
        store: &dyn PhotoStore,
        user_id: i32,
        upload: PhotoUpload<'_>,
    ) -> Result<photo::Model, AppError> {
        user::Entity::find_by_id(user_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let stored = store
            .upload(upload.data, upload.file_name, &Transformation::profile_photo())
            .await?;
        if stored.bytes == 0 {
            discard_upload(store, &stored.public_id).await;
            return Err(AppError::UploadFailed(
                "Photo store reported an empty upload".into(),
            ));
        }

        let public_id = stored.public_id.clone();
        match self
            .insert_photo(user_id, stored.url, stored.public_id, upload.description)
            .await
        {
            Ok(model) => Ok(model),
            Err(e) => {
                discard_upload(store, &public_id).await;
                Err(e)
            }
        }
    }

    async fn insert_photo(
        &self,
        user_id: i32,
        url: String,
        public_id: String,
        description: Option<String>,
    ) -> Result<photo::Model, AppError> {
        let txn = self.conn.begin().await?;
        lock_user(&txn, user_id).await?;

        let has_main = photo::Entity::find()
            .filter(photo::Column::UserId.eq(user_id))
            .filter(photo::Column::IsMain.eq(true))
            .one(&txn)
            .await?
            .is_some();

        let model = photo::ActiveModel {
            user_id: Set(user_id),
            url: Set(url),
            public_id: Set(Some(public_id)),
            description: Set(description),
            date_added: Set(Utc::now()),
            is_main: Set(!has_main),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Make `photo_id` the user's main photo, demoting the current one.
    pub async fn set_main(&self, user_id: i32, photo_id: i32) -> Result<(), AppError> {
        let txn = self.conn.begin().await?;
        lock_user(&txn, user_id).await?;

        let target = photo::Entity::find_by_id(photo_id)
            .one(&txn)
            .await?
            .filter(|p| p.user_id == user_id)
            .ok_or(AppError::Unauthorized)?;

        if target.is_main {
            return Err(AppError::AlreadyMain);
        }

        photo::Entity::update_many()
            .col_expr(photo::Column::IsMain, Expr::value(false))
            .filter(photo::Column::UserId.eq(user_id))
            .filter(photo::Column::IsMain.eq(true))
            .exec(&txn)
            .await?;

        photo::Entity::update_many()
            .col_expr(photo::Column::IsMain, Expr::value(true))
            .filter(photo::Column::Id.eq(photo_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        tracing::debug!(user_id, photo_id, "Main photo changed");
        Ok(())
    }

    /// Delete a non-main photo, removing it from the store first.
    ///
    /// The owner's row lock is held from the main-photo check through the
    /// remote deletion and the record removal, so the photo cannot be
    /// promoted in between. The record is only removed once the store
    /// confirms deletion; any other answer leaves it in place and fails with
    /// `UploadFailed`.
    pub async fn delete(
        &self,
        store: &dyn PhotoStore,
        user_id: i32,
        photo_id: i32,
    ) -> Result<(), AppError> {
        let txn = self.conn.begin().await?;
        lock_user(&txn, user_id).await?;

        let photo = photo::Entity::find_by_id(photo_id)
            .one(&txn)
            .await?
            .filter(|p| p.user_id == user_id)
            .ok_or(AppError::Unauthorized)?;

        if photo.is_main {
            return Err(AppError::CannotDeleteMain);
        }

        if let Some(public_id) = &photo.public_id {
            let status = store.destroy(public_id).await?;
            if !status.is_ok() {
                return Err(AppError::UploadFailed(format!(
                    "Photo store did not confirm deletion: {status:?}"
                )));
            }
        }

        photo::Entity::delete_by_id(photo_id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}

/// Take a row lock on the user so main-photo writes for that user serialize.
async fn lock_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<(), AppError> {
    user::Entity::find_by_id(user_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(())
}

/// Best-effort removal of an upload that will not be recorded.
async fn discard_upload(store: &dyn PhotoStore, public_id: &str) {
    match store.destroy(public_id).await {
        Ok(status) if status.is_ok() => {}
        Ok(status) => tracing::warn!(%public_id, ?status, "Orphaned upload was not destroyed"),
        Err(e) => tracing::warn!(%public_id, "Failed to destroy orphaned upload: {}", e),
    }
}
