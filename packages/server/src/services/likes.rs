use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, SqlErr};

use crate::entity::{user, user_like};
use crate::error::AppError;

/// Records directional "like" edges between users.
pub struct LikeService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> LikeService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get(
        &self,
        liker_id: i32,
        likee_id: i32,
    ) -> Result<Option<user_like::Model>, AppError> {
        Ok(user_like::Entity::find_by_id((liker_id, likee_id))
            .one(self.conn)
            .await?)
    }

    /// Record that `liker_id` likes `likee_id`.
    pub async fn add(&self, liker_id: i32, likee_id: i32) -> Result<(), AppError> {
        if self.get(liker_id, likee_id).await?.is_some() {
            return Err(AppError::Conflict("You have already liked this user".into()));
        }

        user::Entity::find_by_id(likee_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let edge = user_like::ActiveModel {
            liker_id: Set(liker_id),
            likee_id: Set(likee_id),
        };

        edge.insert(self.conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!("Like race condition: unique constraint caught on insert");
                AppError::Conflict("You have already liked this user".into())
            }
            _ => AppError::from(e),
        })?;

        Ok(())
    }
}
