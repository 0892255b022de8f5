use sea_orm::entity::prelude::*;

/// A photo owned by exactly one user.
///
/// For every user with at least one photo, exactly one row has
/// `is_main = true`. A partial unique index backs this up at the store
/// level (see `seed::ensure_indexes`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub url: String,

    /// Identifier in the external photo store. `None` only for seeded photos
    /// that were never uploaded.
    pub public_id: Option<String>,

    pub description: Option<String>,
    pub date_added: DateTimeUtc,
    pub is_main: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
