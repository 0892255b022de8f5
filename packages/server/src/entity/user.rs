use sea_orm::entity::prelude::*;

/// A registered identity. Usernames are stored lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// HMAC-SHA512 of the password, keyed by `password_salt`.
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,

    pub known_as: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub city: Option<String>,
    pub country: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub introduction: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub looking_for: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub interests: Option<String>,

    pub created: DateTimeUtc,
    pub last_active: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::photo::Entity")]
    Photo,
}

impl Related<super::photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
