use sea_orm::entity::prelude::*;

/// A directional "like" edge. The composite primary key makes each
/// `(liker, likee)` pair unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_like")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub liker_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub likee_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LikerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Liker,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LikeeId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Likee,
}

impl ActiveModelBehavior for ActiveModel {}
