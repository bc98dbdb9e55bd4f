use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account activation tokens.
///
/// `token` holds the numeric code mailed to the user. Values are only unique
/// per user (`idx_tokens_user_id_token`), so lookups must filter on `user_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub token: String,

    pub created_at: DateTimeUtc,

    pub expired_at: DateTimeUtc,

    /// Set once, when the token is consumed.
    pub validated_at: Option<DateTimeUtc>,

    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
