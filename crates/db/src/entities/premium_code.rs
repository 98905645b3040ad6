//! Premium code entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Premium code - a single-use redemption token that elevates a user's role
/// to premium.
///
/// A code transitions unused -> used exactly once; `used_by`/`used_at` are set
/// iff `is_used` is true. The transition is performed as a conditional update
/// guarded on `is_used = false`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "premium_code")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Human-readable code in `XXXX-XXXX-XXXX` form, stored uppercase.
    #[sea_orm(unique)]
    pub code: String,

    pub is_used: bool,

    #[sea_orm(indexed, nullable)]
    pub used_by: Option<String>,

    #[sea_orm(nullable)]
    pub used_at: Option<DateTimeWithTimeZone>,

    /// NULL = never expires.
    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UsedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    RedeemedBy,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RedeemedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
