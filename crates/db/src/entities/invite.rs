//! Invite entity.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Channel names granted on join, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ChannelList(pub Vec<String>);

/// Invite - a shareable, bounded-use authorization token granting workspace
/// membership.
///
/// Revocation is the only terminal state written back to the row
/// (`active = false`); expiry and exhaustion are derived at read time from
/// `expires_at` and `uses_count`/`max_uses`. Invites are soft-disabled, never
/// deleted by normal flow.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invite")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub workspace_id: String,

    #[sea_orm(indexed)]
    pub created_by: String,

    /// NULL = never expires.
    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeWithTimeZone>,

    /// Maximum number of successful joins, >= 1.
    pub max_uses: i32,

    /// Successful joins so far; never exceeds `max_uses`.
    pub uses_count: i32,

    /// Cleared on explicit revocation; no joins are permitted afterwards.
    pub active: bool,

    /// Stored and surfaced but not yet honored; every accept requires an
    /// authenticated user.
    pub allow_guests: bool,

    pub require_approval: bool,

    /// Channel names the joining user gains access to.
    #[sea_orm(column_type = "JsonBinary")]
    pub channels: ChannelList,

    /// Optional personal message shown on the invite page.
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workspace::Entity",
        from = "Column::WorkspaceId",
        to = "super::workspace::Column::Id",
        on_delete = "Cascade"
    )]
    Workspace,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,
}

impl Related<super::workspace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
