//! Workspace member entity.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a member within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Workspace owner.
    #[sea_orm(string_value = "owner")]
    Owner,
    /// Workspace administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Regular member.
    #[sea_orm(string_value = "member")]
    #[default]
    Member,
}

impl MemberRole {
    /// Whether this role may revoke invites and manage members.
    #[must_use]
    pub const fn can_manage_invites(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

/// Permission strings attached to a membership, stored as a JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Permissions(pub Vec<String>);

impl Default for Permissions {
    fn default() -> Self {
        Self(vec!["read".to_string(), "write".to_string()])
    }
}

/// Workspace membership - links a user to a workspace with a role.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workspace_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub workspace_id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    pub role: MemberRole,

    /// Granted permissions, `["read", "write"]` by default.
    #[sea_orm(column_type = "JsonBinary")]
    pub permissions: Permissions,

    pub joined_at: DateTimeWithTimeZone,
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
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::workspace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
