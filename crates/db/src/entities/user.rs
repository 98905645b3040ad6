//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Privilege tier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account.
    #[sea_orm(string_value = "member")]
    #[default]
    Member,
    /// Account with premium features unlocked.
    #[sea_orm(string_value = "premium")]
    Premium,
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserRole {
    /// Whether this role grants access to the admin surface.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Presence status, maintained by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum UserStatus {
    #[sea_orm(string_value = "online")]
    Online,
    #[sea_orm(string_value = "away")]
    Away,
    #[sea_orm(string_value = "busy")]
    Busy,
    #[sea_orm(string_value = "offline")]
    #[default]
    Offline,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Display name shown next to messages and invites.
    pub display_name: String,

    /// Avatar URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Opaque bearer token for API access.
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Privilege tier.
    pub role: UserRole,

    /// Presence status.
    pub status: UserStatus,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workspace_member::Entity")]
    WorkspaceMembers,
}

impl Related<super::workspace_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkspaceMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
