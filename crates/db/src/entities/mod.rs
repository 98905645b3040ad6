//! Database entities.

pub mod invite;
pub mod premium_code;
pub mod user;
pub mod workspace;
pub mod workspace_member;

pub use invite::Entity as Invite;
pub use premium_code::Entity as PremiumCode;
pub use user::Entity as User;
pub use workspace::Entity as Workspace;
pub use workspace_member::Entity as WorkspaceMember;
