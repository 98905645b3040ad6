//! Database repositories.

pub mod invite;
pub mod premium_code;
pub mod user;
pub mod workspace;

pub use invite::InviteRepository;
pub use premium_code::PremiumCodeRepository;
pub use user::UserRepository;
pub use workspace::WorkspaceRepository;
