//! Business logic for Teamspace.
//!
//! Services own the rules (validation, permission checks, lifecycle
//! transitions) and delegate persistence to the repositories in
//! `teamspace-db`.

pub mod services;

pub use services::admin::AdminService;
pub use services::invite::InviteService;
pub use services::premium::PremiumService;
pub use services::user::UserService;
