//! Service layer.

pub mod admin;
pub mod invite;
pub mod premium;
pub mod user;
