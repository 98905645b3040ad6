//! Common utilities and shared types for teamspace-rs.
//!
//! This crate provides foundational components used across all teamspace-rs
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Code Generation**: Human-shareable redemption codes via [`generate_code`]

pub mod code;
pub mod config;
pub mod error;
pub mod id;

pub use code::{CODE_GROUPS, CODE_GROUP_LEN, generate_code, is_valid_code, normalize_code};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
