//! HTTP API layer for teamspace-rs.
//!
//! - **Endpoints**: invite lifecycle, premium redemption, admin issuance
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token auth
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
