//! API endpoints.

mod admin;
mod invites;
mod premium;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/invites", invites::router())
        .nest("/premium", premium::router())
        .nest("/admin", admin::router())
        .nest("/users", users::router())
}
