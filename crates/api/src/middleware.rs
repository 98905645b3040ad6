//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use teamspace_core::{AdminService, InviteService, PremiumService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub invite_service: InviteService,
    pub premium_service: PremiumService,
    pub admin_service: AdminService,
    /// Origin used when building shareable invite links.
    pub public_origin: String,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to a user and stashes it in request extensions.
/// Requests without a valid token pass through unauthenticated; handlers
/// that need a user reject via the [`AuthUser`](crate::extractors::AuthUser)
/// extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
