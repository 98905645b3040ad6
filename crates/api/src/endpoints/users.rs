//! User endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use teamspace_common::AppResult;
use teamspace_core::services::user::RegisterUserInput;
use teamspace_db::entities::user;
use teamspace_db::entities::user::UserRole;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Own-account response, including the minted token on registration.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub created_at: String,
}

impl MeResponse {
    fn from_model(u: user::Model, include_token: bool) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            avatar_url: u.avatar_url,
            role: u.role,
            token: if include_token { u.token } else { None },
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Register a new account. Unauthenticated; returns the access token once.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUserInput>,
) -> AppResult<ApiResponse<MeResponse>> {
    let user = state.user_service.register(input).await?;

    Ok(ApiResponse::ok(MeResponse::from_model(user, true)))
}

/// Show the calling user.
async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<MeResponse>> {
    Ok(ApiResponse::ok(MeResponse::from_model(user, false)))
}

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/me", post(me))
}
