//! Invite endpoints.
//!
//! `/show` is deliberately reachable without authentication: the invite page
//! must render for a recipient who has no account yet. Everything else
//! requires a user.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use teamspace_common::AppResult;
use teamspace_core::services::invite::{
    AcceptOutcome, CreateInviteInput, InviteContext, InviteValidity,
};
use teamspace_db::entities::invite;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// Invite response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub id: String,
    pub workspace_id: String,
    pub created_by: String,
    pub expires_at: Option<String>,
    pub max_uses: i32,
    pub uses_count: i32,
    pub active: bool,
    pub allow_guests: bool,
    pub require_approval: bool,
    pub channels: Vec<String>,
    pub message: Option<String>,
    pub created_at: String,
    /// Shareable link, built from the configured public origin.
    pub url: String,
}

impl InviteResponse {
    fn from_model(i: invite::Model, origin: &str) -> Self {
        let url = invite_url(origin, &i.id);
        Self {
            id: i.id,
            workspace_id: i.workspace_id,
            created_by: i.created_by,
            expires_at: i.expires_at.map(|at| at.to_rfc3339()),
            max_uses: i.max_uses,
            uses_count: i.uses_count,
            active: i.active,
            allow_guests: i.allow_guests,
            require_approval: i.require_approval,
            channels: i.channels.0,
            message: i.message,
            created_at: i.created_at.to_rfc3339(),
            url,
        }
    }
}

/// Invite page response: the invite plus validity and display context.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteDetailResponse {
    #[serde(flatten)]
    pub invite: InviteResponse,
    pub validity: InviteValidity,
    pub context: Option<InviteContext>,
}

/// Accept response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    #[serde(flatten)]
    pub outcome: AcceptOutcome,
}

/// Show invite request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowInviteRequest {
    pub invite_id: String,
}

/// Accept invite request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteRequest {
    pub invite_id: String,
}

/// Revoke invite request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeInviteRequest {
    pub invite_id: String,
}

/// List invites request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvitesRequest {
    pub workspace_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

fn invite_url(origin: &str, invite_id: &str) -> String {
    format!("{origin}/invite/{invite_id}")
}

// ==================== Handlers ====================

/// Create a new invite.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateInviteInput>,
) -> AppResult<ApiResponse<InviteResponse>> {
    let invite = state.invite_service.create(&user.id, input).await?;

    Ok(ApiResponse::ok(InviteResponse::from_model(
        invite,
        &state.public_origin,
    )))
}

/// Show an invite with its validity and context. Unauthenticated.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowInviteRequest>,
) -> AppResult<ApiResponse<InviteDetailResponse>> {
    let detail = state.invite_service.load(&req.invite_id).await?;

    Ok(ApiResponse::ok(InviteDetailResponse {
        invite: InviteResponse::from_model(detail.invite, &state.public_origin),
        validity: detail.validity,
        context: detail.context,
    }))
}

/// Accept an invite.
async fn accept(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AcceptInviteRequest>,
) -> AppResult<ApiResponse<AcceptResponse>> {
    let outcome = state
        .invite_service
        .accept(&req.invite_id, &user.id)
        .await?;

    Ok(ApiResponse::ok(AcceptResponse { outcome }))
}

/// Revoke an invite.
async fn revoke(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RevokeInviteRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .invite_service
        .revoke(&req.invite_id, &user.id)
        .await?;

    Ok(ApiResponse::ok(()))
}

/// List invites for a workspace.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListInvitesRequest>,
) -> AppResult<ApiResponse<Vec<InviteResponse>>> {
    let limit = req.limit.min(100);
    let invites = state
        .invite_service
        .list_for_workspace(&req.workspace_id, &user.id, limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(
        invites
            .into_iter()
            .map(|i| InviteResponse::from_model(i, &state.public_origin))
            .collect(),
    ))
}

/// Create the invite router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/accept", post(accept))
        .route("/revoke", post(revoke))
        .route("/list", post(list))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_url_shape() {
        assert_eq!(
            invite_url("https://team.example.com", "inv1"),
            "https://team.example.com/invite/inv1"
        );
    }
}
