//! Premium code redemption endpoint.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use teamspace_common::AppResult;
use teamspace_core::services::premium::RedeemOutcome;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Redeem request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub code: String,
}

/// Redeem response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    #[serde(flatten)]
    pub outcome: RedeemOutcome,
}

/// Redeem a premium code for the calling user.
async fn redeem(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RedeemRequest>,
) -> AppResult<ApiResponse<RedeemResponse>> {
    let outcome = state.premium_service.redeem(&user.id, &req.code).await?;

    Ok(ApiResponse::ok(RedeemResponse { outcome }))
}

/// Create the premium router.
pub fn router() -> Router<AppState> {
    Router::new().route("/redeem", post(redeem))
}
