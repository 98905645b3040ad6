//! Admin endpoints.
//!
//! Every handler gates on the global admin role before touching the service.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use teamspace_common::{AppError, AppResult};
use teamspace_core::services::admin::{AdminStats, GenerateCodesInput};
use teamspace_db::entities::user::UserRole;
use teamspace_db::entities::{premium_code, user};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// Premium code response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeResponse {
    pub id: String,
    pub code: String,
    pub is_used: bool,
    pub used_by: Option<String>,
    pub used_at: Option<String>,
    pub expires_at: Option<String>,
    pub created_at: String,
}

impl From<premium_code::Model> for CodeResponse {
    fn from(c: premium_code::Model) -> Self {
        Self {
            id: c.id,
            code: c.code,
            is_used: c.is_used,
            used_by: c.used_by,
            used_at: c.used_at.map(|at| at.to_rfc3339()),
            expires_at: c.expires_at.map(|at| at.to_rfc3339()),
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// User summary response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            avatar_url: u.avatar_url,
            role: u.role,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Delete code request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCodeRequest {
    pub code_id: String,
}

/// Paged list request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Update role request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub user_id: String,
    pub role: UserRole,
}

const fn default_limit() -> u64 {
    20
}

fn require_admin(user: &user::Model) -> AppResult<()> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".to_string()))
    }
}

// ==================== Handlers ====================

/// Generate a batch of premium codes.
async fn generate_codes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateCodesInput>,
) -> AppResult<ApiResponse<Vec<CodeResponse>>> {
    require_admin(&user)?;

    let codes = state.admin_service.generate_codes(input).await?;

    Ok(ApiResponse::ok(codes.into_iter().map(Into::into).collect()))
}

/// Delete a premium code.
async fn delete_code(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteCodeRequest>,
) -> AppResult<ApiResponse<()>> {
    require_admin(&user)?;

    state.admin_service.delete_code(&req.code_id).await?;

    Ok(ApiResponse::ok(()))
}

/// List premium codes.
async fn list_codes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<Vec<CodeResponse>>> {
    require_admin(&user)?;

    let limit = req.limit.min(100);
    let codes = state.admin_service.list_codes(limit, req.offset).await?;

    Ok(ApiResponse::ok(codes.into_iter().map(Into::into).collect()))
}

/// List users.
async fn list_users(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    require_admin(&user)?;

    let limit = req.limit.min(100);
    let users = state.admin_service.list_users(limit, req.offset).await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Change a user's global role.
async fn update_role(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateRoleRequest>,
) -> AppResult<ApiResponse<()>> {
    require_admin(&user)?;

    state
        .admin_service
        .set_user_role(&req.user_id, req.role)
        .await?;

    Ok(ApiResponse::ok(()))
}

/// Dashboard counters.
async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AdminStats>> {
    require_admin(&user)?;

    Ok(ApiResponse::ok(state.admin_service.stats().await?))
}

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/codes/generate", post(generate_codes))
        .route("/codes/delete", post(delete_code))
        .route("/codes/list", post(list_codes))
        .route("/users/list", post(list_users))
        .route("/users/update-role", post(update_role))
        .route("/stats", post(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use teamspace_db::entities::user::UserStatus;

    fn test_user(role: UserRole) -> user::Model {
        user::Model {
            id: "usr1".to_string(),
            email: "usr1@example.com".to_string(),
            display_name: "usr1".to_string(),
            avatar_url: None,
            token: None,
            role,
            status: UserStatus::Offline,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&test_user(UserRole::Admin)).is_ok());
        assert!(matches!(
            require_admin(&test_user(UserRole::Premium)),
            Err(AppError::Forbidden(_))
        ));
        assert!(require_admin(&test_user(UserRole::Member)).is_err());
    }
}
