//! API integration tests.
//!
//! These drive the real router over a mock database, exercising the auth
//! middleware, extractors, and handlers together.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use teamspace_api::{middleware::AppState, router as api_router};
use teamspace_common::IdGenerator;
use teamspace_core::{AdminService, InviteService, PremiumService, UserService};
use teamspace_db::entities::invite::ChannelList;
use teamspace_db::entities::user::{UserRole, UserStatus};
use teamspace_db::entities::{invite, premium_code, user};
use teamspace_db::repositories::{
    InviteRepository, PremiumCodeRepository, UserRepository, WorkspaceRepository,
};
use tower::ServiceExt;

fn test_app(db: Arc<DatabaseConnection>) -> Router {
    let user_repo = UserRepository::new(db.clone());
    let workspace_repo = WorkspaceRepository::new(db.clone());
    let invite_repo = InviteRepository::new(db.clone());
    let premium_repo = PremiumCodeRepository::new(db);
    let id_gen = IdGenerator::new();

    let state = AppState {
        user_service: UserService::new(user_repo.clone(), id_gen.clone()),
        invite_service: InviteService::new(
            invite_repo,
            workspace_repo,
            user_repo.clone(),
            id_gen.clone(),
        ),
        premium_service: PremiumService::new(premium_repo.clone()),
        admin_service: AdminService::new(premium_repo, user_repo, id_gen),
        public_origin: "https://team.example.com".to_string(),
    };

    Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            teamspace_api::auth_middleware,
        ))
        .with_state(state)
}

fn test_user(role: UserRole) -> user::Model {
    user::Model {
        id: "usr1".to_string(),
        email: "usr1@example.com".to_string(),
        display_name: "usr1".to_string(),
        avatar_url: None,
        token: Some("token-usr1".to_string()),
        role,
        status: UserStatus::Offline,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_invite() -> invite::Model {
    invite::Model {
        id: "inv1".to_string(),
        workspace_id: "ws1".to_string(),
        created_by: "usr1".to_string(),
        expires_at: None,
        max_uses: 10,
        uses_count: 0,
        active: true,
        allow_guests: true,
        require_approval: false,
        channels: ChannelList(vec!["general".to_string()]),
        message: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn post_json(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_show_invite_without_auth() {
    // Invite page read: no token needed. Queries: invite, creator, workspace.
    let workspace = teamspace_db::entities::workspace::Model {
        id: "ws1".to_string(),
        name: "Acme".to_string(),
        description: None,
        owner_id: "usr1".to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    };

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_invite()]])
            .append_query_results([[test_user(UserRole::Member)]])
            .append_query_results([[workspace]])
            .into_connection(),
    );

    let response = test_app(db)
        .oneshot(post_json("/api/invites/show", r#"{"inviteId":"inv1"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_accept_requires_auth() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = test_app(db)
        .oneshot(post_json(
            "/api/invites/accept",
            r#"{"inviteId":"inv1"}"#,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_redeem_with_valid_token() {
    // Queries: token lookup (middleware), unused-code lookup, then the
    // mark-used and role-elevation writes.
    let code = premium_code::Model {
        id: "pc1".to_string(),
        code: "ABCD-EFGH-1234".to_string(),
        is_used: false,
        used_by: None,
        used_at: None,
        expires_at: None,
        created_at: Utc::now().into(),
    };

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user(UserRole::Member)]])
            .append_query_results([[code]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection(),
    );

    let response = test_app(db)
        .oneshot(post_json(
            "/api/premium/redeem",
            r#"{"code":"abcd-efgh-1234"}"#,
            Some("token-usr1"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["status"], "activated");
}

#[tokio::test]
async fn test_admin_endpoint_forbidden_for_member() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user(UserRole::Member)]])
            .into_connection(),
    );

    let response = test_app(db)
        .oneshot(post_json(
            "/api/admin/codes/generate",
            r#"{"count":5,"expiryDays":30}"#,
            Some("token-usr1"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_generates_codes() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user(UserRole::Admin)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection(),
    );

    let response = test_app(db)
        .oneshot(post_json(
            "/api/admin/codes/generate",
            r#"{"count":3,"expiryDays":30}"#,
            Some("token-usr1"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}
