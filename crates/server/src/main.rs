//! Teamspace server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use teamspace_api::{middleware::AppState, router as api_router};
use teamspace_common::{Config, IdGenerator};
use teamspace_core::{AdminService, InviteService, PremiumService, UserService};
use teamspace_db::repositories::{
    InviteRepository, PremiumCodeRepository, UserRepository, WorkspaceRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamspace=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting teamspace server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = teamspace_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    teamspace_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Repositories
    let user_repo = UserRepository::new(db.clone());
    let workspace_repo = WorkspaceRepository::new(db.clone());
    let invite_repo = InviteRepository::new(db.clone());
    let premium_repo = PremiumCodeRepository::new(db.clone());

    // Services
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
        public_origin: config.public_origin().to_string(),
    };

    // Router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            teamspace_api::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
