use std::net::SocketAddr;
use std::sync::Arc;

use portal_core::file_sync::RemoteFileLister;
use portal_drive::{DriveClient, ServiceAccountKey};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal_api::config::{DriveConfig, ServerConfig};
use portal_api::router::build_app_router;
use portal_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // `LOG_FORMAT=json` switches to one JSON object per line.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portal_api=debug,portal_drive=info,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = portal_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    portal_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    portal_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Google Drive ---
    let drive = build_drive_lister(&config.drive);

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        drive,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Build the Drive lister from the configured service-account key.
///
/// No key file leaves file sync disabled. A key file that cannot be loaded
/// aborts startup.
fn build_drive_lister(config: &DriveConfig) -> Option<Arc<dyn RemoteFileLister>> {
    let Some(path) = &config.key_file else {
        tracing::info!("GOOGLE_SERVICE_ACCOUNT_KEY_FILE not set; Drive file sync disabled");
        return None;
    };

    let key = ServiceAccountKey::from_file(path)
        .unwrap_or_else(|e| panic!("Failed to load service account key {}: {e}", path.display()));
    tracing::info!(client_email = %key.client_email, "Drive service account loaded");

    let client = DriveClient::new(key).expect("Failed to build Drive client");
    Some(client.into_lister())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
