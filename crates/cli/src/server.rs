//! # CLI Server
//!
//! Server startup and management for the Rukun CLI.

use std::net::SocketAddr;

use anyhow::anyhow;
use auth::JwtConfig;
use error::Result;
use migration::{Migrator, MigratorTrait as _};
use server::AppState;
use tokio::net::TcpListener;

use crate::config::{parse_socket_addr, DatabaseConfig};

/// Connects to the database and builds the shared application state.
///
/// Used by `serve` and by the one-shot scheduler commands, which need the
/// same state the request handlers see.
pub async fn build_state(config: &DatabaseConfig, upload_dir: &str) -> Result<AppState> {
    let database_url = crate::config::build_database_url(config);

    let db = migration::connect_to_database(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    let jwt_config = JwtConfig::from_env()?;

    Ok(AppState::new(db, jwt_config, upload_dir))
}

/// Starts the API server.
///
/// Runs pending migrations and seeds before binding, so a fresh deployment
/// comes up with its schema, default settings, and bootstrap admin in place.
pub async fn serve(config: &DatabaseConfig, args: &crate::commands::ServeArgs) -> Result<()> {
    logging::info!(target: "serve", "Starting API server...");

    let state = build_state(config, &args.upload_dir).await?;

    logging::info!(target: "serve", "Running database migrations...");
    Migrator::up(&state.db, None)
        .await
        .map_err(|e| anyhow!("Failed to run database migrations: {}", e))?;
    logging::info!(target: "serve", "Database migrations completed successfully");

    migration::seeds::run_all_seeds(&state.db, true)
        .await
        .map_err(|e| anyhow!("Seeding failed: {}", e))?;

    if args.no_scheduler {
        logging::info!(target: "serve", "In-process scheduler disabled");
    }
    else {
        server::scheduler::spawn(state.clone());
    }

    let app = server::create_app_router(state);

    let address = parse_socket_addr(&args.host, args.port)
        .map_err(|e| anyhow!("Invalid address {}:{}: {}", args.host, args.port, e))?;

    serve_http(&app, &address).await
}

/// Serves the application over HTTP with graceful shutdown
async fn serve_http(app: &axum::Router, address: &SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", address, e))?;

    logging::info!(target: "serve", %address, "Starting HTTP server...");

    Ok(axum::serve(
        listener,
        app.clone()
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow!("HTTP server error: {}", e))?)
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
