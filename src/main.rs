use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod controllers;
mod db;
mod error;
mod models;
mod routers;
mod seed;

use config::Settings;
use controllers::SongController;
use db::Database;
use routers::build_router;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    let seed = if settings.seed_on_startup {
        Some(seed::load_seed(&settings.seed_file).await?)
    } else {
        None
    };

    info!("connecting to url: {}", settings.redacted_uri());
    let database = Database::connect(&settings)
        .await
        .context("Failed to connect to MongoDB")?;
    info!("📊 Connected to MongoDB");

    match seed {
        Some(songs) => {
            seed::reseed(&database, songs)
                .await
                .context("Failed to load seed data")?;
        }
        None => warn!("SEED_ON_STARTUP is off; serving existing collection contents"),
    }

    let controller = SongController::new(Arc::new(database));
    let app = build_router(controller);

    let listener = tokio::net::TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.listen_addr))?;

    info!("🎵 Song catalog listening on {}", settings.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}
