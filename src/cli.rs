use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::{app, AppState};
use crate::config::{AppConfig, StoreKind};
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Parser)]
#[command(name = "notes-api")]
#[command(about = "Notes API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides NOTES_API_PORT/PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Store backend: postgres or memory (overrides NOTES_STORE)")]
        store: Option<StoreKind>,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Commands::Serve { port: None, store: None }) {
        Commands::Serve { port, store } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(store) = store {
                config.server.store = store;
            }
            serve(config).await
        }
        Commands::Migrate => {
            config.server.store = StoreKind::Postgres;
            config.validate()?;
            let pg = connect_postgres(&config).await?;
            pg.close().await;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;
    info!("Starting Notes API in {:?} mode", config.environment);
    if config.uses_dev_secret() {
        warn!("ACCESS_TOKEN_SECRET not set, using the development secret");
    }

    let (store, pg): (Arc<dyn Store>, Option<PgStore>) = match config.server.store {
        StoreKind::Postgres => {
            let pg = connect_postgres(&config).await?;
            (Arc::new(pg.clone()), Some(pg))
        }
        StoreKind::Memory => {
            warn!("Using the in-memory store; data is lost on exit");
            (Arc::new(MemoryStore::new()), None)
        }
    };

    let port = config.server.port;
    let state = AppState::new(config, store)?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Notes API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pg) = pg {
        pg.close().await;
    }
    info!("Notes API stopped");
    Ok(())
}

async fn connect_postgres(config: &AppConfig) -> anyhow::Result<PgStore> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is not set")?;
    let pg = PgStore::connect(url, &config.database).await?;
    pg.migrate().await?;
    Ok(pg)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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
