use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use docsite::app::{self, AppState};
use docsite::config::ServerConfig;
use docsite::feedback::store::JsonFileFeedbackStore;
use docsite::search::index::DocumentIndex;
use docsite::search::source::JsonFileSource;
use docsite::static_files::resolver::{PathResolver, ServePolicy};

/// Documentation site server: static assets, search API and feedback log.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Site root directory (overrides configuration).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Port to listen on (overrides configuration).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsite=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let site_root = config.site_root()?;
    tracing::info!("Serving site root {}", site_root.display());

    let resolver = PathResolver::new(&site_root)?;
    let document_source = Arc::new(JsonFileSource::new(config.docs_path()?));
    let feedback_store = Arc::new(JsonFileFeedbackStore::new(config.feedback_path()?));

    // Build application state
    let state = AppState {
        index: Arc::new(DocumentIndex::new()),
        document_source,
        feedback_store,
        resolver: Arc::new(resolver),
        policy: Arc::new(ServePolicy::default()),
        max_body_bytes: config.max_body_bytes,
    };
    state.reload_index().await;

    #[cfg(unix)]
    spawn_reload_on_sighup(state.clone())?;

    let app = app::router(state);

    // Start the server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Reload the search index whenever the process receives SIGHUP.
#[cfg(unix)]
fn spawn_reload_on_sighup(state: AppState) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup =
        signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            tracing::info!("SIGHUP received, reloading search index");
            state.reload_index().await;
        }
    });
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
