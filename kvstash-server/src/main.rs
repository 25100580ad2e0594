mod auth;
mod handlers;

use std::time::Duration;

use anyhow::Context;
use kvstash_core::{Store, StoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kvstash_server=info,kvstash_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration from environment variables
    let host = std::env::var("KVSTASH_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("KVSTASH_PORT").unwrap_or_else(|_| "8080".to_string());
    let snapshot_file =
        std::env::var("KVSTASH_SNAPSHOT_FILE").unwrap_or_else(|_| "./store.snapshot".to_string());
    let restore = std::env::var("KVSTASH_RESTORE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let mut config = StoreConfig::new()
        .with_filename(&snapshot_file)
        .with_expiration_interval(env_duration_secs("KVSTASH_EXPIRATION_INTERVAL", 1))
        .with_flush_interval(env_duration_secs("KVSTASH_FLUSH_INTERVAL", 2))
        .with_flush_count(env_usize("KVSTASH_FLUSH_COUNT", 5));
    if restore {
        config = config.with_restore_from_file(&snapshot_file);
    }

    // A missing or undecodable snapshot is fatal: refusing to start beats
    // silently serving an empty store.
    let store = Store::with_config(config).context("failed to construct store")?;

    let credentials = auth::BasicCredentials::from_env();
    if credentials.is_some() {
        tracing::info!("basic authentication enabled");
    } else {
        tracing::warn!("KVSTASH_USERNAME/KVSTASH_PASSWORD not set, authentication disabled");
    }

    let app = handlers::router(store.clone(), credentials);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("kvstash server listening on {addr}");
    tracing::info!(
        snapshot = %snapshot_file,
        restore,
        "store engine running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // The server has stopped accepting requests; flush the final snapshot
    // and join the background tasks.
    store.stop().await;

    Ok(())
}

/// Resolves to completion on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, stopping server");
}

fn env_duration_secs(name: &str, default_secs: u64) -> Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}
