//! Leaderboard service.
//!
//! Environment: `KIMCHI_HOST` (default `0.0.0.0`), `PORT` (default 3000),
//! `KIMCHI_SCORE_FILE` (default `scores.json`), `RUST_LOG`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use kimchi_sort::{init_tracing, LeaderboardServer, ScoreStore, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = config
        .bind_addr()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;

    let store = ScoreStore::open(&config.score_file)
        .await
        .with_context(|| format!("failed to open {}", config.score_file.display()))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    let server = LeaderboardServer::start(listener, Arc::new(store)).await?;
    info!(
        "serving scores from {} on port {}",
        config.score_file.display(),
        server.port()
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("shutting down");
    server.shutdown().await;
    Ok(())
}
