//! Core engine types: RNG, configuration, errors, tracing setup.
//!
//! This module contains the building blocks shared by every subsystem.
//! Games configure behavior via `GameConfig` rather than modifying the core.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{DeckPolicy, GameConfig, ServerConfig};
pub use error::{AssetLoadError, CatalogError, GameError, StoreError, SubmissionError};
pub use rng::GameRng;

use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

/// Install the global `tracing` subscriber once.
///
/// Honors `RUST_LOG`; defaults to `info` with noisy HTTP crates at `warn`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        info!("kimchi-sort tracing initialized");
    });
}
