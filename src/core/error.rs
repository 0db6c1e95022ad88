//! Error types.
//!
//! - `GameError`: everything the presentation layer can be told
//! - `AssetLoadError`: recovered inside the engine, never ends a session by itself
//! - `SubmissionError`: score submission or leaderboard fetch failures
//! - `CatalogError` / `StoreError`: startup and persistence failures

use std::path::PathBuf;

use thiserror::Error;

use crate::cards::Label;

/// Errors surfaced by the session engine.
#[derive(Debug, Error)]
pub enum GameError {
    /// The catalog has no assets for a label, so no balanced deck can be built.
    #[error("cannot start game: no {label} assets in catalog")]
    EmptyCatalog { label: Label },

    /// Rejected before any I/O (e.g. blank nickname).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value would leave the session unplayable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested action is not legal in the current view.
    #[error("cannot {action} while {view}")]
    InvalidTransition { action: &'static str, view: &'static str },

    /// Score submission failed; the session stays in game over.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The session actor has shut down.
    #[error("session closed")]
    SessionClosed,
}

/// Failure to resolve a descriptor into a displayable challenge.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("failed to read asset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("asset {asset} is not a supported image")]
    Decode { asset: String },

    #[error("failed to fetch asset {asset}: {message}")]
    Http { asset: String, message: String },

    #[error("loader cannot resolve asset {asset}")]
    Unsupported { asset: String },
}

/// Failure talking to the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("leaderboard unreachable: {0}")]
    Network(String),

    #[error("leaderboard rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("leaderboard storage failed: {0}")]
    Store(String),
}

/// Failure scanning an asset directory.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to scan {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure persisting score records.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("score file encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for SubmissionError {
    fn from(err: StoreError) -> Self {
        SubmissionError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog_message() {
        let err = GameError::EmptyCatalog { label: Label::NotKimchi };
        assert_eq!(err.to_string(), "cannot start game: no not-kimchi assets in catalog");
    }

    #[test]
    fn test_submission_error_is_transparent() {
        let err: GameError = SubmissionError::Rejected {
            status: 400,
            message: "Invalid data".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "leaderboard rejected request (400): Invalid data");
    }

    #[test]
    fn test_store_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: SubmissionError = StoreError::from(json_err).into();
        assert!(matches!(err, SubmissionError::Store(_)));
    }
}
