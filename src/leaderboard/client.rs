//! Leaderboard clients used by the session runtime.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::warn;

use super::server::{ErrorResponse, SubmitResponse};
use super::store::ScoreStore;
use super::ScoreEntry;
use crate::core::SubmissionError;

/// Submits final scores and reads the ranked board.
#[async_trait]
pub trait LeaderboardClient: Send + Sync {
    /// Record `score` under `nickname`; returns the board after the update.
    async fn submit(&self, nickname: &str, score: u64) -> Result<Vec<ScoreEntry>, SubmissionError>;

    /// The full board, highest first.
    async fn fetch(&self) -> Result<Vec<ScoreEntry>, SubmissionError>;
}

/// Talks to a leaderboard service over HTTP.
pub struct HttpLeaderboardClient {
    client: Client,
    base_url: String,
}

impl HttpLeaderboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn rejected(resp: Response) -> SubmissionError {
        let status = resp.status().as_u16();
        let message = match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("status {}", status),
        };
        warn!("leaderboard rejected request: {} {}", status, message);
        SubmissionError::Rejected { status, message }
    }
}

fn network(err: reqwest::Error) -> SubmissionError {
    SubmissionError::Network(err.to_string())
}

#[async_trait]
impl LeaderboardClient for HttpLeaderboardClient {
    async fn submit(&self, nickname: &str, score: u64) -> Result<Vec<ScoreEntry>, SubmissionError> {
        let resp = self
            .client
            .post(format!("{}/api/submit", self.base_url))
            .json(&serde_json::json!({ "nickname": nickname, "score": score }))
            .send()
            .await
            .map_err(network)?;
        if !resp.status().is_success() {
            return Err(Self::rejected(resp).await);
        }
        let body: SubmitResponse = resp.json().await.map_err(network)?;
        Ok(body.scores)
    }

    async fn fetch(&self) -> Result<Vec<ScoreEntry>, SubmissionError> {
        let resp = self
            .client
            .get(format!("{}/api/leaderboard", self.base_url))
            .send()
            .await
            .map_err(network)?;
        if !resp.status().is_success() {
            return Err(Self::rejected(resp).await);
        }
        resp.json().await.map_err(network)
    }
}

/// Writes straight to an in-process store.
pub struct LocalLeaderboard {
    store: Arc<ScoreStore>,
}

impl LocalLeaderboard {
    pub fn new(store: Arc<ScoreStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LeaderboardClient for LocalLeaderboard {
    async fn submit(&self, nickname: &str, score: u64) -> Result<Vec<ScoreEntry>, SubmissionError> {
        Ok(self.store.submit(nickname, score).await?)
    }

    async fn fetch(&self) -> Result<Vec<ScoreEntry>, SubmissionError> {
        Ok(self.store.entries().await)
    }
}
