// Axum handlers for the leaderboard service.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::store::ScoreStore;
use super::{normalize_nickname, ScoreEntry};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub nickname: String,
    pub score: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub scores: Vec<ScoreEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Routes: `POST /api/submit`, `GET /api/leaderboard`.
pub fn router(store: Arc<ScoreStore>) -> Router {
    Router::new()
        .route("/api/submit", post(submit_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .with_state(store)
}

pub struct LeaderboardServer {
    port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl LeaderboardServer {
    /// Serve the leaderboard on an already-bound listener, returning a handle.
    pub async fn start(listener: TcpListener, store: Arc<ScoreStore>) -> Result<Self> {
        let port = listener.local_addr()?.port();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(store);

        let join = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                error!("leaderboard server failed: {}", e);
            }
        });

        info!("leaderboard listening on port {}", port);
        Ok(Self {
            port,
            shutdown_tx: Some(shutdown_tx),
            join: Some(join),
        })
    }

    /// Bind `127.0.0.1` on a random port and serve.
    pub async fn start_local(store: Arc<ScoreStore>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Self::start(listener, store).await
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL for clients on this machine.
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                warn!("leaderboard server task panicked: {}", e);
            }
        }
        info!("leaderboard on port {} stopped", self.port);
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// POST /api/submit: upsert a nickname's best score, return the board.
async fn submit_handler(
    State(store): State<Arc<ScoreStore>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            debug!("rejected submit body: {}", rejection.body_text());
            return bad_request("Invalid data");
        }
    };

    let Some(nickname) = normalize_nickname(&req.nickname) else {
        return bad_request("Invalid data: nickname must not be empty");
    };
    let Ok(score) = u64::try_from(req.score) else {
        return bad_request("Invalid data: score must not be negative");
    };

    match store.submit(&nickname, score).await {
        Ok(scores) => {
            debug!("accepted score {} for {}", score, nickname);
            Json(SubmitResponse {
                message: "Score saved".to_string(),
                scores,
            })
            .into_response()
        }
        Err(e) => {
            error!("score store failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save score".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/leaderboard: the full board, highest first.
async fn leaderboard_handler(State(store): State<Arc<ScoreStore>>) -> Json<Vec<ScoreEntry>> {
    Json(store.entries().await)
}
