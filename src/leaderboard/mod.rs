//! Leaderboard: score records, the HTTP service, and clients.
//!
//! ## Key Types
//!
//! - `ScoreEntry`: a nickname and its best score
//! - `ScoreStore`: JSON-file backed record set with max-upsert
//! - `LeaderboardServer` / `router`: `POST /api/submit`, `GET /api/leaderboard`
//! - `LeaderboardClient`: seam used by the session runtime
//!   (`HttpLeaderboardClient` over the network, `LocalLeaderboard` in-process)

pub mod client;
pub mod server;
pub mod store;

pub use client::{HttpLeaderboardClient, LeaderboardClient, LocalLeaderboard};
pub use server::{router, LeaderboardServer};
pub use store::ScoreStore;

use serde::{Deserialize, Serialize};

/// Best score recorded for one nickname.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub nickname: String,
    pub score: u64,
}

impl ScoreEntry {
    pub fn new(nickname: impl Into<String>, score: u64) -> Self {
        Self {
            nickname: nickname.into(),
            score,
        }
    }
}

/// Trim a nickname; `None` if nothing is left.
#[must_use]
pub fn normalize_nickname(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_nickname() {
        assert_eq!(normalize_nickname("  kim "), Some("kim".to_string()));
        assert_eq!(normalize_nickname("   "), None);
        assert_eq!(normalize_nickname(""), None);
    }

    #[test]
    fn test_score_entry_json_shape() {
        let json = serde_json::to_value(ScoreEntry::new("a", 5)).unwrap();
        assert_eq!(json, serde_json::json!({ "nickname": "a", "score": 5 }));
    }
}
