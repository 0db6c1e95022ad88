//! Observable session state.

use im::Vector;
use serde::Serialize;

use crate::leaderboard::ScoreEntry;
use crate::loader::LoadedChallenge;

/// Which screen the presentation layer should show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Menu,
    Loading,
    Playing,
    GameOver,
    Leaderboard,
}

impl View {
    /// Lower-case name used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            View::Menu => "in menu",
            View::Loading => "loading",
            View::Playing => "playing",
            View::GameOver => "game over",
            View::Leaderboard => "on leaderboard",
        }
    }

    /// Loading or playing: a deck exists and results may be in flight.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, View::Loading | View::Playing)
    }
}

/// Why a play-through ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// A card was dropped on the wrong zone.
    Misclassified,
    /// The countdown reached zero.
    TimedOut,
    /// A finite deck was sorted completely.
    Cleared,
    /// Assets kept failing to load.
    AssetsUnavailable,
}

/// Progress of the score submission made from the game-over screen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "message")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Submitted,
    /// Retryable; the session stays in game over.
    Failed(String),
}

/// Read-only view of a session, published after every processed event.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SessionSnapshot {
    pub view: View,
    pub score: u64,
    pub remaining_seconds: u32,
    /// Queue head while playing.
    pub current_challenge: Option<LoadedChallenge>,
    pub failing_challenge: Option<LoadedChallenge>,
    pub game_over_reason: Option<GameOverReason>,
    pub leaderboard: Vec<ScoreEntry>,
    /// Whole active queue, head first.
    pub upcoming: Vector<LoadedChallenge>,
    pub in_flight: usize,
    pub submission: SubmissionStatus,
    pub last_error: Option<String>,
    pub generation: u64,
}

impl SessionSnapshot {
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.upcoming.len()
    }
}
