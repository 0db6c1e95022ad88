//! Inputs to and outputs from the session engine.
//!
//! Everything asynchronous comes back to the engine as a `SessionEvent`
//! stamped with the generation that requested it. Everything the engine
//! wants done comes out as a `Command`.

use smallvec::SmallVec;

use crate::cards::{ChallengeDescriptor, ChallengeId};
use crate::core::{AssetLoadError, SubmissionError};
use crate::leaderboard::ScoreEntry;
use crate::loader::LoadedChallenge;

/// Player-initiated actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    StartGame,
    /// Drop the current head on a zone.
    DropOnZone { is_positive_zone: bool },
    /// Drop a specific card; rejected unless it is the head.
    DropChallenge { id: ChallengeId, is_positive_zone: bool },
    SubmitScore { nickname: String },
    ShowLeaderboard,
    ReturnToMenu,
}

impl UserAction {
    /// Verb phrase used in `InvalidTransition` errors.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            UserAction::StartGame => "start a game",
            UserAction::DropOnZone { .. } | UserAction::DropChallenge { .. } => "drop a card",
            UserAction::SubmitScore { .. } => "submit a score",
            UserAction::ShowLeaderboard => "show the leaderboard",
            UserAction::ReturnToMenu => "return to menu",
        }
    }
}

/// Results of asynchronous work, delivered back to the engine.
#[derive(Debug)]
pub enum SessionEvent {
    /// One countdown interval elapsed.
    Tick { generation: u64, epoch: u64 },

    /// A requested load finished.
    AssetLoaded {
        generation: u64,
        id: ChallengeId,
        result: Result<LoadedChallenge, AssetLoadError>,
    },

    /// A score submission finished.
    SubmissionCompleted {
        generation: u64,
        result: Result<Vec<ScoreEntry>, SubmissionError>,
    },

    /// A leaderboard fetch finished.
    LeaderboardLoaded {
        generation: u64,
        result: Result<Vec<ScoreEntry>, SubmissionError>,
    },
}

impl SessionEvent {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            SessionEvent::Tick { generation, .. }
            | SessionEvent::AssetLoaded { generation, .. }
            | SessionEvent::SubmissionCompleted { generation, .. }
            | SessionEvent::LeaderboardLoaded { generation, .. } => *generation,
        }
    }
}

/// Side effects requested by the engine, executed by the runtime in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resolve a descriptor and report back with `AssetLoaded`.
    Load {
        generation: u64,
        descriptor: ChallengeDescriptor,
    },

    /// Replace any running countdown with a fresh one.
    StartTimer { generation: u64, epoch: u64 },

    /// Cancel the running countdown.
    StopTimer,

    /// Submit the final score and report back with `SubmissionCompleted`.
    Submit {
        generation: u64,
        nickname: String,
        score: u64,
    },

    /// Fetch the board and report back with `LeaderboardLoaded`.
    FetchLeaderboard { generation: u64 },
}

/// Commands produced by one engine step; rarely more than a few.
pub type Commands = SmallVec<[Command; 4]>;
