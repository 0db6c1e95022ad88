//! The session state machine.
//!
//! `SessionEngine` is synchronous and deterministic: it consumes one user
//! action or `SessionEvent` at a time and answers with the `Commands` the
//! runtime must carry out. It never spawns, sleeps, or performs I/O, so
//! every interleaving of drops, ticks and load completions can be replayed
//! in a plain unit test.
//!
//! ## Staleness
//!
//! - `generation` increments on `start_game`, on entering game over and on
//!   returning to the menu. Results stamped with another generation are
//!   dropped.
//! - `timer_epoch` increments whenever the countdown starts or stops.
//!   Ticks from another epoch are dropped, so a card is resolved at most
//!   once whichever of drop or expiry arrives first.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::event::{Command, Commands, SessionEvent, UserAction};
use super::queue::ActiveQueue;
use super::state::{GameOverReason, SessionSnapshot, SubmissionStatus, View};
use crate::cards::{AssetCatalog, ChallengeDescriptor, ChallengeId};
use crate::core::{AssetLoadError, GameConfig, GameError, GameRng, SubmissionError};
use crate::deck::Deck;
use crate::leaderboard::{normalize_nickname, ScoreEntry};
use crate::loader::LoadedChallenge;

#[derive(Clone, Copy, Debug, Default)]
struct TimerState {
    epoch: u64,
    running: bool,
}

pub struct SessionEngine {
    config: GameConfig,
    catalog: Arc<AssetCatalog>,
    rng: GameRng,

    view: View,
    generation: u64,
    timer: TimerState,

    // === Play-through state ===
    deck: Option<Deck>,
    queue: ActiveQueue,
    in_flight: FxHashMap<ChallengeId, ChallengeDescriptor>,
    score: u64,
    remaining_seconds: u32,
    consecutive_failures: u32,
    failing_challenge: Option<LoadedChallenge>,
    game_over_reason: Option<GameOverReason>,

    // === Leaderboard ===
    leaderboard: Vec<ScoreEntry>,
    submission: SubmissionStatus,
    last_error: Option<String>,
}

impl SessionEngine {
    /// Create an engine sitting in the menu.
    pub fn new(config: GameConfig, catalog: Arc<AssetCatalog>) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let remaining_seconds = config.timeout_seconds;
        Self {
            config,
            catalog,
            rng,
            view: View::Menu,
            generation: 0,
            timer: TimerState::default(),
            deck: None,
            queue: ActiveQueue::new(),
            in_flight: FxHashMap::default(),
            score: 0,
            remaining_seconds,
            consecutive_failures: 0,
            failing_challenge: None,
            game_over_reason: None,
            leaderboard: Vec::new(),
            submission: SubmissionStatus::Idle,
            last_error: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn timer_epoch(&self) -> u64 {
        self.timer.epoch
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.running
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn queue(&self) -> &ActiveQueue {
        &self.queue
    }

    /// Loads requested but not yet reported.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    /// Head of the queue, only while playing.
    #[must_use]
    pub fn current_challenge(&self) -> Option<&LoadedChallenge> {
        if self.view == View::Playing {
            self.queue.head()
        } else {
            None
        }
    }

    #[must_use]
    pub fn failing_challenge(&self) -> Option<&LoadedChallenge> {
        self.failing_challenge.as_ref()
    }

    #[must_use]
    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    #[must_use]
    pub fn leaderboard(&self) -> &[ScoreEntry] {
        &self.leaderboard
    }

    #[must_use]
    pub fn submission(&self) -> &SubmissionStatus {
        &self.submission
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            view: self.view,
            score: self.score,
            remaining_seconds: self.remaining_seconds,
            current_challenge: self.current_challenge().cloned(),
            failing_challenge: self.failing_challenge.clone(),
            game_over_reason: self.game_over_reason,
            leaderboard: self.leaderboard.clone(),
            upcoming: self.queue.to_vector(),
            in_flight: self.in_flight.len(),
            submission: self.submission.clone(),
            last_error: self.last_error.clone(),
            generation: self.generation,
        }
    }

    // === Dispatch ===

    /// Apply a player action.
    pub fn apply(&mut self, action: UserAction) -> Result<Commands, GameError> {
        match action {
            UserAction::StartGame => self.start_game(),
            UserAction::DropOnZone { is_positive_zone } => Ok(self.drop_on_zone(is_positive_zone)),
            UserAction::DropChallenge { id, is_positive_zone } => {
                Ok(self.drop_challenge(id, is_positive_zone))
            }
            UserAction::SubmitScore { nickname } => self.submit_score(&nickname),
            UserAction::ShowLeaderboard => self.show_leaderboard(),
            UserAction::ReturnToMenu => Ok(self.return_to_menu()),
        }
    }

    /// Apply the result of asynchronous work.
    pub fn handle(&mut self, event: SessionEvent) -> Commands {
        if event.generation() != self.generation {
            debug!("dropping event from generation {}", event.generation());
            return Commands::new();
        }
        match event {
            SessionEvent::Tick { generation, epoch } => self.tick(generation, epoch),
            SessionEvent::AssetLoaded { generation, id, result } => {
                self.asset_loaded(generation, id, result)
            }
            SessionEvent::SubmissionCompleted { generation, result } => {
                self.submission_completed(generation, result)
            }
            SessionEvent::LeaderboardLoaded { generation, result } => {
                self.leaderboard_loaded(generation, result)
            }
        }
    }

    // === Lifecycle ===

    /// Begin a new play-through: fresh deck, score 0, full timer.
    ///
    /// Fails without changing state if the configuration is invalid or the
    /// catalog cannot produce a deck.
    pub fn start_game(&mut self) -> Result<Commands, GameError> {
        if self.view.is_active() {
            return Err(GameError::InvalidTransition {
                action: UserAction::StartGame.verb(),
                view: self.view.name(),
            });
        }

        let deck = match Deck::new(Arc::clone(&self.catalog), &self.config, self.rng.fork()) {
            Ok(deck) => deck,
            Err(e) => {
                warn!("cannot start game: {}", e);
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        let mut cmds = Commands::new();
        self.stop_timer(&mut cmds);
        self.reset_play_state();
        self.generation += 1;
        self.deck = Some(deck);
        self.leaderboard.clear();
        self.last_error = None;
        self.view = View::Loading;
        info!("game started (generation {})", self.generation);

        self.refill(&mut cmds);
        self.advance(&mut cmds);
        Ok(cmds)
    }

    /// Discard the session and go back to the menu. Always accepted.
    pub fn return_to_menu(&mut self) -> Commands {
        let mut cmds = Commands::new();
        self.stop_timer(&mut cmds);
        self.reset_play_state();
        self.generation += 1;
        self.leaderboard.clear();
        self.last_error = None;
        self.view = View::Menu;
        debug!("returned to menu (generation {})", self.generation);
        cmds
    }

    // === Play ===

    /// Sort the current head into a zone.
    pub fn drop_on_zone(&mut self, is_positive_zone: bool) -> Commands {
        match self.current_challenge().map(LoadedChallenge::id) {
            Some(id) => self.resolve_drop(id, is_positive_zone),
            None => {
                debug!("drop ignored while {} with no head", self.view.name());
                Commands::new()
            }
        }
    }

    /// Sort a specific card. Anything but the current head is a no-op.
    pub fn drop_challenge(&mut self, id: ChallengeId, is_positive_zone: bool) -> Commands {
        if self.current_challenge().is_some_and(|head| head.id() == id) {
            self.resolve_drop(id, is_positive_zone)
        } else {
            debug!("stale drop of {} rejected", id);
            Commands::new()
        }
    }

    fn resolve_drop(&mut self, id: ChallengeId, is_positive_zone: bool) -> Commands {
        let mut cmds = Commands::new();
        self.stop_timer(&mut cmds);

        let Some(head) = self.queue.pop_head() else {
            return cmds;
        };

        if head.is_positive() == is_positive_zone {
            self.score += 1;
            self.remaining_seconds = self.config.timeout_seconds;
            debug!("{} sorted correctly, score {}", id, self.score);
            self.refill(&mut cmds);
            self.advance(&mut cmds);
        } else {
            debug!("{} sorted into the wrong zone", id);
            self.game_over(GameOverReason::Misclassified, Some(head), &mut cmds);
        }
        cmds
    }

    /// One countdown interval elapsed.
    pub fn tick(&mut self, generation: u64, epoch: u64) -> Commands {
        let mut cmds = Commands::new();
        if generation != self.generation
            || epoch != self.timer.epoch
            || !self.timer.running
            || self.view != View::Playing
        {
            debug!("stale tick (generation {}, epoch {}) ignored", generation, epoch);
            return cmds;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            let head = self.queue.pop_head();
            if head.is_none() {
                // The countdown only runs with a head present.
                self.stop_timer(&mut cmds);
                return cmds;
            }
            self.game_over(GameOverReason::TimedOut, head, &mut cmds);
        }
        cmds
    }

    /// A requested load finished.
    pub fn asset_loaded(
        &mut self,
        generation: u64,
        id: ChallengeId,
        result: Result<LoadedChallenge, AssetLoadError>,
    ) -> Commands {
        let mut cmds = Commands::new();
        if generation != self.generation || !self.view.is_active() {
            debug!("discarding stale load of {} (generation {})", id, generation);
            return cmds;
        }
        if self.in_flight.remove(&id).is_none() {
            debug!("discarding unrequested load of {}", id);
            return cmds;
        }

        match result {
            Ok(challenge) => {
                self.consecutive_failures = 0;
                self.queue.push(challenge);
            }
            Err(e) => {
                self.consecutive_failures += 1;
                warn!(
                    "skipping {} ({} consecutive failures): {}",
                    id, self.consecutive_failures, e
                );
                if self.consecutive_failures >= self.config.max_consecutive_load_failures {
                    self.game_over(GameOverReason::AssetsUnavailable, None, &mut cmds);
                    return cmds;
                }
                self.refill(&mut cmds);
            }
        }

        self.advance(&mut cmds);
        cmds
    }

    // === Leaderboard ===

    /// Submit the final score under `nickname`.
    pub fn submit_score(&mut self, nickname: &str) -> Result<Commands, GameError> {
        if self.view != View::GameOver {
            return Err(GameError::InvalidTransition {
                action: "submit a score",
                view: self.view.name(),
            });
        }
        if self.submission == SubmissionStatus::Pending {
            return Err(GameError::InvalidTransition {
                action: "submit a score",
                view: "a submission is pending",
            });
        }
        let Some(nickname) = normalize_nickname(nickname) else {
            let err = GameError::InvalidInput("nickname must not be empty".to_string());
            self.last_error = Some(err.to_string());
            return Err(err);
        };

        self.submission = SubmissionStatus::Pending;
        self.last_error = None;
        info!("submitting score {} for {}", self.score, nickname);

        let mut cmds = Commands::new();
        cmds.push(Command::Submit {
            generation: self.generation,
            nickname,
            score: self.score,
        });
        Ok(cmds)
    }

    /// A submission finished.
    pub fn submission_completed(
        &mut self,
        generation: u64,
        result: Result<Vec<ScoreEntry>, SubmissionError>,
    ) -> Commands {
        if generation != self.generation || self.view != View::GameOver {
            debug!("discarding stale submission result (generation {})", generation);
            return Commands::new();
        }

        match result {
            Ok(scores) => {
                self.submission = SubmissionStatus::Submitted;
                self.leaderboard = scores;
                self.last_error = None;
                self.view = View::Leaderboard;
            }
            Err(e) => {
                warn!("score submission failed: {}", e);
                self.submission = SubmissionStatus::Failed(e.to_string());
                self.last_error = Some(GameError::Submission(e).to_string());
            }
        }
        Commands::new()
    }

    /// Show the board without submitting.
    pub fn show_leaderboard(&mut self) -> Result<Commands, GameError> {
        if self.view.is_active() || self.submission == SubmissionStatus::Pending {
            return Err(GameError::InvalidTransition {
                action: UserAction::ShowLeaderboard.verb(),
                view: self.view.name(),
            });
        }

        self.view = View::Leaderboard;
        let mut cmds = Commands::new();
        cmds.push(Command::FetchLeaderboard {
            generation: self.generation,
        });
        Ok(cmds)
    }

    /// A board fetch finished.
    pub fn leaderboard_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<ScoreEntry>, SubmissionError>,
    ) -> Commands {
        if generation != self.generation || self.view != View::Leaderboard {
            debug!("discarding stale leaderboard (generation {})", generation);
            return Commands::new();
        }

        match result {
            Ok(scores) => {
                self.leaderboard = scores;
                self.last_error = None;
            }
            Err(e) => {
                warn!("leaderboard fetch failed: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        Commands::new()
    }

    // === Internals ===

    fn reset_play_state(&mut self) {
        self.deck = None;
        self.queue.clear();
        self.in_flight.clear();
        self.score = 0;
        self.remaining_seconds = self.config.timeout_seconds;
        self.consecutive_failures = 0;
        self.failing_challenge = None;
        self.game_over_reason = None;
        self.submission = SubmissionStatus::Idle;
    }

    fn deck_exhausted(&self) -> bool {
        self.deck.as_ref().map_or(true, Deck::is_exhausted)
    }

    /// Request loads until queued plus in-flight fills the window.
    fn refill(&mut self, cmds: &mut Commands) {
        while self.queue.len() + self.in_flight.len() < self.config.window_size {
            let Some(descriptor) = self.deck.as_mut().and_then(Deck::draw) else {
                break;
            };
            self.in_flight.insert(descriptor.id, descriptor.clone());
            cmds.push(Command::Load {
                generation: self.generation,
                descriptor,
            });
        }
    }

    /// Move between loading, playing and cleared once the queue changed.
    fn advance(&mut self, cmds: &mut Commands) {
        let drained = self.in_flight.is_empty() && self.deck_exhausted();

        if self.queue.is_empty() && drained {
            self.game_over(GameOverReason::Cleared, None, cmds);
            return;
        }

        match self.view {
            View::Loading => {
                let window_full = self.queue.len() >= self.config.window_size;
                if window_full || (drained && !self.queue.is_empty()) {
                    self.view = View::Playing;
                    info!("playing with {} challenges queued", self.queue.len());
                    self.start_timer(cmds);
                }
            }
            View::Playing => {
                if !self.timer.running && !self.queue.is_empty() {
                    self.start_timer(cmds);
                }
            }
            _ => {}
        }
    }

    fn start_timer(&mut self, cmds: &mut Commands) {
        self.timer.epoch += 1;
        self.timer.running = true;
        self.remaining_seconds = self.config.timeout_seconds;
        cmds.push(Command::StartTimer {
            generation: self.generation,
            epoch: self.timer.epoch,
        });
    }

    fn stop_timer(&mut self, cmds: &mut Commands) {
        if self.timer.running {
            self.timer.epoch += 1;
            self.timer.running = false;
            cmds.push(Command::StopTimer);
        }
    }

    fn game_over(
        &mut self,
        reason: GameOverReason,
        failing: Option<LoadedChallenge>,
        cmds: &mut Commands,
    ) {
        self.stop_timer(cmds);
        self.deck = None;
        self.queue.clear();
        self.in_flight.clear();
        self.failing_challenge = failing;
        self.game_over_reason = Some(reason);
        self.submission = SubmissionStatus::Idle;
        self.generation += 1;
        self.view = View::GameOver;
        info!("game over ({:?}) with score {}", reason, self.score);
    }
}
