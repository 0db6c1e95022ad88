//! # kimchi-sort
//!
//! Session engine and leaderboard service for a timed card-sorting game:
//! every card shows a food image and the player drops it on the "kimchi"
//! or "not kimchi" zone before its countdown runs out. One wrong drop or
//! one timeout ends the game.
//!
//! ## Design Principles
//!
//! 1. **Pure State Machine**: `SessionEngine` never performs I/O. It turns
//!    actions and events into `Command`s, so every race can be replayed
//!    deterministically in tests.
//!
//! 2. **Stale Results Are Dropped**: every async result carries the
//!    generation that requested it; ticks additionally carry a timer epoch.
//!    A card is resolved at most once.
//!
//! 3. **Configuration Over Constants**: timeout, window size, batch size
//!    and deck policy all live in `GameConfig`.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors, tracing setup
//! - `cards`: labels, descriptors, the asset catalog
//! - `deck`: balanced shuffled batches and the self-replenishing deck
//! - `loader`: resolving descriptors into displayable images
//! - `session`: the state machine, its runtime, and the countdown
//! - `leaderboard`: score store, HTTP service, and clients
//!
//! ## Example
//!
//! ```
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use kimchi_sort::{AssetCatalog, AssetRef, CatalogEntry, GameConfig, Label, SessionEngine, View};
//!
//! let catalog = AssetCatalog::new()
//!     .with_entry(CatalogEntry::new("배추김치", Label::Kimchi, "", AssetRef::Path(PathBuf::from("a.gif"))))
//!     .with_entry(CatalogEntry::new("pizza", Label::NotKimchi, "", AssetRef::Path(PathBuf::from("b.gif"))));
//!
//! let mut engine = SessionEngine::new(GameConfig::new().with_seed(7), Arc::new(catalog));
//! let commands = engine.start_game().unwrap();
//!
//! assert_eq!(engine.view(), View::Loading);
//! assert_eq!(commands.len(), 10);
//! ```

pub mod core;
pub mod cards;
pub mod deck;
pub mod loader;
pub mod session;
pub mod leaderboard;

// Re-export commonly used types
pub use crate::core::{
    init_tracing, DeckPolicy, GameConfig, GameRng, ServerConfig,
    AssetLoadError, CatalogError, GameError, StoreError, SubmissionError,
};

pub use crate::cards::{AssetCatalog, AssetRef, CatalogEntry, ChallengeDescriptor, ChallengeId, Label};

pub use crate::deck::{Deck, DeckBuilder};

pub use crate::loader::{ChallengeLoader, FsLoader, HttpLoader, ImageFormat, LoadedAsset, LoadedChallenge};

pub use crate::session::{
    ActiveQueue, Command, Commands, Countdown, GameOverReason,
    SessionEngine, SessionEvent, SessionHandle, SessionRuntime,
    SessionSnapshot, SubmissionStatus, UserAction, View,
};

pub use crate::leaderboard::{
    HttpLeaderboardClient, LeaderboardClient, LeaderboardServer, LocalLeaderboard,
    ScoreEntry, ScoreStore,
};
