//! Game session: the state machine and its async runtime.
//!
//! ## Key Types
//!
//! - `SessionEngine`: synchronous state machine, actions and events in,
//!   `Command`s out
//! - `SessionRuntime` / `SessionHandle`: actor that executes commands on
//!   tokio and publishes `SessionSnapshot`s
//! - `ActiveQueue`: loaded challenges in front of the player
//! - `Countdown`: cancellable per-card ticker
//!
//! ## Lifecycle
//!
//! ```text
//! Menu -> Loading -> Playing -> GameOver -> Leaderboard -> Menu
//! ```
//!
//! A play-through ends on the first wrong drop, on timeout, when a finite
//! deck is cleared, or when assets keep failing to load.

pub mod engine;
pub mod event;
pub mod queue;
pub mod runtime;
pub mod state;
pub mod timer;

pub use engine::SessionEngine;
pub use event::{Command, Commands, SessionEvent, UserAction};
pub use queue::ActiveQueue;
pub use runtime::{SessionHandle, SessionRuntime};
pub use state::{GameOverReason, SessionSnapshot, SubmissionStatus, View};
pub use timer::Countdown;
