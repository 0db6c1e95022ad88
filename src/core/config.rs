//! Game and service configuration.
//!
//! - `GameConfig`: timing, window and deck composition for a play-through
//! - `DeckPolicy`: whether the deck replenishes itself or runs out
//! - `ServerConfig`: where the leaderboard service listens and persists
//!
//! The engine never hardcodes these values; the defaults below are
//! what the product ships with.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Seconds a player has to sort each card.
pub const DEFAULT_TIMEOUT_SECONDS: u32 = 5;

/// Number of loaded challenges kept ahead of the player.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Descriptors of each label per generated batch (20 + 20 = 40).
pub const DEFAULT_PER_LABEL: usize = 20;

/// A new batch is appended once fewer descriptors than this remain.
pub const DEFAULT_LOW_WATER_MARK: usize = 5;

/// Consecutive asset failures tolerated before a session is abandoned.
pub const DEFAULT_MAX_CONSECUTIVE_LOAD_FAILURES: u32 = 32;

/// Countdown granularity.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Default port of the leaderboard service.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default score file of the leaderboard service.
pub const DEFAULT_SCORE_FILE: &str = "scores.json";

/// How the deck behaves once its current batch runs low.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckPolicy {
    /// Append a freshly shuffled batch below the low-water mark.
    #[default]
    Infinite,
    /// A single batch; draining it clears the game.
    Finite,
}

/// Configuration for one session engine.
///
/// ## Example
///
/// ```
/// use kimchi_sort::core::{DeckPolicy, GameConfig};
///
/// let config = GameConfig::new()
///     .with_timeout_seconds(3)
///     .with_window_size(4)
///     .with_deck_policy(DeckPolicy::Finite)
///     .with_seed(42);
///
/// assert_eq!(config.timeout_seconds, 3);
/// assert_eq!(config.batch_size(), 40);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Countdown reset value after every correct answer.
    pub timeout_seconds: u32,

    /// Target size of the active queue.
    pub window_size: usize,

    /// Positive (and negative) descriptors per batch.
    pub per_label: usize,

    /// Refill threshold for infinite decks.
    pub low_water_mark: usize,

    /// Infinite or finite deck.
    pub deck_policy: DeckPolicy,

    /// Interval between countdown ticks.
    #[serde(with = "duration_millis")]
    pub tick_interval: Duration,

    /// Fixed seed for reproducible decks. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Consecutive load failures before the session ends.
    pub max_consecutive_load_failures: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            window_size: DEFAULT_WINDOW_SIZE,
            per_label: DEFAULT_PER_LABEL,
            low_water_mark: DEFAULT_LOW_WATER_MARK,
            deck_policy: DeckPolicy::Infinite,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
            max_consecutive_load_failures: DEFAULT_MAX_CONSECUTIVE_LOAD_FAILURES,
        }
    }
}

impl GameConfig {
    /// Create a configuration with the shipped defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-card timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u32) -> Self {
        assert!(seconds > 0, "Timeout must be at least 1 second");
        self.timeout_seconds = seconds;
        self
    }

    /// Set the active queue window.
    #[must_use]
    pub fn with_window_size(mut self, size: usize) -> Self {
        assert!(size > 0, "Window must hold at least 1 challenge");
        self.window_size = size;
        self
    }

    /// Set descriptors per label per batch.
    #[must_use]
    pub fn with_per_label(mut self, count: usize) -> Self {
        assert!(count > 0, "Batch must contain at least 1 descriptor per label");
        self.per_label = count;
        self
    }

    /// Set the refill threshold.
    #[must_use]
    pub fn with_low_water_mark(mut self, mark: usize) -> Self {
        self.low_water_mark = mark;
        self
    }

    /// Set the deck policy.
    #[must_use]
    pub fn with_deck_policy(mut self, policy: DeckPolicy) -> Self {
        self.deck_policy = policy;
        self
    }

    /// Set the countdown tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the consecutive load failure limit.
    #[must_use]
    pub fn with_max_consecutive_load_failures(mut self, limit: u32) -> Self {
        self.max_consecutive_load_failures = limit;
        self
    }

    /// Total descriptors per generated batch.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.per_label * 2
    }

    /// Reject values the builders would refuse.
    ///
    /// Deserialized configs skip the builders, so sessions call this before
    /// building a deck.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.timeout_seconds == 0 {
            return Err(GameError::InvalidConfig("timeout_seconds must be at least 1".to_string()));
        }
        if self.window_size == 0 {
            return Err(GameError::InvalidConfig("window_size must be at least 1".to_string()));
        }
        if self.per_label == 0 {
            return Err(GameError::InvalidConfig("per_label must be at least 1".to_string()));
        }
        if self.tick_interval.is_zero() {
            return Err(GameError::InvalidConfig("tick_interval must be non-zero".to_string()));
        }
        Ok(())
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

/// Leaderboard service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind. `0` picks a free port.
    pub port: u16,
    /// JSON file holding the score records.
    pub score_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_SERVER_PORT,
            score_file: PathBuf::from(DEFAULT_SCORE_FILE),
        }
    }
}

impl ServerConfig {
    /// Read `KIMCHI_HOST`, `PORT` and `KIMCHI_SCORE_FILE`, keeping defaults
    /// for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = lookup("KIMCHI_HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            config.port = port;
        }
        if let Some(file) = lookup("KIMCHI_SCORE_FILE").filter(|f| !f.trim().is_empty()) {
            config.score_file = PathBuf::from(file);
        }
        config
    }

    /// Socket address to bind, if host and port form one.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.window_size, 10);
        assert_eq!(config.batch_size(), 40);
        assert_eq!(config.low_water_mark, 5);
        assert_eq!(config.deck_policy, DeckPolicy::Infinite);
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_game_config_builder() {
        let config = GameConfig::new()
            .with_timeout_seconds(3)
            .with_window_size(2)
            .with_per_label(4)
            .with_low_water_mark(1)
            .with_deck_policy(DeckPolicy::Finite)
            .with_tick_interval(Duration::from_millis(250))
            .with_seed(9)
            .with_max_consecutive_load_failures(3);

        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.window_size, 2);
        assert_eq!(config.batch_size(), 8);
        assert_eq!(config.low_water_mark, 1);
        assert_eq!(config.deck_policy, DeckPolicy::Finite);
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_consecutive_load_failures, 3);
    }

    #[test]
    #[should_panic(expected = "Window must hold at least 1 challenge")]
    fn test_zero_window_panics() {
        let _ = GameConfig::new().with_window_size(0);
    }

    #[test]
    fn test_game_config_serde_partial() {
        let json = r#"{"timeout_seconds": 7, "deck_policy": "finite", "tick_interval": 500}"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.timeout_seconds, 7);
        assert_eq!(config.deck_policy, DeckPolicy::Finite);
        assert_eq!(config.tick_interval, Duration::from_millis(500));
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(GameConfig::new().validate().is_ok());
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_fields_from_serde() {
        for (json, field) in [
            (r#"{"timeout_seconds": 0}"#, "timeout_seconds"),
            (r#"{"window_size": 0}"#, "window_size"),
            (r#"{"per_label": 0}"#, "per_label"),
            (r#"{"tick_interval": 0}"#, "tick_interval"),
        ] {
            let config: GameConfig = serde_json::from_str(json).unwrap();
            match config.validate() {
                Err(GameError::InvalidConfig(message)) => {
                    assert!(message.contains(field), "{} -> {}", json, message)
                }
                other => panic!("{} validated as {:?}", json, other),
            }
        }
    }

    #[test]
    fn test_server_config_from_lookup() {
        let config = ServerConfig::from_lookup(|key| match key {
            "PORT" => Some("8080".to_string()),
            "KIMCHI_SCORE_FILE" => Some("/tmp/board.json".to_string()),
            _ => None,
        });

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.score_file, PathBuf::from("/tmp/board.json"));
        assert!(config.bind_addr().is_ok());
    }

    #[test]
    fn test_server_config_ignores_bad_port() {
        let config = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.port, DEFAULT_SERVER_PORT);
    }
}
