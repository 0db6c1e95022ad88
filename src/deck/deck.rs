//! Session-scoped deck.
//!
//! A `Deck` is created by `start_game` and owned by the session engine.
//! Under `DeckPolicy::Infinite` it appends a freshly shuffled batch whenever
//! fewer than `low_water_mark` descriptors remain, so it never runs dry.
//! Under `DeckPolicy::Finite` it holds exactly one batch.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use super::builder::DeckBuilder;
use crate::cards::{AssetCatalog, ChallengeDescriptor};
use crate::core::{DeckPolicy, GameConfig, GameError, GameRng};

#[derive(Debug)]
pub struct Deck {
    catalog: Arc<AssetCatalog>,
    builder: DeckBuilder,
    rng: GameRng,
    pending: VecDeque<ChallengeDescriptor>,
    policy: DeckPolicy,
    low_water_mark: usize,
    drawn: u64,
}

impl Deck {
    /// Build a deck and deal its first batch.
    ///
    /// The first batch is dealt eagerly so an unusable catalog is reported
    /// before any session state changes.
    pub fn new(
        catalog: Arc<AssetCatalog>,
        config: &GameConfig,
        rng: GameRng,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let mut deck = Self {
            catalog,
            builder: DeckBuilder::new(config.per_label),
            rng,
            pending: VecDeque::new(),
            policy: config.deck_policy,
            low_water_mark: config.low_water_mark,
            drawn: 0,
        };
        deck.append_batch()?;
        Ok(deck)
    }

    /// Take the next descriptor.
    ///
    /// Returns `None` only for a drained finite deck.
    pub fn draw(&mut self) -> Option<ChallengeDescriptor> {
        if self.policy == DeckPolicy::Infinite && self.pending.len() < self.low_water_mark.max(1) {
            // The catalog was non-empty when the deck was created and is
            // read-only, so refilling cannot fail.
            if let Err(err) = self.append_batch() {
                debug!("deck refill failed: {}", err);
            }
        }
        let next = self.pending.pop_front();
        if next.is_some() {
            self.drawn += 1;
        }
        next
    }

    /// Descriptors dealt but not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Descriptors drawn so far.
    #[must_use]
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Batches dealt so far.
    #[must_use]
    pub fn batches_built(&self) -> u64 {
        self.builder.batches_built()
    }

    #[must_use]
    pub fn policy(&self) -> DeckPolicy {
        self.policy
    }

    /// True once a finite deck has nothing left to draw.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.policy == DeckPolicy::Finite && self.pending.is_empty()
    }

    fn append_batch(&mut self) -> Result<(), GameError> {
        let batch = self.builder.build_batch(&self.catalog, &mut self.rng)?;
        self.pending.extend(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cards::{AssetRef, CatalogEntry, Label};

    fn catalog() -> Arc<AssetCatalog> {
        Arc::new(
            AssetCatalog::new()
                .with_entry(CatalogEntry::new("k", Label::Kimchi, "", AssetRef::Path(PathBuf::from("k.jpg"))))
                .with_entry(CatalogEntry::new("n", Label::NotKimchi, "", AssetRef::Path(PathBuf::from("n.jpg")))),
        )
    }

    #[test]
    fn test_zero_per_label_is_an_error() {
        let mut config = GameConfig::new();
        config.per_label = 0;
        let result = Deck::new(catalog(), &config, GameRng::new(1));
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_infinite_deck_refills() {
        let config = GameConfig::new().with_per_label(2).with_low_water_mark(2);
        let mut deck = Deck::new(catalog(), &config, GameRng::new(1)).unwrap();
        assert_eq!(deck.remaining(), 4);

        for _ in 0..100 {
            assert!(deck.draw().is_some());
        }
        assert!(deck.batches_built() > 1);
        assert!(!deck.is_exhausted());
        assert_eq!(deck.drawn(), 100);
    }

    #[test]
    fn test_refill_happens_below_low_water_mark() {
        let config = GameConfig::new().with_per_label(2).with_low_water_mark(3);
        let mut deck = Deck::new(catalog(), &config, GameRng::new(1)).unwrap();

        deck.draw();
        assert_eq!(deck.remaining(), 3);
        assert_eq!(deck.batches_built(), 1);

        // 3 remaining is not below the mark; 2 is.
        deck.draw();
        assert_eq!(deck.batches_built(), 1);
        deck.draw();
        assert_eq!(deck.batches_built(), 2);
    }

    #[test]
    fn test_finite_deck_drains() {
        let config = GameConfig::new()
            .with_per_label(3)
            .with_deck_policy(DeckPolicy::Finite);
        let mut deck = Deck::new(catalog(), &config, GameRng::new(1)).unwrap();

        let drawn: Vec<_> = std::iter::from_fn(|| deck.draw()).collect();
        assert_eq!(drawn.len(), 6);
        assert!(deck.is_exhausted());
        assert!(deck.draw().is_none());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let config = GameConfig::new();
        let err = Deck::new(Arc::new(AssetCatalog::new()), &config, GameRng::new(1)).unwrap_err();
        assert!(matches!(err, GameError::EmptyCatalog { .. }));
    }
}
