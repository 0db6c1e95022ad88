//! Balanced batch generation.
//!
//! Every batch holds exactly `per_label` kimchi and `per_label` not-kimchi
//! descriptors in uniformly random order, so a card's position says
//! nothing about its label.

use tracing::debug;

use crate::cards::{AssetCatalog, ChallengeDescriptor, ChallengeId, Label};
use crate::core::{GameError, GameRng};

/// Deals balanced batches of descriptors from a catalog.
///
/// Identities come from a monotonically increasing counter owned by the
/// builder, so no two descriptors it ever produces share a `ChallengeId`,
/// even when a small pool forces the same image to be reused.
#[derive(Clone, Debug)]
pub struct DeckBuilder {
    per_label: usize,
    next_id: u64,
    batches_built: u64,
}

impl DeckBuilder {
    /// Create a builder dealing `per_label` descriptors of each label.
    #[must_use]
    pub fn new(per_label: usize) -> Self {
        assert!(per_label > 0, "Batch must contain at least 1 descriptor per label");
        Self {
            per_label,
            next_id: 0,
            batches_built: 0,
        }
    }

    /// Descriptors of each label per batch.
    #[must_use]
    pub fn per_label(&self) -> usize {
        self.per_label
    }

    /// Number of batches dealt so far.
    #[must_use]
    pub fn batches_built(&self) -> u64 {
        self.batches_built
    }

    /// Deal one shuffled batch.
    ///
    /// Per label: a pool at least `per_label` large is sampled without
    /// replacement; a smaller pool is cycled (in shuffled order) until the
    /// quota is met. Fails with `EmptyCatalog` if either pool is empty.
    pub fn build_batch(
        &mut self,
        catalog: &AssetCatalog,
        rng: &mut GameRng,
    ) -> Result<Vec<ChallengeDescriptor>, GameError> {
        for label in [Label::Kimchi, Label::NotKimchi] {
            if catalog.pool(label).is_empty() {
                return Err(GameError::EmptyCatalog { label });
            }
        }

        let mut batch = Vec::with_capacity(self.per_label * 2);
        for label in [Label::Kimchi, Label::NotKimchi] {
            let pool = catalog.pool(label);
            let order = rng.permutation(pool.len());
            for i in 0..self.per_label {
                let entry = &pool[order[i % order.len()]];
                batch.push(ChallengeDescriptor::from_entry(self.alloc_id(), entry));
            }
        }

        rng.shuffle(&mut batch);
        self.batches_built += 1;

        debug!(
            "dealt batch {} ({} descriptors, ids up to {})",
            self.batches_built,
            batch.len(),
            self.next_id
        );
        Ok(batch)
    }

    fn alloc_id(&mut self) -> ChallengeId {
        let id = ChallengeId::new(self.next_id);
        self.next_id += 1;
        id
    }
}
