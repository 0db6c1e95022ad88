//! Active queue: loaded challenges waiting in front of the player.

use im::Vector;

use crate::cards::ChallengeId;
use crate::loader::LoadedChallenge;

/// Bounded lookahead of fully loaded challenges.
///
/// Only loaded challenges ever enter the queue, so the head is always
/// displayable. Backed by `im::Vector` so snapshots clone in O(1).
#[derive(Clone, Debug, Default)]
pub struct ActiveQueue {
    items: Vector<LoadedChallenge>,
}

impl ActiveQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The challenge the player is sorting now.
    #[must_use]
    pub fn head(&self) -> Option<&LoadedChallenge> {
        self.items.front()
    }

    /// Remove and return the head.
    pub fn pop_head(&mut self) -> Option<LoadedChallenge> {
        self.items.pop_front()
    }

    /// Append a freshly loaded challenge.
    pub fn push(&mut self, challenge: LoadedChallenge) {
        self.items.push_back(challenge);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedChallenge> {
        self.items.iter()
    }

    /// Persistent copy of the contents.
    #[must_use]
    pub fn to_vector(&self) -> Vector<LoadedChallenge> {
        self.items.clone()
    }
}
