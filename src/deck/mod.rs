//! Deck construction.
//!
//! - `DeckBuilder`: deals balanced, Fisher-Yates shuffled batches
//! - `Deck`: the session-scoped, self-replenishing sequence of descriptors

pub mod builder;
#[allow(clippy::module_inception)]
pub mod deck;

pub use builder::DeckBuilder;
pub use deck::Deck;
