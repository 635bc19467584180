//! Concrete implementations of the domain boundaries.

mod cards;

pub use cards::InMemoryCardStore;
