//! Card collection boundary.
//!
//! The card collection (cards/sets CRUD, users, the whole study side of the
//! application) lives outside this server. The trivia coordinator only needs
//! a read-only view of it, defined here so the coordinator depends on the
//! interface and not on any concrete store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One flashcard: prompt text on the front, answer text on the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Read-only view of the external card collection.
///
/// No ordering guarantee. The trivia coordinator draws uniformly from
/// whatever this returns at call time.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Fetch every card in the collection.
    async fn fetch_all_cards(&self) -> Vec<Card>;
}
