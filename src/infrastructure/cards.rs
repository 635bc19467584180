//! In-memory card store.
//!
//! Stands in for the study application's card persistence. The real
//! collection lives behind the CRUD side of the app; this server only ever
//! reads it, so a mutex-guarded vector is enough.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Card, CardSource};

/// In-memory implementation of [`CardSource`].
pub struct InMemoryCardStore {
    cards: Mutex<Vec<Card>>,
}

impl InMemoryCardStore {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: Mutex::new(cards),
        }
    }

    /// Seed data matching the study application's starter deck.
    pub fn with_default_cards() -> Self {
        Self::new(vec![
            Card::new("Where is Taylor located?", "Upland, IN"),
            Card::new("What is the capital of Indiana?", "Indianapolis, IN"),
        ])
    }

    /// Load cards from a JSON file: `[{"front": "...", "back": "..."}, ...]`.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let cards: Vec<Card> = serde_json::from_str(&contents)?;
        Ok(Self::new(cards))
    }

    pub async fn add_card(&self, card: Card) {
        self.cards.lock().await.push(card);
    }

    pub async fn clear(&self) {
        self.cards.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.cards.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cards.lock().await.is_empty()
    }
}

#[async_trait]
impl CardSource for InMemoryCardStore {
    async fn fetch_all_cards(&self) -> Vec<Card> {
        self.cards.lock().await.clone()
    }
}
