//! Trivia coordinator: the single active quiz question shared by all
//! connections.
//!
//! Exactly one question is active at a time, process-wide. It is `None` until
//! a client explicitly draws the first one, and it is replaced wholesale on
//! every draw; there is no "question already in progress" guard. Each drawn
//! question carries a monotonically increasing round number.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::CardSource;

/// Trivia-level errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriviaError {
    /// The card collection has no cards to draw a question from.
    #[error("card collection is empty, cannot draw a question")]
    EmptyCollection,
}

/// The currently active quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuestion {
    /// Monotonically increasing round number, starting at 1.
    pub round: u64,
    /// Front of the drawn card, broadcast to all connections.
    pub prompt: String,
    /// Back of the drawn card; guesses are compared against this.
    pub answer: String,
}

/// Outcome of evaluating one guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess matched the active answer byte-for-byte.
    Correct(CorrectGuess),
    /// A question is active but the guess did not match.
    Incorrect,
    /// No question has been drawn yet; the guess is a no-op.
    NoActiveQuestion,
}

/// A broadcast-worthy correct-guess event. The caller is responsible for
/// actually broadcasting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectGuess {
    pub client_id: String,
    pub answer: String,
    pub round: u64,
}

/// Coordinator for the shared trivia round.
pub struct TriviaCoordinator {
    cards: Arc<dyn CardSource>,
    active: Mutex<Option<ActiveQuestion>>,
    rounds: AtomicU64,
}

impl TriviaCoordinator {
    pub fn new(cards: Arc<dyn CardSource>) -> Self {
        Self {
            cards,
            active: Mutex::new(None),
            rounds: AtomicU64::new(0),
        }
    }

    /// Draw one card uniformly at random from the card collection and make it
    /// the active question, replacing any previous one unconditionally.
    ///
    /// Returns the new question's prompt text for broadcast. Fails with
    /// [`TriviaError::EmptyCollection`] when the collection is empty, in
    /// which case the active question is left untouched.
    pub async fn next_question(&self) -> Result<ActiveQuestion, TriviaError> {
        let cards = self.cards.fetch_all_cards().await;
        if cards.is_empty() {
            return Err(TriviaError::EmptyCollection);
        }

        let index = rand::rng().random_range(0..cards.len());
        let card = &cards[index];
        let round = self.rounds.fetch_add(1, Ordering::Relaxed) + 1;
        let question = ActiveQuestion {
            round,
            prompt: card.front.clone(),
            answer: card.back.clone(),
        };

        let mut active = self.active.lock().await;
        *active = Some(question.clone());
        tracing::info!("Round {} started: '{}'", round, question.prompt);

        Ok(question)
    }

    /// Evaluate one guess against the active question.
    ///
    /// Comparison is byte-for-byte: case-sensitive, no trimming. Each guess
    /// is evaluated independently against whatever question is active at
    /// evaluation time; the question lock is held for the comparison so a
    /// guess is never evaluated against a half-replaced question.
    pub async fn submit_guess(&self, client_id: &str, guess: &str) -> GuessOutcome {
        let active = self.active.lock().await;
        match active.as_ref() {
            None => GuessOutcome::NoActiveQuestion,
            Some(question) if question.answer == guess => {
                tracing::info!(
                    "Client '{}' answered round {} correctly",
                    client_id,
                    question.round
                );
                GuessOutcome::Correct(CorrectGuess {
                    client_id: client_id.to_string(),
                    answer: question.answer.clone(),
                    round: question.round,
                })
            }
            Some(_) => GuessOutcome::Incorrect,
        }
    }

    /// Round number of the active question, if any.
    pub async fn active_round(&self) -> Option<u64> {
        self.active.lock().await.as_ref().map(|q| q.round)
    }
}
