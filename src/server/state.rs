//! Shared server state.

use std::sync::Arc;

use crate::registry::ConnectionRegistry;
use crate::trivia::TriviaCoordinator;

/// Shared application state, constructed once at startup and handed to every
/// connection task.
pub struct AppState {
    /// Registry of live connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Coordinator for the shared trivia round.
    pub trivia: Arc<TriviaCoordinator>,
}

impl AppState {
    pub fn new(registry: Arc<ConnectionRegistry>, trivia: Arc<TriviaCoordinator>) -> Self {
        Self { registry, trivia }
    }
}
