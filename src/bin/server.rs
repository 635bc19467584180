//! WebSocket trivia server for playing flashcards with friends.
//!
//! Broadcasts chat to all connected clients and coordinates a shared trivia
//! round drawn from the card collection.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --cards decks/capitals.json
//! ```

use std::{path::PathBuf, sync::Arc};

use cardparty::{
    common::logger::setup_logger,
    infrastructure::InMemoryCardStore,
    registry::ConnectionRegistry,
    server::{AppState, run_server},
    trivia::TriviaCoordinator,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "WebSocket trivia server with chat broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// JSON file with the card collection ([{"front": ..., "back": ...}]).
    /// Falls back to the built-in starter deck when omitted.
    #[arg(short = 'c', long)]
    cards: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Card collection: the external study-app data this server only reads
    let store = match &args.cards {
        Some(path) => match InMemoryCardStore::from_json_file(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::error!("Failed to load cards from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => InMemoryCardStore::with_default_cards(),
    };
    let store = Arc::new(store);
    tracing::info!("Card collection loaded: {} cards", store.len().await);

    let registry = Arc::new(ConnectionRegistry::new());
    let trivia = Arc::new(TriviaCoordinator::new(store));
    let state = Arc::new(AppState::new(registry, trivia));

    if let Err(e) = run_server(args.host, args.port, state).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
