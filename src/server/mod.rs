//! WebSocket trivia server implementation.

mod handler;
mod runner;
mod signal;
mod state;

pub use runner::run_server;
pub use state::AppState;
