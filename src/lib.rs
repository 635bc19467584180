//! Real-time "play with friends" server for a flashcard study application.
//!
//! This library provides the WebSocket broadcast core (connection registry),
//! the shared trivia round (coordinator drawing questions from the card
//! collection), and a small interactive client.

pub mod client;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod trivia;
