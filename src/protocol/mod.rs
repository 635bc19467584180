//! Wire protocol for the play-with-friends endpoint.
//!
//! Inbound frames are JSON envelopes distinguishing chat messages from trivia
//! actions. Anything that does not parse into the envelope shape — unknown
//! type, missing or unknown trivia action, non-JSON text — is a malformed
//! message: the sender gets a unicast error notice and the connection stays
//! open.
//!
//! Outbound frames are plain text lines, not structured.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unicast error notice for malformed inbound frames.
pub const ERROR_UNKNOWN_KEY: &str = "Error: Unknown Key";

/// Unicast error notice when a question is requested but the card
/// collection is empty.
pub const ERROR_NO_CARDS: &str = "Error: No cards available";

/// Protocol-level errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame did not parse as a known envelope.
    #[error("malformed message: {0}")]
    Malformed(String),
}

/// Inbound message envelope: `{"type": ..., "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ClientEnvelope {
    /// `{"type":"chat","payload":{"message":"..."}}`
    Chat { message: String },
    /// `{"type":"trivia","payload":{"action":"nextQuestion"}}`
    Trivia { action: TriviaAction },
}

/// Recognized trivia actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriviaAction {
    #[serde(rename = "nextQuestion")]
    NextQuestion,
}

/// Parse one inbound text frame into an envelope.
pub fn parse_envelope(text: &str) -> Result<ClientEnvelope, ProtocolError> {
    serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// `"<clientId> says: <message>"`
pub fn chat_line(client_id: &str, message: &str) -> String {
    format!("{} says: {}", client_id, message)
}

/// A new question is broadcast as its prompt text, verbatim.
pub fn question_line(prompt: &str) -> String {
    prompt.to_string()
}

/// `"Correct Answer! <clientId> correctly guessed the answer: <answer>"`
pub fn correct_guess_line(client_id: &str, answer: &str) -> String {
    format!(
        "Correct Answer! {} correctly guessed the answer: {}",
        client_id, answer
    )
}

/// `"Client #<clientId> left the chat"`
pub fn departure_line(client_id: &str) -> String {
    format!("Client #{} left the chat", client_id)
}
