//! WebSocket connection handlers and the per-connection dispatch loop.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::{
    common::time::{millis_to_rfc3339, now_millis},
    protocol::{
        ClientEnvelope, ERROR_NO_CARDS, ERROR_UNKNOWN_KEY, ProtocolError, TriviaAction, chat_line,
        correct_guess_line, departure_line, parse_envelope, question_line,
    },
    registry::{Connection, ConnectionId},
    trivia::{GuessOutcome, TriviaError},
};

use super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    // Create a channel for this client to receive broadcasts
    let (tx, rx) = mpsc::unbounded_channel();

    // Register before the upgrade completes; frames queued on the channel are
    // drained once the pusher task starts. The client identifier is opaque
    // and intentionally not checked for uniqueness.
    let connection = Connection::new(client_id.clone(), tx, now_millis());
    let connection_id = connection.id;
    state.registry.register(connection).await;

    tracing::info!(
        "Client '{}' connected as connection {}",
        client_id,
        connection_id
    );

    ws.on_upgrade(move |socket| handle_socket(socket, state, client_id, connection_id, rx))
}

/// Spawns a task that drains the rx channel into the WebSocket sender.
///
/// This is the outbound half of a connection: frames fanned out by the
/// registry land on the channel and are pushed to this client's socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: String,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    // Outbound: drain broadcasts into the socket
    let mut send_task = pusher_loop(rx, sender);

    // Inbound: read frames from this client and dispatch them
    let client_id_clone = client_id.clone();
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on connection {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_message(&state_clone, &connection_id, &client_id_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Leave the active set first so the departure notice does not target the
    // departing connection, then tell everyone else.
    state.registry.unregister(&connection_id).await;
    state.registry.broadcast(&departure_line(&client_id)).await;
    tracing::info!(
        "Client '{}' (connection {}) disconnected",
        client_id,
        connection_id
    );
}

/// Translate one inbound text frame into registry/coordinator calls.
async fn dispatch_message(
    state: &AppState,
    connection_id: &ConnectionId,
    client_id: &str,
    text: &str,
) {
    match parse_envelope(text) {
        Ok(ClientEnvelope::Chat { message }) => {
            // Every chat line goes to all connections, sender included, and
            // doubles as a guess against the active question.
            state
                .registry
                .broadcast(&chat_line(client_id, &message))
                .await;

            if let GuessOutcome::Correct(correct) =
                state.trivia.submit_guess(client_id, &message).await
            {
                state
                    .registry
                    .broadcast(&correct_guess_line(&correct.client_id, &correct.answer))
                    .await;
            }
        }
        Ok(ClientEnvelope::Trivia {
            action: TriviaAction::NextQuestion,
        }) => match state.trivia.next_question().await {
            Ok(question) => {
                state
                    .registry
                    .broadcast(&question_line(&question.prompt))
                    .await;
            }
            Err(TriviaError::EmptyCollection) => {
                tracing::warn!(
                    "Client '{}' requested a question but the card collection is empty",
                    client_id
                );
                if let Err(e) = state.registry.send(connection_id, ERROR_NO_CARDS).await {
                    tracing::warn!("Failed to notify connection {}: {}", connection_id, e);
                }
            }
        },
        Err(ProtocolError::Malformed(reason)) => {
            tracing::warn!(
                "Malformed message from client '{}': {}",
                client_id,
                reason
            );
            if let Err(e) = state.registry.send(connection_id, ERROR_UNKNOWN_KEY).await {
                tracing::warn!("Failed to notify connection {}: {}", connection_id, e);
            }
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Debug, Serialize)]
pub struct ConnectionDto {
    pub client_id: String,
    pub connected_at: String,
}

#[derive(Debug, Serialize)]
pub struct RegistryDebugDto {
    pub connections: Vec<ConnectionDto>,
    pub active_round: Option<u64>,
}

/// Debug endpoint exposing the active connection set and the current round.
pub async fn debug_registry(State(state): State<Arc<AppState>>) -> Json<RegistryDebugDto> {
    let connections = state
        .registry
        .snapshot()
        .await
        .into_iter()
        .map(|c| ConnectionDto {
            client_id: c.client_id,
            connected_at: millis_to_rfc3339(c.connected_at),
        })
        .collect();

    Json(RegistryDebugDto {
        connections,
        active_round: state.trivia.active_round().await,
    })
}
