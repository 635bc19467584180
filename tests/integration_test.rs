//! Integration tests running the server binary as a subprocess and talking
//! to it over real WebSocket connections.

use std::process::{Child, Command, Stdio};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

/// Helper struct to manage server process lifecycle
struct TestServer {
    process: Child,
    port: u16,
}

impl TestServer {
    /// Start a test server on the specified port with the default card deck
    fn start(port: u16) -> Self {
        Self::start_with_args(port, &[])
    }

    /// Start a test server with extra CLI arguments
    fn start_with_args(port: u16, extra_args: &[&str]) -> Self {
        let mut args = vec![
            "run".to_string(),
            "--bin".to_string(),
            "server".to_string(),
            "--".to_string(),
            "--port".to_string(),
            port.to_string(),
        ];
        args.extend(extra_args.iter().map(|s| s.to_string()));

        let process = Command::new("cargo")
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start server");

        TestServer { process, port }
    }

    /// WebSocket URL for the given client id
    fn url(&self, client_id: &str) -> String {
        format!("ws://127.0.0.1:{}/ws/{}", self.port, client_id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process when the test ends
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connect to the server, retrying until it is up (the first test run may
/// have to wait out a cargo build).
async fn connect(server: &TestServer, client_id: &str) -> WsClient {
    let url = server.url(client_id);
    for _ in 0..150 {
        if let Ok((ws, _)) = connect_async(&url).await {
            return ws;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    panic!("Server on port {} never became reachable", server.port);
}

async fn send_json(client: &mut WsClient, json: &str) {
    client
        .send(Message::Text(json.to_string().into()))
        .await
        .expect("Failed to send frame");
}

async fn send_chat(client: &mut WsClient, message: &str) {
    let json = format!(r#"{{"type":"chat","payload":{{"message":"{}"}}}}"#, message);
    send_json(client, &json).await;
}

async fn send_next_question(client: &mut WsClient) {
    send_json(client, r#"{"type":"trivia","payload":{"action":"nextQuestion"}}"#).await;
}

/// Receive the next text frame with a timeout
async fn recv_text(client: &mut WsClient) -> String {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Connection closed while waiting for a frame")
            .expect("WebSocket error while waiting for a frame");
        match frame {
            Message::Text(text) => return text.to_string(),
            // Skip control frames
            _ => continue,
        }
    }
}

fn write_deck(name: &str, json: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, json).expect("Failed to write card deck");
    path
}

#[tokio::test]
async fn test_chat_is_broadcast_to_everyone_including_sender() {
    // given: alice and bob are connected
    let server = TestServer::start(18090);
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;

    // when: alice says hi
    send_chat(&mut alice, "hi").await;

    // then: both receive the chat line, sender included
    assert_eq!(recv_text(&mut alice).await, "alice says: hi");
    assert_eq!(recv_text(&mut bob).await, "alice says: hi");
}

#[tokio::test]
async fn test_departure_notice_names_the_leaving_client() {
    // given:
    let server = TestServer::start(18091);
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;

    // when: alice disconnects
    alice.close(None).await.expect("Failed to close");

    // then: bob is told that alice left
    assert_eq!(recv_text(&mut bob).await, "Client #alice left the chat");

    // and subsequent broadcasts still reach bob
    send_chat(&mut bob, "anyone there?").await;
    assert_eq!(recv_text(&mut bob).await, "bob says: anyone there?");
}

#[tokio::test]
async fn test_trivia_round_with_case_sensitive_guessing() {
    // given: a single-card deck with answer "Paris"
    let deck = write_deck(
        "cardparty_paris_deck.json",
        r#"[{"front":"What is the capital of France?","back":"Paris"}]"#,
    );
    let server = TestServer::start_with_args(18092, &["--cards", deck.to_str().unwrap()]);
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;

    // when: bob draws a question
    send_next_question(&mut bob).await;

    // then: everyone receives the prompt
    assert_eq!(recv_text(&mut alice).await, "What is the capital of France?");
    assert_eq!(recv_text(&mut bob).await, "What is the capital of France?");

    // when: alice guesses with the wrong case, then with the exact answer
    send_chat(&mut alice, "paris").await;
    send_chat(&mut alice, "Paris").await;

    // then: frames arrive in order on each connection, so the wrong-case
    // guess produced a chat line only, and the exact guess was announced
    assert_eq!(recv_text(&mut bob).await, "alice says: paris");
    assert_eq!(recv_text(&mut bob).await, "alice says: Paris");
    assert_eq!(
        recv_text(&mut bob).await,
        "Correct Answer! alice correctly guessed the answer: Paris"
    );
}

#[tokio::test]
async fn test_malformed_message_is_answered_with_unicast_error() {
    // given:
    let server = TestServer::start(18093);
    let mut alice = connect(&server, "alice").await;
    let mut bob = connect(&server, "bob").await;

    // when: alice sends an unknown trivia action and bob then chats
    send_json(&mut alice, r#"{"type":"trivia","payload":{"action":"skip"}}"#).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    send_chat(&mut bob, "still here").await;

    // then: alice got the error notice; bob never saw it - his first frame
    // is his own chat line
    assert_eq!(recv_text(&mut alice).await, "Error: Unknown Key");
    assert_eq!(recv_text(&mut bob).await, "bob says: still here");
}

#[tokio::test]
async fn test_empty_deck_surfaces_error_to_requester() {
    // given: an empty card deck
    let deck = write_deck("cardparty_empty_deck.json", "[]");
    let server = TestServer::start_with_args(18094, &["--cards", deck.to_str().unwrap()]);
    let mut alice = connect(&server, "alice").await;

    // when:
    send_next_question(&mut alice).await;

    // then:
    assert_eq!(recv_text(&mut alice).await, "Error: No cards available");

    // and the connection survives the error
    send_chat(&mut alice, "oh well").await;
    assert_eq!(recv_text(&mut alice).await, "alice says: oh well");
}

#[tokio::test]
async fn test_duplicate_client_ids_are_both_served() {
    // given: two connections sharing the identifier "alice"
    let server = TestServer::start(18095);
    let mut first = connect(&server, "alice").await;
    let mut second = connect(&server, "alice").await;

    // when:
    send_chat(&mut first, "twin check").await;

    // then: both connections receive the broadcast
    assert_eq!(recv_text(&mut first).await, "alice says: twin check");
    assert_eq!(recv_text(&mut second).await, "alice says: twin check");
}
