//! Interactive trivia client.
//!
//! Connects to the trivia server and sends messages from stdin. Plain lines
//! are chat (and double as guesses); the `/next` command draws a new
//! question. Automatically reconnects on disconnection (max 5 attempts with
//! 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --client-id Alice
//! cargo run --bin client -- -c Bob
//! ```

use clap::Parser;

use cardparty::common::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Interactive client for the WebSocket trivia server", long_about = None)]
struct Args {
    /// Client ID for tagging messages (opaque, not required to be unique)
    #[arg(short = 'c', long)]
    client_id: String,

    /// WebSocket server URL (the client ID is appended to the path)
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = cardparty::client::run_client(args.url, args.client_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
