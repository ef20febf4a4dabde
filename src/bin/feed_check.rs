//! Binary to connect to the Birdeye feed WebSocket and subscribe to price
//! candles for wrapped SOL, for inspecting live data.
//!
//! # Usage
//!
//! ```sh
//! export BIRDEYE_API_KEY="your-api-key"
//! export BIRDEYE_CHAIN="solana"          # optional
//! cargo run --bin feed_check --features cli
//! ```

use std::env;
use std::time::Duration;

use birdeye_ws::ws::session::{SessionEvent, StreamMessage};
use birdeye_ws::{StreamingClient, SubscriptionRequest};
use futures_util::StreamExt;

/// Wrapped SOL — a liquid, well-known token for inspection.
const WSOL_ADDRESS: &str = "So11111111111111111111111111111111111111112";

#[tokio::main]
async fn main() -> birdeye_ws::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let api_key =
        env::var("BIRDEYE_API_KEY").expect("set BIRDEYE_API_KEY env var before running");
    let chain = env::var("BIRDEYE_CHAIN").unwrap_or_else(|_| "solana".to_owned());
    let address = env::args().nth(1).unwrap_or_else(|| WSOL_ADDRESS.to_owned());

    println!("Connecting to the Birdeye feed ({chain})…");
    let client = StreamingClient::builder(api_key)
        .chain(chain)
        .session_lifetime(Duration::from_secs(60))
        .build();

    let mut stream = client
        .subscribe(vec![SubscriptionRequest::price(address)])
        .await?;

    println!("Listening for up to 60 seconds (Ctrl-C to stop early)…\n");
    let cancel = stream.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nCtrl-C — cancelling session…");
            cancel.cancel();
        }
    });

    while let Some(message) = stream.next().await {
        match message {
            StreamMessage::Feed(feed) => println!("{feed:#?}"),
            StreamMessage::Session(SessionEvent::Connected) => {
                println!("Session connected.");
            }
            StreamMessage::Session(SessionEvent::Closed(reason)) => {
                println!("Session closed: {reason:?}");
            }
            StreamMessage::Session(SessionEvent::Failed(error)) => {
                eprintln!("Session failed: {error}");
            }
        }
    }

    println!("Done.");
    Ok(())
}
