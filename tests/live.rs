//! Integration tests against the live Birdeye WebSocket endpoint.
//!
//! # Running
//!
//! These tests require a real Birdeye API key. Set it before running:
//!
//! ```sh
//! export BIRDEYE_API_KEY="your-api-key"
//! cargo test --test live -- --nocapture
//! ```
//!
//! Without the env var, every test is silently skipped.

use std::time::Duration;

use birdeye_ws::ws::session::{SessionEvent, StreamMessage};
use birdeye_ws::{StreamingClient, SubscriptionRequest};
use tokio::time::timeout;

/// Wrapped SOL — always actively traded, so price data arrives quickly.
const WSOL: &str = "So11111111111111111111111111111111111111112";

/// Helper: create a live client or skip the test.
fn live_client() -> Option<StreamingClient> {
    let api_key = std::env::var("BIRDEYE_API_KEY").ok()?;
    if api_key.is_empty() {
        return None;
    }
    Some(StreamingClient::new(api_key))
}

/// Macro to skip a test when credentials are missing.
macro_rules! require_client {
    () => {
        match live_client() {
            Some(c) => c,
            None => {
                eprintln!("⏭  Skipped (BIRDEYE_API_KEY not set)");
                return;
            }
        }
    };
}

// ===================================================================
// Price stream
// ===================================================================

#[tokio::test]
async fn test_price_stream_connects() {
    let client = require_client!();

    let mut stream = client
        .subscribe(vec![SubscriptionRequest::price(WSOL)])
        .await
        .expect("subscribe failed");

    let first = timeout(Duration::from_secs(15), stream.recv())
        .await
        .expect("no event within 15s")
        .expect("stream ended without events");
    assert!(
        matches!(first, StreamMessage::Session(SessionEvent::Connected)),
        "expected Connected first, got {first:?}"
    );

    // Wait for at least one feed message, then hang up.
    let mut saw_feed = false;
    let window = tokio::time::sleep(Duration::from_secs(20));
    tokio::pin!(window);
    loop {
        tokio::select! {
            _ = &mut window => break,
            msg = stream.recv() => match msg {
                Some(StreamMessage::Feed(feed)) => {
                    println!("✔ feed: {feed:?}");
                    saw_feed = true;
                    break;
                }
                Some(other) => println!("  event: {other:?}"),
                None => panic!("stream ended while waiting for feed data"),
            },
        }
    }
    assert!(saw_feed, "no feed message within 20s");

    stream.cancel();
    while let Some(msg) = stream.recv().await {
        if matches!(msg, StreamMessage::Session(SessionEvent::Closed(_))) {
            return;
        }
    }
    panic!("stream ended without a Closed event");
}
