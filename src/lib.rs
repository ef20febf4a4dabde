//! # birdeye-ws
//!
//! A Rust streaming client for the Birdeye WebSocket feed: price candles,
//! token/pair/wallet transactions, and new-pair listings, delivered as
//! typed messages over a single push connection.
//!
//! ## Quick Start
//!
//! ```no_run
//! use birdeye_ws::{StreamingClient, SubscriptionRequest};
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> birdeye_ws::Result<()> {
//!     let client = StreamingClient::builder("your-api-key").build();
//!     let mut stream = client
//!         .subscribe(vec![SubscriptionRequest::NewPair])
//!         .await?;
//!     while let Some(message) = stream.next().await {
//!         println!("{message:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod constants;
pub mod error;
pub mod types;
pub mod ws;

/// Re-export the error type and Result alias.
pub use error::{BirdeyeError, Result};
/// Re-export the core protocol types at crate root for convenience.
pub use types::feed::{DecodeError, FeedMessage};
pub use types::subscribe::{ComplexQuery, SubscriptionRequest, TokenPredicate};
/// Re-export the client surface.
pub use ws::client::{CancelHandle, FeedStream, StreamingClient};
pub use ws::session::{CloseReason, SessionEvent, SessionState, StreamMessage};
