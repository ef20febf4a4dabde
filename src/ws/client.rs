//! Streaming client façade.
//!
//! [`StreamingClient`] holds the connection configuration (API key, chain,
//! endpoint, session lifetime) and starts one session per
//! [`subscribe`](StreamingClient::subscribe) call. The returned
//! [`FeedStream`] yields [`StreamMessage`]s — decoded feed messages
//! interleaved with session lifecycle events — and can be cancelled from
//! any task via a [`CancelHandle`].
//!
//! # Example
//!
//! ```no_run
//! use birdeye_ws::{StreamingClient, SubscriptionRequest};
//! use birdeye_ws::ws::session::StreamMessage;
//! use futures_util::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> birdeye_ws::Result<()> {
//! let client = StreamingClient::builder("your-api-key").build();
//! let mut stream = client
//!     .subscribe(vec![SubscriptionRequest::price(
//!         "So11111111111111111111111111111111111111112",
//!     )])
//!     .await?;
//!
//! while let Some(message) = stream.next().await {
//!     match message {
//!         StreamMessage::Feed(feed) => println!("{feed:?}"),
//!         StreamMessage::Session(event) => println!("session: {event:?}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::http::header::{ORIGIN, SEC_WEBSOCKET_PROTOCOL};

use crate::constants::{
    DEFAULT_CHAIN, DEFAULT_CHANNEL_CAPACITY, SESSION_LIFETIME_SECS, WS_BASE_URL, WS_ORIGIN,
    WS_SUBPROTOCOL,
};
use crate::error::{BirdeyeError, Result};
use crate::types::subscribe::SubscriptionRequest;
use crate::ws::session::{self, SessionConfig, StreamMessage};

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a [`StreamingClient`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use birdeye_ws::StreamingClient;
///
/// let client = StreamingClient::builder("your-api-key")
///     .chain("ethereum")
///     .session_lifetime(Duration::from_secs(600))
///     .build();
/// ```
pub struct StreamingClientBuilder {
    api_key: String,
    chain: String,
    base_url: String,
    lifetime: Duration,
    capacity: usize,
}

impl StreamingClientBuilder {
    /// Set the target chain. Default: `"solana"`.
    pub fn chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = chain.into();
        self
    }

    /// Point at a custom endpoint base. Useful for testing against a local
    /// server. Default: the public feed endpoint.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the maximum session lifetime. Default: 1 hour.
    pub fn session_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Set the event channel capacity. Default: 1,024.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build the [`StreamingClient`].
    pub fn build(self) -> StreamingClient {
        StreamingClient {
            api_key: self.api_key,
            chain: self.chain,
            base_url: self.base_url,
            lifetime: self.lifetime,
            capacity: self.capacity,
        }
    }
}

// ---------------------------------------------------------------------------
// StreamingClient
// ---------------------------------------------------------------------------

/// Entry point for consuming the push feed.
///
/// Owns at most one active session per [`subscribe`](Self::subscribe) call;
/// a session never reconnects on its own — a dropped connection surfaces as
/// a terminal [`SessionEvent`](crate::ws::session::SessionEvent) and retry
/// policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct StreamingClient {
    api_key: String,
    chain: String,
    base_url: String,
    lifetime: Duration,
    capacity: usize,
}

impl StreamingClient {
    /// Create a builder with the given API key and all defaults.
    pub fn builder(api_key: impl Into<String>) -> StreamingClientBuilder {
        StreamingClientBuilder {
            api_key: api_key.into(),
            chain: DEFAULT_CHAIN.to_owned(),
            base_url: WS_BASE_URL.to_owned(),
            lifetime: Duration::from_secs(SESSION_LIFETIME_SECS),
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Create a client with the default chain, endpoint, and lifetime.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder(api_key).build()
    }

    /// The target chain.
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// Start one streaming session for the given subscriptions.
    ///
    /// Every request is validated and encoded before any network I/O; an
    /// unencodable request returns [`BirdeyeError::InvalidRequest`] without
    /// opening a connection. The connect attempt itself runs inside the
    /// session task — a connect failure arrives on the stream as a terminal
    /// [`SessionEvent::Failed`](crate::ws::session::SessionEvent::Failed).
    pub async fn subscribe(&self, requests: Vec<SubscriptionRequest>) -> Result<FeedStream> {
        let frames = requests
            .iter()
            .map(SubscriptionRequest::encode)
            .collect::<Result<Vec<_>>>()?;

        let url = self.session_url()?;
        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(BirdeyeError::Connect)?;
        let headers = request.headers_mut();
        headers.insert(SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_static(WS_SUBPROTOCOL));
        headers.insert(ORIGIN, HeaderValue::from_static(WS_ORIGIN));
        // Legacy draft-era header; the upstream server still expects it.
        headers.insert(
            HeaderName::from_static("sec-websocket-origin"),
            HeaderValue::from_static(WS_ORIGIN),
        );

        let (events_tx, events_rx) = mpsc::channel(self.capacity);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        tokio::spawn(session::run(
            SessionConfig {
                request,
                frames,
                lifetime: self.lifetime,
            },
            events_tx,
            cancel_rx,
        ));

        tracing::info!(
            chain = %self.chain,
            subscriptions = requests.len(),
            "feed session started"
        );

        Ok(FeedStream {
            events: events_rx,
            cancel: CancelHandle {
                flag: Arc::new(cancel_tx),
            },
        })
    }

    /// Build the connection URL. The API key travels as a query credential
    /// and is never logged.
    fn session_url(&self) -> Result<url::Url> {
        let raw = format!(
            "{}/{}?x-api-key={}",
            self.base_url.trim_end_matches('/'),
            self.chain,
            self.api_key
        );
        Ok(url::Url::parse(&raw)?)
    }
}

// ---------------------------------------------------------------------------
// FeedStream
// ---------------------------------------------------------------------------

/// Requests cancellation of a running session.
///
/// Cheap to clone and callable from any task. Idempotent: cancelling a
/// session that already reached a terminal state is a no-op.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Request `Open → Closing`. Returns immediately; the session finishes
    /// processing the in-flight frame before it stops.
    pub fn cancel(&self) {
        let _ = self.flag.send(true);
    }
}

/// The event sink for one session: decoded feed messages interleaved with
/// lifecycle events, in receive order.
///
/// Implements [`Stream`] with `Item = StreamMessage` for use with
/// `StreamExt::next()` and other combinators. The stream ends (yields
/// `None`) after the session's single terminal event.
#[derive(Debug)]
pub struct FeedStream {
    events: mpsc::Receiver<StreamMessage>,
    cancel: CancelHandle,
}

impl FeedStream {
    /// Receive the next message, or `None` once the session has ended.
    pub async fn recv(&mut self) -> Option<StreamMessage> {
        self.events.recv().await
    }

    /// Request cancellation of this session.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clonable handle for cancelling from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

impl Stream for FeedStream {
    type Item = StreamMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}
