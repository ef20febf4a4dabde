//! Inbound feed messages and the frame decoder.
//!
//! Every inbound text frame is UTF-8 JSON with a string `type`
//! discriminator. [`FeedMessage::decode`] maps known discriminators to typed
//! payloads and passes unrecognized ones through as
//! [`FeedMessage::Unknown`], since the upstream protocol may add message
//! kinds. Only structurally impossible frames produce a [`DecodeError`] —
//! and the session logs and drops those rather than terminating.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Why a single inbound frame could not be interpreted.
///
/// Decode errors never abort a session; the feed is allowed to be noisy.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The frame was not valid JSON.
    #[error("malformed JSON frame: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// The frame was JSON but did not fit any known shape, e.g. it lacked a
    /// string `type` field or a known kind's payload was structurally wrong.
    #[error("unrecognized frame shape: {0}")]
    UnrecognizedShape(String),
}

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// One OHLCV candle update from `PRICE_DATA`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    /// Open price.
    pub o: f64,
    /// High price.
    pub h: f64,
    /// Low price.
    pub l: f64,
    /// Close price.
    pub c: f64,
    /// Volume over the candle interval.
    pub v: f64,
    /// Token symbol, when the server includes it.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Token address, when the server includes it.
    #[serde(default)]
    pub address: Option<String>,
    /// Candle time as whole seconds since the Unix epoch.
    pub unix_time: i64,
}

impl PriceUpdate {
    /// The candle time as an absolute instant. `None` only for timestamps
    /// outside chrono's representable range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.unix_time, 0)
    }
}

/// One candle update from `BASE_QUOTE_PRICE_DATA`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseQuotePriceUpdate {
    /// Open price.
    pub o: f64,
    /// High price.
    pub h: f64,
    /// Low price.
    pub l: f64,
    /// Close price.
    pub c: f64,
    /// Volume over the candle interval.
    pub v: f64,
    /// Base token address.
    #[serde(default)]
    pub base_address: Option<String>,
    /// Quote token address.
    #[serde(default)]
    pub quote_address: Option<String>,
    /// Candle time as whole seconds since the Unix epoch.
    pub unix_time: i64,
}

impl BaseQuotePriceUpdate {
    /// The candle time as an absolute instant.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.unix_time, 0)
    }
}

/// One leg (base or quote token) of a transaction payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    /// Token address.
    #[serde(default)]
    pub address: Option<String>,
    /// Token symbol.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Human-scaled amount.
    #[serde(default)]
    pub ui_amount: Option<f64>,
}

/// A token or pair transaction from `TXS_DATA`.
///
/// Every sub-field is optional; the server varies the payload by
/// transaction kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxUpdate {
    /// Transaction hash.
    #[serde(default)]
    pub tx_hash: Option<String>,
    /// Wallet that signed the transaction.
    #[serde(default)]
    pub owner: Option<String>,
    /// Trade side, e.g. `"buy"` or `"sell"`.
    #[serde(default)]
    pub side: Option<String>,
    /// Venue the transaction was routed through.
    #[serde(default)]
    pub source: Option<String>,
    /// Block time as whole seconds since the Unix epoch.
    #[serde(default)]
    pub block_unix_time: Option<i64>,
    /// Trade volume in USD.
    #[serde(default, rename = "volumeUSD")]
    pub volume_usd: Option<f64>,
    /// Base token leg.
    #[serde(default)]
    pub base: Option<TokenAmount>,
    /// Quote token leg.
    #[serde(default)]
    pub quote: Option<TokenAmount>,
}

impl TxUpdate {
    /// Block time as an absolute instant, when present.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.block_unix_time?, 0)
    }
}

/// A wallet activity update from `WALLET_TXS_DATA`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTxUpdate {
    /// Activity kind as reported by the server.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Transaction hash.
    #[serde(default)]
    pub tx_hash: Option<String>,
    /// Wallet address the subscription matched.
    #[serde(default)]
    pub owner: Option<String>,
    /// Venue the transaction was routed through.
    #[serde(default)]
    pub source: Option<String>,
    /// Block time as whole seconds since the Unix epoch.
    #[serde(default)]
    pub block_unix_time: Option<i64>,
    /// Trade volume in USD.
    #[serde(default, rename = "volumeUSD")]
    pub volume_usd: Option<f64>,
    /// Network the transaction landed on.
    #[serde(default)]
    pub network: Option<String>,
    /// Base token leg.
    #[serde(default)]
    pub base: Option<TokenAmount>,
    /// Quote token leg.
    #[serde(default)]
    pub quote: Option<TokenAmount>,
}

impl WalletTxUpdate {
    /// Block time as an absolute instant, when present.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.block_unix_time?, 0)
    }
}

/// A newly listed pair from `NEW_PAIR_DATA`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPairData {
    /// Pair (market) address.
    #[serde(default)]
    pub address: Option<String>,
    /// Pair display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Pair symbol.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Venue the pair was listed on.
    #[serde(default)]
    pub source: Option<String>,
    /// Base token leg.
    #[serde(default)]
    pub base: Option<TokenAmount>,
    /// Quote token leg.
    #[serde(default)]
    pub quote: Option<TokenAmount>,
}

// ---------------------------------------------------------------------------
// FeedMessage
// ---------------------------------------------------------------------------

/// A decoded, typed server push, discriminated by message kind.
#[derive(Debug, Clone)]
pub enum FeedMessage {
    /// Greeting sent once after connecting. Carries no payload.
    Welcome,
    /// A newly listed pair.
    NewPair(NewPairData),
    /// An OHLCV candle update.
    Price(PriceUpdate),
    /// An OHLCV candle update for an explicit base/quote pairing.
    BaseQuotePrice(BaseQuotePriceUpdate),
    /// A token or pair transaction.
    Txs(TxUpdate),
    /// A wallet activity update.
    WalletTxs(WalletTxUpdate),
    /// A server-reported error frame. The payload shape is not documented,
    /// so it is surfaced raw.
    ServerError(Value),
    /// A frame with an unrecognized `type` discriminator.
    Unknown {
        /// The verbatim `type` string from the frame.
        raw_type: String,
        /// The frame's `data` payload, if any.
        data: Option<Value>,
    },
}

impl FeedMessage {
    /// Decode one raw text frame.
    ///
    /// Unknown `type` values succeed as [`FeedMessage::Unknown`]; only
    /// non-JSON input or structurally impossible frames return an error.
    /// Missing optional sub-fields never fail (the `WELCOME` frame carries
    /// no `data` at all).
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(raw).map_err(DecodeError::MalformedJson)?;

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DecodeError::UnrecognizedShape("frame has no string `type` field".to_owned())
            })?
            .to_owned();

        let data = value.get("data").cloned();

        let message = match kind.as_str() {
            "WELCOME" => Self::Welcome,
            "NEW_PAIR_DATA" => Self::NewPair(payload_or_default(&kind, data)?),
            "PRICE_DATA" => Self::Price(payload(&kind, data)?),
            "BASE_QUOTE_PRICE_DATA" => Self::BaseQuotePrice(payload(&kind, data)?),
            "TXS_DATA" => Self::Txs(payload_or_default(&kind, data)?),
            "WALLET_TXS_DATA" => Self::WalletTxs(payload_or_default(&kind, data)?),
            "ERROR" => Self::ServerError(data.unwrap_or(Value::Null)),
            _ => Self::Unknown {
                raw_type: kind,
                data,
            },
        };

        Ok(message)
    }

    /// The message kind as a wire-format `type` string, for logging.
    pub fn kind(&self) -> &str {
        match self {
            Self::Welcome => "WELCOME",
            Self::NewPair(_) => "NEW_PAIR_DATA",
            Self::Price(_) => "PRICE_DATA",
            Self::BaseQuotePrice(_) => "BASE_QUOTE_PRICE_DATA",
            Self::Txs(_) => "TXS_DATA",
            Self::WalletTxs(_) => "WALLET_TXS_DATA",
            Self::ServerError(_) => "ERROR",
            Self::Unknown { raw_type, .. } => raw_type,
        }
    }
}

/// Deserialize a known kind's `data` payload. Candle kinds carry required
/// numeric fields, so an absent payload is an unrecognized shape.
fn payload<T>(kind: &str, data: Option<Value>) -> Result<T, DecodeError>
where
    T: serde::de::DeserializeOwned,
{
    let value = data.ok_or_else(|| {
        DecodeError::UnrecognizedShape(format!("{kind} frame has no `data` payload"))
    })?;
    serde_json::from_value(value)
        .map_err(|e| DecodeError::UnrecognizedShape(format!("{kind} payload: {e}")))
}

/// Like [`payload`], but for kinds whose fields are all optional: an absent
/// or `null` payload decodes to the empty payload.
fn payload_or_default<T>(kind: &str, data: Option<Value>) -> Result<T, DecodeError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match data {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| DecodeError::UnrecognizedShape(format!("{kind} payload: {e}"))),
    }
}
