//! Wire-format tests: subscription frame encoding and inbound frame
//! decoding. No network involved.

use birdeye_ws::types::feed::{DecodeError, FeedMessage};
use birdeye_ws::{BirdeyeError, ComplexQuery, SubscriptionRequest, TokenPredicate};
use chrono::{TimeZone, Utc};

const WSOL: &str = "So11111111111111111111111111111111111111112";
const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

// ===================================================================
// Encoding
// ===================================================================

#[test]
fn encode_price_simple_exact_frame() {
    let frame = SubscriptionRequest::price(WSOL).encode().unwrap();
    assert_eq!(
        frame,
        format!(
            "{{\"type\":\"SUBSCRIBE_PRICE\",\"data\":{{\"queryType\":\"simple\",\
             \"chartType\":\"1m\",\"address\":\"{WSOL}\",\"currency\":\"usd\"}}}}"
        )
    );
}

#[test]
fn encode_is_deterministic() {
    let requests = vec![
        SubscriptionRequest::NewPair,
        SubscriptionRequest::price(WSOL),
        SubscriptionRequest::price_pair(USDC),
        SubscriptionRequest::txs(WSOL),
        SubscriptionRequest::txs_pair(USDC),
        SubscriptionRequest::wallet_txs(WSOL),
        SubscriptionRequest::PriceMulti(ComplexQuery::from_addresses([WSOL, USDC])),
        SubscriptionRequest::TxsMulti(ComplexQuery::from_addresses([WSOL, USDC])),
        SubscriptionRequest::BaseQuotePrice {
            base_address: WSOL.into(),
            quote_address: USDC.into(),
            chart_type: "1m".into(),
        },
    ];
    for req in requests {
        assert_eq!(req.encode().unwrap(), req.encode().unwrap(), "{req:?}");
    }
}

#[test]
fn encode_new_pair_has_no_data_key() {
    let frame = SubscriptionRequest::NewPair.encode().unwrap();
    assert_eq!(frame, "{\"type\":\"SUBSCRIBE_NEW_PAIR\"}");
}

#[test]
fn encode_price_pair_uses_pair_currency() {
    let frame = SubscriptionRequest::price_pair(USDC).encode().unwrap();
    assert!(frame.contains("\"currency\":\"pair\""), "{frame}");
}

#[test]
fn encode_txs_simple_by_token_address() {
    let frame = SubscriptionRequest::txs(WSOL).encode().unwrap();
    assert_eq!(
        frame,
        format!(
            "{{\"type\":\"SUBSCRIBE_TXS\",\"data\":{{\"queryType\":\"simple\",\
             \"address\":\"{WSOL}\"}}}}"
        )
    );
}

#[test]
fn encode_txs_pair_uses_pair_address_field() {
    let frame = SubscriptionRequest::txs_pair(USDC).encode().unwrap();
    assert!(frame.contains("\"pairAddress\""), "{frame}");
    assert!(!frame.contains("\"address\""), "{frame}");
}

#[test]
fn encode_wallet_txs() {
    let frame = SubscriptionRequest::wallet_txs(WSOL).encode().unwrap();
    assert_eq!(
        frame,
        format!("{{\"type\":\"SUBSCRIBE_WALLET_TXS\",\"data\":{{\"address\":\"{WSOL}\"}}}}")
    );
}

#[test]
fn encode_base_quote_price() {
    let frame = SubscriptionRequest::BaseQuotePrice {
        base_address: WSOL.into(),
        quote_address: USDC.into(),
        chart_type: "1m".into(),
    }
    .encode()
    .unwrap();
    assert_eq!(
        frame,
        format!(
            "{{\"type\":\"SUBSCRIBE_BASE_QUOTE_PRICE\",\"data\":{{\
             \"baseAddress\":\"{WSOL}\",\"quoteAddress\":\"{USDC}\",\"chartType\":\"1m\"}}}}"
        )
    );
}

#[test]
fn encode_price_multi_renders_or_joined_predicates() {
    let query = ComplexQuery::new()
        .token(TokenPredicate::new(WSOL))
        .token(TokenPredicate::new(USDC).chart_type("5m").currency("usd"));
    let frame = SubscriptionRequest::PriceMulti(query).encode().unwrap();

    let expected_query = format!(
        "(address = {WSOL} AND chartType = 1m AND currency = usd) OR \
         (address = {USDC} AND chartType = 5m AND currency = usd)"
    );
    let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(parsed["type"], "SUBSCRIBE_PRICE");
    assert_eq!(parsed["data"]["queryType"], "complex");
    assert_eq!(parsed["data"]["query"], expected_query.as_str());
}

#[test]
fn encode_txs_multi_renders_address_only_predicates() {
    let query = ComplexQuery::from_addresses([WSOL, USDC]);
    let frame = SubscriptionRequest::TxsMulti(query).encode().unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(
        parsed["data"]["query"],
        format!("address = {WSOL} OR address = {USDC}").as_str()
    );
}

#[test]
fn encode_empty_complex_query_is_invalid() {
    for req in [
        SubscriptionRequest::PriceMulti(ComplexQuery::new()),
        SubscriptionRequest::TxsMulti(ComplexQuery::new()),
    ] {
        match req.encode() {
            Err(BirdeyeError::InvalidRequest(msg)) => {
                assert!(msg.contains("at least one token"), "{msg}");
            }
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }
}

#[test]
fn encode_empty_address_is_invalid() {
    for req in [
        SubscriptionRequest::price(""),
        SubscriptionRequest::txs(""),
        SubscriptionRequest::txs_pair(""),
        SubscriptionRequest::wallet_txs(""),
        SubscriptionRequest::BaseQuotePrice {
            base_address: WSOL.into(),
            quote_address: String::new(),
            chart_type: "1m".into(),
        },
        SubscriptionRequest::PriceMulti(ComplexQuery::from_addresses([""])),
    ] {
        assert!(
            matches!(req.encode(), Err(BirdeyeError::InvalidRequest(_))),
            "{req:?} should be rejected"
        );
    }
}

// ===================================================================
// Decoding
// ===================================================================

#[test]
fn decode_welcome_carries_no_payload() {
    let message = FeedMessage::decode("{\"type\":\"WELCOME\"}").unwrap();
    assert!(matches!(message, FeedMessage::Welcome));
}

#[test]
fn decode_price_data_fixture() {
    let raw = "{\"type\":\"PRICE_DATA\",\"data\":{\"o\":1.0,\"h\":1.2,\"l\":0.9,\
               \"c\":1.1,\"v\":500,\"symbol\":\"SOL\",\"unixTime\":1700000000}}";
    let message = FeedMessage::decode(raw).unwrap();
    let update = match message {
        FeedMessage::Price(update) => update,
        other => panic!("expected Price, got {other:?}"),
    };
    assert_eq!(update.o, 1.0);
    assert_eq!(update.h, 1.2);
    assert_eq!(update.l, 0.9);
    assert_eq!(update.c, 1.1);
    assert_eq!(update.v, 500.0);
    assert_eq!(update.symbol.as_deref(), Some("SOL"));
    assert_eq!(
        update.timestamp(),
        Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
    );
}

#[test]
fn decode_base_quote_price_data() {
    let raw = format!(
        "{{\"type\":\"BASE_QUOTE_PRICE_DATA\",\"data\":{{\"o\":2.0,\"h\":2.5,\
         \"l\":1.5,\"c\":2.2,\"v\":10,\"baseAddress\":\"{WSOL}\",\
         \"quoteAddress\":\"{USDC}\",\"unixTime\":1700000000}}}}"
    );
    let message = FeedMessage::decode(&raw).unwrap();
    match message {
        FeedMessage::BaseQuotePrice(update) => {
            assert_eq!(update.base_address.as_deref(), Some(WSOL));
            assert_eq!(update.quote_address.as_deref(), Some(USDC));
            assert_eq!(update.c, 2.2);
        }
        other => panic!("expected BaseQuotePrice, got {other:?}"),
    }
}

#[test]
fn decode_txs_data_with_partial_fields() {
    let raw = "{\"type\":\"TXS_DATA\",\"data\":{\"txHash\":\"abc123\",\
               \"blockUnixTime\":1700000000,\"base\":{\"address\":\"AAA\",\"uiAmount\":1.5}}}";
    let message = FeedMessage::decode(raw).unwrap();
    match message {
        FeedMessage::Txs(update) => {
            assert_eq!(update.tx_hash.as_deref(), Some("abc123"));
            assert!(update.owner.is_none());
            assert_eq!(update.base.as_ref().unwrap().ui_amount, Some(1.5));
            assert!(update.timestamp().is_some());
        }
        other => panic!("expected Txs, got {other:?}"),
    }
}

#[test]
fn decode_wallet_txs_data() {
    let raw = "{\"type\":\"WALLET_TXS_DATA\",\"data\":{\"type\":\"swap\",\
               \"txHash\":\"def456\",\"owner\":\"WALLET\",\"volumeUSD\":123.45,\
               \"network\":\"solana\",\"quote\":{\"address\":\"QQQ\",\"uiAmount\":2.0}}}";
    let message = FeedMessage::decode(raw).unwrap();
    match message {
        FeedMessage::WalletTxs(update) => {
            assert_eq!(update.kind.as_deref(), Some("swap"));
            assert_eq!(update.owner.as_deref(), Some("WALLET"));
            assert_eq!(update.volume_usd, Some(123.45));
            assert_eq!(update.quote.unwrap().address.as_deref(), Some("QQQ"));
        }
        other => panic!("expected WalletTxs, got {other:?}"),
    }
}

#[test]
fn decode_new_pair_data() {
    let raw = "{\"type\":\"NEW_PAIR_DATA\",\"data\":{\"address\":\"PAIR\",\
               \"name\":\"AAA-BBB\",\"source\":\"raydium\"}}";
    let message = FeedMessage::decode(raw).unwrap();
    match message {
        FeedMessage::NewPair(pair) => {
            assert_eq!(pair.address.as_deref(), Some("PAIR"));
            assert_eq!(pair.source.as_deref(), Some("raydium"));
        }
        other => panic!("expected NewPair, got {other:?}"),
    }
}

#[test]
fn decode_server_error_frame() {
    let raw = "{\"type\":\"ERROR\",\"data\":{\"message\":\"bad subscription\"}}";
    let message = FeedMessage::decode(raw).unwrap();
    match message {
        FeedMessage::ServerError(data) => {
            assert_eq!(data["message"], "bad subscription");
        }
        other => panic!("expected ServerError, got {other:?}"),
    }
}

#[test]
fn decode_unknown_type_passes_through() {
    let raw = "{\"type\":\"SOMETHING_NEW\",\"data\":{\"x\":1}}";
    let message = FeedMessage::decode(raw).unwrap();
    match message {
        FeedMessage::Unknown { raw_type, data } => {
            assert_eq!(raw_type, "SOMETHING_NEW");
            assert_eq!(data.unwrap()["x"], 1);
        }
        other => panic!("expected Unknown, got {other:?}"),
    }
}

#[test]
fn decode_non_json_is_malformed() {
    match FeedMessage::decode("not json at all") {
        Err(DecodeError::MalformedJson(_)) => {}
        other => panic!("expected MalformedJson, got {other:?}"),
    }
}

#[test]
fn decode_json_without_type_is_unrecognized() {
    match FeedMessage::decode("{\"data\":{}}") {
        Err(DecodeError::UnrecognizedShape(msg)) => assert!(msg.contains("type"), "{msg}"),
        other => panic!("expected UnrecognizedShape, got {other:?}"),
    }
}

#[test]
fn decode_price_data_without_payload_is_unrecognized() {
    match FeedMessage::decode("{\"type\":\"PRICE_DATA\"}") {
        Err(DecodeError::UnrecognizedShape(_)) => {}
        other => panic!("expected UnrecognizedShape, got {other:?}"),
    }
}

#[test]
fn decode_txs_data_without_payload_is_empty_update() {
    // All transaction sub-fields are optional; an absent payload decodes.
    let message = FeedMessage::decode("{\"type\":\"TXS_DATA\"}").unwrap();
    match message {
        FeedMessage::Txs(update) => assert!(update.tx_hash.is_none()),
        other => panic!("expected Txs, got {other:?}"),
    }
}
