use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use crate::correlation::CorrelationStore;
use crate::models::{Direction, MetadataUpdate, RawMessage, TradeEvent, TradeKey, TradeMetadata};
use crate::pipeline::SignalPipeline;

pub const TEST_BUCKET_SECS: i64 = 14400;

/// Fixed arrival time on a bucket boundary, so small offsets stay in-bucket.
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

pub fn message(text: &str) -> RawMessage {
    RawMessage::new(text, "test-channel", test_time())
}

pub fn message_at(text: &str, at: DateTime<Utc>) -> RawMessage {
    RawMessage::new(text, "test-channel", at)
}

pub fn test_pipeline() -> SignalPipeline {
    SignalPipeline::new(Arc::new(CorrelationStore::new()), TEST_BUCKET_SECS)
}

pub fn test_key(symbol: &str, direction: Direction) -> TradeKey {
    TradeKey::from_parts(symbol, direction, "14400")
}

pub fn seed_metadata() -> TradeMetadata {
    TradeMetadata {
        symbol: "BTCUSDT".to_string(),
        direction: Direction::Long,
        entry: None,
        targets: vec![43000.0, 44000.0],
        stop_loss: Some(41000.0),
        annotations: Vec::new(),
        targets_hit: 0,
        source_channel: "test-channel".to_string(),
        last_update: test_time(),
    }
}

pub fn update_with_event(event: Option<TradeEvent>) -> MetadataUpdate {
    MetadataUpdate {
        entry: None,
        targets: Vec::new(),
        stop_loss: None,
        annotation: None,
        event,
        observed_at: test_time(),
    }
}
