use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Direction;

/// One alert message as handed over by the transport.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub text: String,
    pub channel_id: String,
    pub arrival_time: DateTime<Utc>,
    /// Out-of-band correlation reference (reply-to / thread id). When set it
    /// replaces time-bucket key derivation.
    pub reply_to: Option<String>,
}

impl RawMessage {
    pub fn new(text: impl Into<String>, channel_id: impl Into<String>, arrival_time: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            channel_id: channel_id.into(),
            arrival_time,
            reply_to: None,
        }
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

/// Entry price or price range. A single entry price is stored with
/// `low == high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryZone {
    pub low: f64,
    pub high: f64,
}

impl EntryZone {
    pub fn single(price: f64) -> Self {
        Self { low: price, high: price }
    }

    pub fn range(a: f64, b: f64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn is_single(&self) -> bool {
        self.low == self.high
    }
}

/// Lifecycle cue carried by a follow-up message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeEvent {
    PositionOpened,
    TargetReached,
    StopTriggered,
    PositionClosed,
}

/// A parsed alert. Built once per accepted message and never mutated — a
/// later message that revises fields becomes a new signal correlated to the
/// same trade key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSignal {
    /// Normalized uppercase ticker, e.g. `BTCUSDT`.
    pub symbol: String,
    pub direction: Direction,
    pub entry: Option<EntryZone>,
    /// Target prices in appearance order. Not re-sorted.
    #[serde(default)]
    pub targets: Vec<f64>,
    pub stop_loss: Option<f64>,
    /// Free-text risk / leverage / timeframe note, verbatim.
    pub annotation: Option<String>,
    pub event: Option<TradeEvent>,
    /// Which notation/cue template matched, e.g. `slash-pair/word`.
    pub source_format: String,
}

impl StructuredSignal {
    /// True when the message carries only a lifecycle cue and no plan fields.
    /// Such messages refine an existing trade; they never start one.
    pub fn is_status_only(&self) -> bool {
        self.event.is_some() && self.entry.is_none() && self.targets.is_empty() && self.stop_loss.is_none()
    }
}
