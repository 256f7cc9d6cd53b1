use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Direction, EntryZone, LifecycleState, StructuredSignal, TradeEvent};

/// Correlation key. Two signals with equal keys are the same logical trade.
/// String format: `"{symbol}:{direction}:{bucket_or_external_id}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeKey(String);

impl TradeKey {
    pub fn from_parts(symbol: &str, direction: Direction, discriminant: &str) -> Self {
        Self(format!("{}:{}:{}", symbol, direction, discriminant))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable per-trade fields, refined as correlated messages arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeMetadata {
    pub symbol: String,
    pub direction: Direction,
    pub entry: Option<EntryZone>,
    #[serde(default)]
    pub targets: Vec<f64>,
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub targets_hit: usize,
    pub source_channel: String,
    pub last_update: DateTime<Utc>,
}

impl TradeMetadata {
    pub fn from_signal(signal: &StructuredSignal, channel_id: &str, at: DateTime<Utc>) -> Self {
        Self {
            symbol: signal.symbol.clone(),
            direction: signal.direction,
            entry: signal.entry,
            targets: signal.targets.clone(),
            stop_loss: signal.stop_loss,
            annotations: signal.annotation.iter().cloned().collect(),
            targets_hit: 0,
            source_channel: channel_id.to_string(),
            last_update: at,
        }
    }

    /// Merge refinements from a later correlated message. Absent fields leave
    /// the existing values untouched.
    pub fn merge(&mut self, update: &MetadataUpdate) {
        if update.entry.is_some() {
            self.entry = update.entry;
        }
        if !update.targets.is_empty() {
            self.targets = update.targets.clone();
        }
        if update.stop_loss.is_some() {
            self.stop_loss = update.stop_loss;
        }
        if let Some(note) = &update.annotation {
            self.annotations.push(note.clone());
        }
        if update.event == Some(TradeEvent::TargetReached) {
            self.targets_hit += 1;
        }
        self.last_update = update.observed_at;
    }
}

/// Field refinements extracted from one correlated message.
#[derive(Debug, Clone)]
pub struct MetadataUpdate {
    pub entry: Option<EntryZone>,
    pub targets: Vec<f64>,
    pub stop_loss: Option<f64>,
    pub annotation: Option<String>,
    pub event: Option<TradeEvent>,
    pub observed_at: DateTime<Utc>,
}

impl MetadataUpdate {
    pub fn from_signal(signal: &StructuredSignal, observed_at: DateTime<Utc>) -> Self {
        Self {
            entry: signal.entry,
            targets: signal.targets.clone(),
            stop_loss: signal.stop_loss,
            annotation: signal.annotation.clone(),
            event: signal.event,
            observed_at,
        }
    }
}

/// A correlated trade. The identifier is assigned exactly once per key and
/// never changes for the record's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: String,
    pub key: TradeKey,
    pub metadata: TradeMetadata,
    pub state: LifecycleState,
    pub created_at: DateTime<Utc>,
}

impl TradeRecord {
    pub fn new(trade_id: String, key: TradeKey, metadata: TradeMetadata, created_at: DateTime<Utc>) -> Self {
        Self {
            trade_id,
            key,
            metadata,
            state: LifecycleState::SignalReceived,
            created_at,
        }
    }
}
