use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{LifecycleState, MetadataUpdate, TradeEvent, TradeKey, TradeMetadata, TradeRecord};

/// In-memory key → trade record map. One coarse mutex guards the whole map;
/// every operation is O(1) and never holds the lock across I/O or an await
/// point. Owned and injectable, so independent stores can coexist in tests.
#[derive(Default)]
pub struct CorrelationStore {
    inner: Mutex<HashMap<TradeKey, TradeRecord>>,
}

impl CorrelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomic get-or-create. The first caller for a key wins and its
    /// candidate id becomes the trade identifier; every later (or concurrent)
    /// caller gets that same identifier back and its candidate is discarded.
    pub fn get_or_assign(
        &self,
        key: &TradeKey,
        candidate_id: &str,
        seed: TradeMetadata,
        at: DateTime<Utc>,
    ) -> String {
        let mut map = self.inner.lock().expect("correlation store poisoned");
        if let Some(record) = map.get(key) {
            return record.trade_id.clone();
        }
        info!("new trade {} for key {}", candidate_id, key);
        let record = TradeRecord::new(candidate_id.to_string(), key.clone(), seed, at);
        map.insert(key.clone(), record);
        candidate_id.to_string()
    }

    /// Non-creating read.
    pub fn lookup(&self, key: &TradeKey) -> Option<String> {
        let map = self.inner.lock().expect("correlation store poisoned");
        map.get(key).map(|r| r.trade_id.clone())
    }

    /// Merge refinements into the record and advance its lifecycle per the
    /// update's event cue. Terminal records reject all updates unchanged.
    pub fn update_metadata(&self, key: &TradeKey, update: MetadataUpdate) -> Result<TradeRecord, StoreError> {
        let mut map = self.inner.lock().expect("correlation store poisoned");
        let record = map
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if record.state.is_terminal() {
            return Err(StoreError::AlreadyClosed(key.to_string()));
        }

        if let Some(event) = update.event {
            let next = apply_event(record.state, event);
            if next != record.state {
                debug!("trade {} {} -> {}", record.trade_id, record.state, next);
                record.state = next;
            }
        }
        record.metadata.merge(&update);
        Ok(record.clone())
    }

    /// Remove the record entirely. Irrevocable: a later `get_or_assign` for
    /// the same key starts a brand-new identity.
    pub fn clear(&self, key: &TradeKey) -> Option<TradeRecord> {
        let mut map = self.inner.lock().expect("correlation store poisoned");
        map.remove(key)
    }

    /// Point-in-time copy of all active trades. Stale the moment it returns.
    pub fn snapshot(&self) -> HashMap<TradeKey, String> {
        let map = self.inner.lock().expect("correlation store poisoned");
        map.iter().map(|(k, r)| (k.clone(), r.trade_id.clone())).collect()
    }

    /// Full record snapshots for the persistence collaborator.
    pub fn records(&self) -> Vec<TradeRecord> {
        let map = self.inner.lock().expect("correlation store poisoned");
        map.values().cloned().collect()
    }

    /// Drain all terminal records. This is the downstream-acknowledged clear:
    /// the caller persists what it receives, and the keys become free.
    pub fn take_closed(&self) -> Vec<TradeRecord> {
        let mut map = self.inner.lock().expect("correlation store poisoned");
        let keys: Vec<TradeKey> = map
            .iter()
            .filter(|(_, r)| r.state.is_terminal())
            .map(|(k, _)| k.clone())
            .collect();
        keys.iter().filter_map(|k| map.remove(k)).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("correlation store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lifecycle transitions, driven by message cues. Terminal states never
/// appear here — `update_metadata` rejects them first. A stop after partial
/// take-profits closes the remainder rather than counting as a stop-out.
fn apply_event(current: LifecycleState, event: TradeEvent) -> LifecycleState {
    match event {
        TradeEvent::PositionOpened => match current {
            LifecycleState::SignalReceived => LifecycleState::PositionOpened,
            other => other,
        },
        TradeEvent::TargetReached => LifecycleState::TargetHit,
        TradeEvent::StopTriggered => match current {
            LifecycleState::TargetHit => LifecycleState::PositionClosed,
            _ => LifecycleState::Stopped,
        },
        TradeEvent::PositionClosed => LifecycleState::PositionClosed,
    }
}
