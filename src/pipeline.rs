use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::correlation::{derive_key, external_key, CorrelationStore};
use crate::error::{RejectReason, StoreError};
use crate::models::{LifecycleState, MetadataUpdate, RawMessage, TradeMetadata};
use crate::parsing::parse_signal;

/// What processing one message produced.
#[derive(Debug, Clone)]
pub enum SignalOutcome {
    Rejected {
        reason: RejectReason,
    },
    Correlated {
        trade_id: String,
        state: LifecycleState,
        metadata: TradeMetadata,
    },
}

/// Raw text → parse → key derivation → correlation. Parsing and key
/// derivation are pure, so any number of workers may call `process`
/// concurrently; the store is the only shared state.
pub struct SignalPipeline {
    store: Arc<CorrelationStore>,
    bucket_secs: i64,
    candidate_seq: AtomicU64,
}

impl SignalPipeline {
    pub fn new(store: Arc<CorrelationStore>, bucket_secs: i64) -> Self {
        Self {
            store,
            bucket_secs,
            candidate_seq: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &CorrelationStore {
        &self.store
    }

    pub fn process(&self, raw: &RawMessage) -> SignalOutcome {
        let signal = match parse_signal(&raw.text) {
            Ok(signal) => signal,
            Err(reason) => {
                warn!("rejected message from {}: {}", raw.channel_id, reason);
                return SignalOutcome::Rejected { reason };
            }
        };

        let key = match &raw.reply_to {
            Some(reference) => external_key(&signal.symbol, signal.direction, reference),
            None => derive_key(&signal.symbol, signal.direction, raw.arrival_time, self.bucket_secs),
        };

        // A pure status message refines an existing trade; it never starts
        // one. Without a record to refine it is a correlation miss.
        if signal.is_status_only() && self.store.lookup(&key).is_none() {
            warn!("status message for unknown trade key {}", key);
            return SignalOutcome::Rejected {
                reason: RejectReason::TradeNotFound,
            };
        }

        let seed = TradeMetadata::from_signal(&signal, &raw.channel_id, raw.arrival_time);
        let candidate = self.next_candidate_id(&signal.symbol);
        let trade_id = self.store.get_or_assign(&key, &candidate, seed, raw.arrival_time);

        match self
            .store
            .update_metadata(&key, MetadataUpdate::from_signal(&signal, raw.arrival_time))
        {
            Ok(record) => {
                info!(
                    "correlated {} {} -> trade {} [{}] ({})",
                    signal.symbol, signal.direction, trade_id, record.state, signal.source_format
                );
                SignalOutcome::Correlated {
                    trade_id: record.trade_id,
                    state: record.state,
                    metadata: record.metadata,
                }
            }
            Err(StoreError::AlreadyClosed(_)) => {
                warn!("trade already closed for key {}", key);
                SignalOutcome::Rejected {
                    reason: RejectReason::TradeAlreadyClosed,
                }
            }
            // The record was cleared between assignment and update.
            Err(StoreError::NotFound(_)) => SignalOutcome::Rejected {
                reason: RejectReason::TradeNotFound,
            },
        }
    }

    fn next_candidate_id(&self, symbol: &str) -> String {
        let seq = self.candidate_seq.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", symbol, seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{message, message_at, test_pipeline};
    use chrono::Duration;

    fn correlated(outcome: SignalOutcome) -> (String, LifecycleState, TradeMetadata) {
        match outcome {
            SignalOutcome::Correlated {
                trade_id,
                state,
                metadata,
            } => (trade_id, state, metadata),
            SignalOutcome::Rejected { reason } => panic!("expected correlation, got {}", reason),
        }
    }

    #[test]
    fn no_symbol_creates_no_record() {
        let pipeline = test_pipeline();
        let outcome = pipeline.process(&message("LONG now! Entry 100"));
        assert!(matches!(
            outcome,
            SignalOutcome::Rejected {
                reason: RejectReason::NoSymbol
            }
        ));
        assert!(pipeline.store().is_empty());
    }

    #[test]
    fn follow_up_in_same_bucket_resolves_to_same_trade() {
        let pipeline = test_pipeline();
        let first = message("#BTCUSDT LONG Entry 42000 Targets 43000 44000 SL 41000");
        let (id_a, state_a, _) = correlated(pipeline.process(&first));
        assert_eq!(state_a, LifecycleState::SignalReceived);

        let follow_up = message_at(
            "#BTCUSDT LONG entry filled",
            first.arrival_time + Duration::minutes(5),
        );
        let (id_b, state_b, _) = correlated(pipeline.process(&follow_up));
        assert_eq!(id_a, id_b);
        assert_eq!(state_b, LifecycleState::PositionOpened);
        assert_eq!(pipeline.store().len(), 1);
    }

    #[test]
    fn different_bucket_starts_a_new_trade() {
        let pipeline = test_pipeline();
        let first = message("#BTCUSDT LONG Entry 42000");
        let (id_a, _, _) = correlated(pipeline.process(&first));

        let much_later = message_at("#BTCUSDT LONG Entry 47000", first.arrival_time + Duration::days(2));
        let (id_b, _, _) = correlated(pipeline.process(&much_later));
        assert_ne!(id_a, id_b);
        assert_eq!(pipeline.store().len(), 2);
    }

    #[test]
    fn reply_to_reference_overrides_bucketing() {
        let pipeline = test_pipeline();
        let first = message("#BTCUSDT LONG Entry 42000").with_reply_to("thread-9");
        let (id_a, _, _) = correlated(pipeline.process(&first));

        let much_later = message_at("#BTCUSDT LONG target 1 hit ✅", first.arrival_time + Duration::days(2))
            .with_reply_to("thread-9");
        let (id_b, state, metadata) = correlated(pipeline.process(&much_later));
        assert_eq!(id_a, id_b);
        assert_eq!(state, LifecycleState::TargetHit);
        assert_eq!(metadata.targets_hit, 1);
    }

    #[test]
    fn later_message_refines_metadata() {
        let pipeline = test_pipeline();
        let first = message("#BTCUSDT LONG Entry 42000 Targets 43000 44000");
        let (_, _, metadata) = correlated(pipeline.process(&first));
        assert!(metadata.stop_loss.is_none());

        let revision = message_at("#BTCUSDT LONG SL 41000", first.arrival_time + Duration::minutes(1));
        let (_, _, metadata) = correlated(pipeline.process(&revision));
        assert_eq!(metadata.stop_loss, Some(41000.0));
        assert_eq!(metadata.targets, vec![43000.0, 44000.0]);
    }

    #[test]
    fn closed_trade_rejects_further_messages() {
        let pipeline = test_pipeline();
        let first = message("#BTCUSDT LONG Entry 42000");
        let (_, _, _) = correlated(pipeline.process(&first));

        let stop = message_at("#BTCUSDT LONG stopped out", first.arrival_time + Duration::minutes(10));
        let (_, state, _) = correlated(pipeline.process(&stop));
        assert_eq!(state, LifecycleState::Stopped);

        let stray = message_at("#BTCUSDT LONG Entry 42100", first.arrival_time + Duration::minutes(20));
        assert!(matches!(
            pipeline.process(&stray),
            SignalOutcome::Rejected {
                reason: RejectReason::TradeAlreadyClosed
            }
        ));
    }

    #[test]
    fn status_for_unknown_trade_is_a_correlation_miss() {
        let pipeline = test_pipeline();
        let stray = message("#BTCUSDT LONG target 1 hit ✅");
        assert!(matches!(
            pipeline.process(&stray),
            SignalOutcome::Rejected {
                reason: RejectReason::TradeNotFound
            }
        ));
        assert!(pipeline.store().is_empty());
    }

    #[test]
    fn event_fires_target_counter() {
        let pipeline = test_pipeline();
        let first = message("#BTCUSDT LONG Entry 42000 Targets 43000 44000");
        correlated(pipeline.process(&first));

        let hit_one = message_at("#BTCUSDT LONG Target 1 hit ✅", first.arrival_time + Duration::minutes(30));
        let (_, state, metadata) = correlated(pipeline.process(&hit_one));
        assert_eq!(state, LifecycleState::TargetHit);
        assert_eq!(metadata.targets_hit, 1);

        let hit_two = message_at("#BTCUSDT LONG Target 2 hit ✅", first.arrival_time + Duration::minutes(60));
        let (_, state, metadata) = correlated(pipeline.process(&hit_two));
        assert_eq!(state, LifecycleState::TargetHit);
        assert_eq!(metadata.targets_hit, 2);
        // Fill reports never rewrite the target plan.
        assert_eq!(metadata.targets, vec![43000.0, 44000.0]);
        assert_eq!(metadata.last_update, hit_two.arrival_time);
    }
}
