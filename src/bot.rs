use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use signal_correlator::config::SharedConfig;
use signal_correlator::correlation::CorrelationStore;
use signal_correlator::models::RawMessage;
use signal_correlator::persistence::RecordSink;
use signal_correlator::pipeline::{SignalOutcome, SignalPipeline};
use signal_correlator::source::MessageSource;

pub struct SignalBot {
    config: SharedConfig,
    source: Box<dyn MessageSource>,
    sink: Box<dyn RecordSink>,
    pipeline: SignalPipeline,
    last_snapshot: Instant,
}

impl SignalBot {
    pub async fn new(config: SharedConfig, source: Box<dyn MessageSource>, sink: Box<dyn RecordSink>) -> Self {
        let cfg = config.read().await;

        info!("{}", "=".repeat(60));
        info!("Signal correlator starting up");
        info!("Channel: {}", cfg.channel_id);
        info!("Trade key bucket: {}s", cfg.bucket_secs);
        info!("Snapshot interval: {}s", cfg.snapshot_interval);
        info!("{}", "=".repeat(60));

        let pipeline = SignalPipeline::new(Arc::new(CorrelationStore::new()), cfg.bucket_secs);
        drop(cfg);

        Self {
            config,
            source,
            sink,
            pipeline,
            last_snapshot: Instant::now(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Bot is now running. Press Ctrl+C to stop.");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    self.shutdown();
                    return Ok(());
                }
                msg = self.source.next_message() => {
                    match msg {
                        Ok(Some(raw)) => self.handle(raw).await,
                        Ok(None) => {
                            info!("Message source exhausted");
                            self.shutdown();
                            return Ok(());
                        }
                        Err(e) => error!("Transport error: {e:#}"),
                    }
                }
            }
        }
    }

    async fn handle(&mut self, raw: RawMessage) {
        // Rejections are logged inside the pipeline.
        if let SignalOutcome::Correlated { state, .. } = self.pipeline.process(&raw) {
            if state.is_terminal() {
                self.drain_closed();
            }
        }

        let interval = self.config.read().await.snapshot_interval;
        if self.last_snapshot.elapsed().as_secs() >= interval {
            self.log_snapshot();
            self.last_snapshot = Instant::now();
        }
    }

    /// Hand terminal records to the sink and free their keys.
    fn drain_closed(&mut self) {
        for record in self.pipeline.store().take_closed() {
            info!("Archiving trade {} [{}]", record.trade_id, record.state);
            if let Err(e) = self.sink.persist(&record) {
                error!("Failed to persist trade {}: {e:#}", record.trade_id);
            }
        }
    }

    fn log_snapshot(&self) {
        let snap = self.pipeline.store().snapshot();
        info!("Active trades: {}", snap.len());
        for (key, trade_id) in &snap {
            debug!("  {} -> {}", key, trade_id);
        }
    }

    fn shutdown(&mut self) {
        info!("Shutting down; persisting {} active trade(s)", self.pipeline.store().len());
        for record in self.pipeline.store().records() {
            if let Err(e) = self.sink.persist(&record) {
                error!("Failed to persist trade {}: {e:#}", record.trade_id);
            }
        }
    }
}
