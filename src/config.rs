use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedConfig = Arc<RwLock<Config>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Correlation
    /// Trade key time-bucket width in seconds. Wider buckets raise the risk
    /// of correlating unrelated trades, narrower ones of splitting one trade
    /// across keys.
    pub bucket_secs: i64,

    // Transport
    pub channel_id: String,

    // Reporting / persistence
    pub snapshot_interval: u64,
    pub log_dir: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            bucket_secs: env("BUCKET_SECS", "14400").parse().unwrap_or(14400),
            channel_id: env("CHANNEL_ID", "stdin"),
            snapshot_interval: env("SNAPSHOT_INTERVAL", "60").parse().unwrap_or(60),
            log_dir: env("LOG_DIR", "logs"),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    pub fn records_file(&self) -> String {
        format!("{}/trade_records.jsonl", self.log_dir)
    }

    pub fn shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}
