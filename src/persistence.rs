use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::models::TradeRecord;

/// The durable-storage seam. The core holds no durable state itself; record
/// snapshots flow out through this trait.
pub trait RecordSink: Send + Sync {
    fn persist(&mut self, record: &TradeRecord) -> Result<()>;
}

/// Appends one JSON object per record to a file under the log directory.
pub struct JsonlSink {
    path: String,
}

impl JsonlSink {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonlSink {
    fn persist(&mut self, record: &TradeRecord) -> Result<()> {
        if let Some(parent) = Path::new(&self.path).parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
