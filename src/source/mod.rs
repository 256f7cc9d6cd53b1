use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::models::RawMessage;

/// The message transport seam. Real deployments plug a chat client in here;
/// tests plug in canned sources.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Next message, or `None` when the source is exhausted.
    async fn next_message(&mut self) -> Result<Option<RawMessage>>;
}

/// Line-oriented stdin transport: one alert per line, stamped on arrival.
pub struct StdinSource {
    channel_id: String,
    lines: Lines<BufReader<Stdin>>,
}

impl StdinSource {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl MessageSource for StdinSource {
    async fn next_message(&mut self) -> Result<Option<RawMessage>> {
        match self.lines.next_line().await? {
            Some(line) => Ok(Some(RawMessage::new(line, self.channel_id.clone(), Utc::now()))),
            None => Ok(None),
        }
    }
}
