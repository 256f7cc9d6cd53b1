mod bot;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use signal_correlator::config::Config;
use signal_correlator::persistence::JsonlSink;
use signal_correlator::source::StdinSource;

use crate::bot::SignalBot;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let source = Box::new(StdinSource::new(cfg.channel_id.clone()));
    let sink = Box::new(JsonlSink::new(cfg.records_file()));
    let shared_config = cfg.shared();

    let mut bot = SignalBot::new(shared_config, source, sink).await;
    bot.run().await?;

    Ok(())
}
