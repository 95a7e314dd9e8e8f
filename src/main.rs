//! Coinwatch - price-alert daemon.
//!
//! Loads configuration, initializes logging and runs the alert schedule.

use coinwatch::{App, Config, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load_or_default()?;

    // Initialize logging, optionally with a rolling file under the data dir
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coinwatch=info".into());

    let (file_layer, _guard) = if config.log.file_logging {
        let dir = match config.log.directory.clone() {
            Some(dir) => dir,
            None => coinwatch::config::log_dir()?,
        };
        let appender = tracing_appender::rolling::daily(dir, "coinwatch.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    // Run the alert schedule
    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}
