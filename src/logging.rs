// 📝 Logging setup for the CLI
//
// RUST_LOG wins over the configured level. Logs go to stderr (or a file) so
// stdout stays clean for JSON and CSV output.

use anyhow::Result;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let file = match &config.file_path {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    match (config.format.as_str(), file) {
        ("json", Some(file)) => registry
            .with(fmt::layer().json().with_writer(Mutex::new(file)))
            .try_init()?,
        ("json", None) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        (_, Some(file)) => registry
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .try_init()?,
        (_, None) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
    }

    tracing::debug!("Logging initialized with level: {}", config.level);
    Ok(())
}
