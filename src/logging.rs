use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sv::domain::{ViewConfig, ViewError};

/// Sends all tracing output to the configured log file; the terminal belongs to the ui.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_logging(config: &ViewConfig) -> Result<(), ViewError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| ViewError::IoError(std::io::Error::other(e)))
}
