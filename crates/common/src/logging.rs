//! Logging and tracing initialization.

use crate::config::LoggingConfig;
use crate::error::{SketchError, SketchResult};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. Fails if a global
/// subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> SketchResult<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_thread_names(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_names(true)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    result.map_err(|e| SketchError::session(format!("Failed to install logger: {e}")))
}
