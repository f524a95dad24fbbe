//! Tracing setup for processes embedding the validation layer.
//!
//! `LOG_LEVEL` feeds the filter (plain level or full directives such as
//! "info,edu_validation=debug"); `LOG_FORMAT=json` switches to structured output.

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};

/// Installs the global subscriber. Returns false when one was already installed.
pub fn init_tracing(config: &Config) -> bool {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.log_format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.try_init().is_ok(),
    }
}
