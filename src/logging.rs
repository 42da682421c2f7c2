//! File logging via `tracing`.
//!
//! The terminal belongs to the UI, so events only ever go to a daily rolling
//! file under the state directory.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingSettings};
use crate::error::{Error, Result};

/// Environment variable that overrides `logging.level`.
pub const LOG_ENV: &str = "CHORUS_LOG";

const LOG_FILE: &str = "chorus.log";

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Returns the writer guard, which must be held until exit so buffered lines
/// get flushed; `None` when logging is disabled or no log directory can be
/// resolved.
pub fn init(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    if !settings.enabled {
        return Ok(None);
    }

    let Some(log_dir) = settings
        .directory
        .clone()
        .or_else(config::default_state_dir)
    else {
        return Ok(None);
    };
    fs::create_dir_all(&log_dir).map_err(|e| Error::io(&log_dir, e))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter(&settings.level))
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logging_installs_nothing() {
        let settings = LoggingSettings {
            enabled: false,
            ..LoggingSettings::default()
        };
        assert!(init(&settings).unwrap().is_none());
    }
}
