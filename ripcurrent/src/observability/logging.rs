//! Subscriber setup and span timing.

use crate::config::LogConfig;
use crate::errors::RipCurrentError;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.filter` when set. Returns `Ok(false)` when a
/// subscriber was already installed, so calling this twice is harmless.
pub fn init_tracing(config: &LogConfig) -> Result<bool, RipCurrentError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| RipCurrentError::Config(format!("invalid log filter '{}': {e}", config.filter)))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    Ok(installed)
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!(span = %self.name, duration_ms = elapsed, "Span finished");
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_timer() {
        let timer = SpanTimer::start("Numbers(1) | Collect()");
        assert_eq!(timer.name(), "Numbers(1) | Collect()");
        assert!(timer.elapsed_ms() >= 0.0);
        assert!(timer.finish() >= 0.0);
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = init_tracing(&LogConfig::default().with_filter("ripcurrent=loud")).unwrap_err();
        assert_eq!(err.code(), "RC-005-CONFIG");
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LogConfig::default().with_filter("warn");
        let _ = init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }
}
