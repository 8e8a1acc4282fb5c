//! Run and logging configuration.

use crate::errors::RipCurrentError;
use serde::{Deserialize, Serialize};

/// How a job is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Single thread, depth-first delivery.
    #[default]
    Sync,
    /// One blocking task per node, bounded channels between them.
    Threaded,
}

/// Default capacity of each inter-node channel in threaded mode.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Options for [`Job::run_with_config`](crate::pipeline::Job::run_with_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Execution mode.
    pub mode: ExecutionMode,
    /// Messages buffered per edge in threaded mode.
    pub channel_capacity: usize,
    /// Emit a `trace` event for every delivered message (sync mode).
    pub trace_messages: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sync,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            trace_messages: false,
        }
    }
}

impl JobConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RipCurrentError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the execution mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the per-edge channel capacity.
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Enables per-message trace events.
    #[must_use]
    pub fn with_trace_messages(mut self, enabled: bool) -> Self {
        self.trace_messages = enabled;
        self
    }

    /// Checks the configuration for invalid values.
    pub fn validate(&self) -> Result<(), RipCurrentError> {
        if self.channel_capacity == 0 {
            return Err(RipCurrentError::Config(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for [`init_tracing`](crate::observability::init_tracing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Sets the filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Switches JSON output on or off.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}
