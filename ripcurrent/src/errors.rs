//! Error types for the ripcurrent engine.
//!
//! Contract mismatches never show up here: they are compile errors. Leaked
//! fragments go to the [`ErrorHandler`](crate::handler::ErrorHandler). What
//! remains are failures raised while a job runs and configuration problems.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for ripcurrent operations.
#[derive(Debug, Error)]
pub enum RipCurrentError {
    /// A node constructor or reaction reported a failure.
    #[error("Node '{node}' failed: {message}")]
    Node {
        /// Name of the failing node.
        node: String,
        /// Rendered error chain.
        message: String,
    },

    /// A message reached a node that declares no reaction for its type.
    #[error("Node '{node}' cannot accept payload '{payload}'")]
    UnexpectedPayload {
        /// Name of the receiving node, or `<end>` past the last node.
        node: String,
        /// Name of the payload type.
        payload: String,
    },

    /// A realized or dismissed fragment was used again.
    #[error("Pipeline fragment reused after being consumed: {description}")]
    ConsumedFragmentReused {
        /// Description of the fragment.
        description: String,
    },

    /// A threaded-mode stage task could not be joined.
    #[error("Stage task failed to join: {0}")]
    StageJoin(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RipCurrentError {
    /// Wraps a node failure, keeping the whole `anyhow` context chain.
    #[must_use]
    pub fn node(node: &str, source: &anyhow::Error) -> Self {
        Self::Node {
            node: node.to_string(),
            message: format!("{source:#}"),
        }
    }

    /// Stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Node { .. } => "RC-001-NODE",
            Self::UnexpectedPayload { .. } => "RC-002-PAYLOAD",
            Self::ConsumedFragmentReused { .. } => "RC-003-REUSED",
            Self::StageJoin(_) => "RC-004-JOIN",
            Self::Config(_) => "RC-005-CONFIG",
            Self::Serialization(_) => "RC-006-SERDE",
        }
    }

    /// Builds structured diagnostics for the error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        let info = ErrorInfo::new(self.code(), self.to_string());
        match self {
            Self::Node { node, .. } => info
                .with_context_entry("node", node.clone())
                .with_fix_hint("Check the node's construction arguments."),
            Self::UnexpectedPayload { node, payload } => info
                .with_context_entry("node", node.clone())
                .with_context_entry("payload", payload.clone())
                .with_fix_hint("Hand-written `Node` impls must dispatch every declared input type."),
            Self::ConsumedFragmentReused { .. } => {
                info.with_fix_hint("Borrow the fragment (`&fragment | ...`) to reuse it as a building block.")
            }
            Self::Config(_) => info.with_fix_hint("Validate the job configuration before running."),
            Self::StageJoin(_) | Self::Serialization(_) => info,
        }
    }
}

/// Structured diagnostics about an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorInfo {
    /// Error code (e.g., "RC-001-NODE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}
