//! Realized pipelines and the synchronous execution engine.

use super::Fragment;
use crate::config::{ExecutionMode, JobConfig};
use crate::core::Message;
use crate::errors::RipCurrentError;
use crate::node::{LiveNode, NodeInstance};
use crate::observability::SpanTimer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};
use uuid::Uuid;

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique ID of this run.
    pub run_id: Uuid,
    /// Description of the realized chain.
    pub pipeline: String,
    /// Number of nodes.
    pub nodes: usize,
    /// Values emitted by constructors and reactions.
    pub emitted: u64,
    /// Values handed to a reaction.
    pub delivered: u64,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall time in milliseconds.
    pub duration_ms: f64,
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DeliveryStats {
    pub(crate) emitted: u64,
    pub(crate) delivered: u64,
}

impl DeliveryStats {
    pub(crate) fn merge(&mut self, other: Self) {
        self.emitted += other.emitted;
        self.delivered += other.delivered;
    }
}

/// A closed, validated chain ready to run.
///
/// Produced by [`Fragment::realize`]. Running a job constructs fresh node
/// state from the fragment's blueprints.
#[derive(Debug)]
pub struct Job {
    description: String,
    nodes: Vec<NodeInstance>,
}

impl Fragment<(), ()> {
    /// Converts a closed fragment into a runnable job, consuming it.
    pub fn realize(mut self) -> Job {
        let description = self.render(false);
        Job {
            description,
            nodes: self.take_nodes(),
        }
    }

    /// Realizes the fragment and runs it to completion.
    pub fn sync(self) -> Result<RunSummary, RipCurrentError> {
        self.realize().run()
    }
}

impl Job {
    /// Description of the chain, as rendered by [`Fragment::describe`].
    #[must_use]
    pub fn describe(&self) -> &str {
        &self.description
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a job holds at least one node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<NodeInstance>) {
        (self.description, self.nodes)
    }

    /// Runs the chain synchronously until it is drained.
    ///
    /// Nodes are constructed from the last to the first, so every value a
    /// constructor emits already has a live receiver. Each emitted value is
    /// handed to the next node's reaction right away, depth-first, which
    /// keeps per-edge ordering.
    pub fn run(self) -> Result<RunSummary, RipCurrentError> {
        self.run_traced(false)
    }

    /// Runs the chain in the mode selected by `config`.
    pub async fn run_with_config(self, config: &JobConfig) -> Result<RunSummary, RipCurrentError> {
        config.validate()?;
        match config.mode {
            ExecutionMode::Sync => self.run_traced(config.trace_messages),
            ExecutionMode::Threaded => self.run_threaded(config.channel_capacity).await,
        }
    }

    fn run_traced(self, trace_messages: bool) -> Result<RunSummary, RipCurrentError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let timer = SpanTimer::start(&self.description);
        info!(%run_id, pipeline = %self.description, nodes = self.nodes.len(), "Running pipeline");

        let mut drain = Drain {
            stats: DeliveryStats::default(),
            trace_messages,
        };
        let mut live: Vec<Option<Box<dyn LiveNode>>> = self.nodes.iter().map(|_| None).collect();

        for (index, instance) in self.nodes.iter().enumerate().rev() {
            let mut queue = Vec::new();
            live[index] = Some(instance.instantiate(&mut queue));
            drain.stats.emitted += queue.len() as u64;
            for message in queue {
                if let Err(err) = drain.deliver(&mut live, index + 1, message) {
                    warn!(%run_id, error = %err, "Pipeline run failed");
                    return Err(err);
                }
            }
        }

        let summary = RunSummary {
            run_id,
            pipeline: self.description,
            nodes: self.nodes.len(),
            emitted: drain.stats.emitted,
            delivered: drain.stats.delivered,
            started_at,
            duration_ms: timer.finish(),
        };
        info!(
            %run_id,
            delivered = summary.delivered,
            duration_ms = summary.duration_ms,
            "Pipeline drained"
        );
        Ok(summary)
    }
}

struct Drain {
    stats: DeliveryStats,
    trace_messages: bool,
}

impl Drain {
    /// Hands `message` to `live[target]`, then recursively forwards whatever
    /// that reaction emitted.
    fn deliver(
        &mut self,
        live: &mut [Option<Box<dyn LiveNode>>],
        target: usize,
        message: Message,
    ) -> Result<(), RipCurrentError> {
        // Everything downstream of a constructor is already built.
        let Some(node) = live.get_mut(target).and_then(Option::as_mut) else {
            return Err(RipCurrentError::UnexpectedPayload {
                node: "<end>".to_string(),
                payload: message.payload_type().name().to_string(),
            });
        };

        if self.trace_messages {
            trace!(node = node.name(), payload = message.payload_type().name(), "Delivering message");
        }

        let mut queue = Vec::new();
        match node.accept(message, &mut queue) {
            Ok(Ok(())) => {}
            Ok(Err(source)) => return Err(RipCurrentError::node(node.name(), &source)),
            Err(message) => {
                return Err(RipCurrentError::UnexpectedPayload {
                    node: node.name().to_string(),
                    payload: message.payload_type().name().to_string(),
                })
            }
        }
        self.stats.delivered += 1;
        self.stats.emitted += queue.len() as u64;

        for next in queue {
            self.deliver(live, target + 1, next)?;
        }
        Ok(())
    }
}
