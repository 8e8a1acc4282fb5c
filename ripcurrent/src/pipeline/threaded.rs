//! Threaded execution: one blocking task per node, bounded channels between
//! neighbours.

use super::job::{DeliveryStats, Job, RunSummary};
use crate::core::Message;
use crate::errors::RipCurrentError;
use crate::node::{LiveNode, NodeInstance};
use crate::observability::SpanTimer;
use chrono::Utc;
use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

type Inbox = mpsc::Receiver<Message>;
type Outbox = mpsc::Sender<Message>;

impl Job {
    /// Runs every node on its own blocking task.
    ///
    /// Neighbouring nodes are linked by a channel holding at most `capacity`
    /// messages, so a slow consumer applies backpressure upstream. Values on
    /// each edge arrive in emission order; produces the same sink output as
    /// [`Job::run`]. When several nodes fail, the error of the earliest node
    /// in the chain is returned.
    pub async fn run_threaded(self, capacity: usize) -> Result<RunSummary, RipCurrentError> {
        if capacity == 0 {
            return Err(RipCurrentError::Config("channel_capacity must be at least 1".to_string()));
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let (description, nodes) = self.into_parts();
        let timer = SpanTimer::start(&description);
        let count = nodes.len();
        info!(%run_id, pipeline = %description, nodes = count, capacity, "Running pipeline threaded");

        let mut inboxes: Vec<Option<Inbox>> = Vec::with_capacity(count);
        let mut outboxes: Vec<Option<Outbox>> = Vec::with_capacity(count);
        inboxes.push(None);
        for _ in 1..count {
            let (tx, rx) = mpsc::channel(capacity);
            outboxes.push(Some(tx));
            inboxes.push(Some(rx));
        }
        outboxes.push(None);

        let handles = nodes
            .into_iter()
            .zip(inboxes.into_iter().zip(outboxes))
            .map(|(instance, (inbox, outbox))| {
                tokio::task::spawn_blocking(move || run_stage(&instance, inbox, outbox))
            });
        let results = join_all(handles).await;

        let mut stats = DeliveryStats::default();
        let mut first_error = None;
        for result in results {
            let outcome = result.map_err(|e| RipCurrentError::StageJoin(e.to_string()));
            match outcome.and_then(|stage| stage) {
                Ok(stage_stats) => stats.merge(stage_stats),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        if let Some(err) = first_error {
            warn!(%run_id, error = %err, "Pipeline run failed");
            return Err(err);
        }

        let summary = RunSummary {
            run_id,
            pipeline: description,
            nodes: count,
            emitted: stats.emitted,
            delivered: stats.delivered,
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

/// Body of one stage task: construct, forward construction emissions, then
/// react to the inbox until the upstream side closes.
fn run_stage(
    instance: &NodeInstance,
    inbox: Option<Inbox>,
    outbox: Option<Outbox>,
) -> Result<DeliveryStats, RipCurrentError> {
    let mut stats = DeliveryStats::default();
    let mut queue = Vec::new();
    let mut node = instance.instantiate(&mut queue);
    stats.emitted += queue.len() as u64;
    if !forward(node.as_ref(), outbox.as_ref(), &mut queue)? {
        return Ok(stats);
    }

    let Some(mut inbox) = inbox else {
        return Ok(stats);
    };
    while let Some(message) = inbox.blocking_recv() {
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
        stats.delivered += 1;
        stats.emitted += queue.len() as u64;
        if !forward(node.as_ref(), outbox.as_ref(), &mut queue)? {
            break;
        }
    }
    Ok(stats)
}

/// Sends queued messages downstream. Returns `false` once the downstream
/// stage has gone away.
fn forward(
    node: &dyn LiveNode,
    outbox: Option<&Outbox>,
    queue: &mut Vec<Message>,
) -> Result<bool, RipCurrentError> {
    let Some(outbox) = outbox else {
        return match queue.pop() {
            None => Ok(true),
            Some(message) => Err(RipCurrentError::UnexpectedPayload {
                node: "<end>".to_string(),
                payload: message.payload_type().name().to_string(),
            }),
        };
    };

    for message in queue.drain(..) {
        if outbox.blocking_send(message).is_err() {
            debug!(node = node.name(), "Downstream stage closed, stopping");
            return Ok(false);
        }
    }
    Ok(true)
}
