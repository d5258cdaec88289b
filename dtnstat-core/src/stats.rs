//! Incremental delivery-performance statistics.
//!
//! [`MessageStats`] consumes message lifecycle [`Event`]s one at a time for
//! the duration of a run and maintains the running counters and series the
//! final report is derived from. It is an owned object with an explicit
//! lifecycle: construct it at run start, mutate it only through
//! [`on_event`](MessageStats::on_event), read it through
//! [`summary`](MessageStats::summary) and the accessors.
//!
//! Messages created during the warm-up interval are excluded from every
//! statistic: the id is recorded the moment its `Created` event fires during
//! warm-up, and every subsequent event for that id is ignored.

use crate::{
    message::{Event, EventKind, MessageId},
    summary::MessageStatsSummary,
    time::SimTime,
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Error returned when the event feed violates the ordering contract.
///
/// There is no recovery path: the statistics are no longer trustworthy, so
/// the driver should abort finalization and surface the defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// A message reached its final target without a `Created` event ever
    /// having been observed for it (outside warm-up). The driving simulation
    /// must deliver `Created` before any other event for the same id.
    #[error("message {id} was delivered but never created: the event feed broke the ordering contract")]
    UnknownMessage { id: MessageId },
}

/// The monotonically increasing event counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    /// Messages created (outside warm-up).
    pub created: u64,
    /// Transfers started.
    pub started: u64,
    /// Transfers completed, whether or not they delivered the message.
    pub relayed: u64,
    /// Messages that reached their final target.
    pub delivered: u64,
    /// Transfers interrupted before completing.
    pub aborted: u64,
    /// Messages dropped from a buffer under pressure.
    pub dropped: u64,
    /// Messages removed from a buffer for any other reason.
    pub removed: u64,
    /// Created messages that requested a response.
    pub response_requested: u64,
    /// Responses that reached the original requester.
    pub response_delivered: u64,
}

/// Stateful accumulator for message relaying performance.
///
/// Driven synchronously by the simulation's event loop; each
/// [`on_event`](Self::on_event) call completes before the next event is
/// delivered, so no locking is involved.
#[derive(Debug, Clone, Default)]
pub struct MessageStats {
    /// End of the warm-up interval. Events at `at < warm_up_until` are in
    /// warm-up; the default of [`SimTime::ZERO`] disables filtering.
    warm_up_until: SimTime,
    /// Ids first seen as `Created` during warm-up.
    warm_up_ids: HashSet<MessageId>,

    /// Creation time per message id. Entries are never removed.
    creation_times: HashMap<MessageId, SimTime>,

    /// Seconds from creation to delivery, one entry per delivered message.
    latencies: Vec<f64>,
    /// Edges traversed, one entry per delivered message.
    hop_counts: Vec<usize>,
    /// Seconds a message sat in a buffer before being dropped or removed.
    buffer_times: Vec<f64>,
    /// Seconds from a request's creation to its response's delivery.
    round_trip_times: Vec<f64>,

    counters: Counters,
}

impl MessageStats {
    /// Creates an accumulator with no warm-up interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accumulator that excludes messages created before `until`.
    pub fn with_warm_up(until: SimTime) -> Self {
        Self {
            warm_up_until: until,
            ..Self::default()
        }
    }

    /// Consumes one lifecycle event.
    ///
    /// Pure state transition: never blocks and fails only on
    /// [`StatsError::UnknownMessage`], which signals a defect in the driving
    /// simulation rather than a recoverable condition.
    pub fn on_event(&mut self, event: Event<'_>) -> Result<(), StatsError> {
        let id = event.message.id();

        match event.kind {
            EventKind::Created => {
                if event.at < self.warm_up_until {
                    self.warm_up_ids.insert(id.clone());
                    return Ok(());
                }
                // a repeated Created for a warm-up id stays excluded
                if self.is_warm_up_id(id) {
                    return Ok(());
                }

                self.creation_times.insert(id.clone(), event.at);
                self.counters.created += 1;
                if event.message.response_size() > 0 {
                    self.counters.response_requested += 1;
                }
            }
            EventKind::TransferStarted { .. } => {
                if self.is_warm_up_id(id) {
                    return Ok(());
                }

                self.counters.started += 1;
            }
            EventKind::Transferred { final_target, .. } => {
                if self.is_warm_up_id(id) {
                    return Ok(());
                }

                self.counters.relayed += 1;
                if final_target {
                    let created = self
                        .creation_times
                        .get(id)
                        .copied()
                        .ok_or_else(|| StatsError::UnknownMessage { id: id.clone() })?;

                    self.latencies.push(event.at - created);
                    self.counters.delivered += 1;
                    self.hop_counts.push(event.message.hop_count());

                    if let Some(request) = event.message.request() {
                        self.round_trip_times.push(event.at - request.created());
                        self.counters.response_delivered += 1;
                    }
                }
            }
            EventKind::TransferAborted { .. } => {
                if self.is_warm_up_id(id) {
                    return Ok(());
                }

                self.counters.aborted += 1;
            }
            EventKind::Deleted { dropped, .. } => {
                if self.is_warm_up_id(id) {
                    return Ok(());
                }

                if dropped {
                    self.counters.dropped += 1;
                } else {
                    self.counters.removed += 1;
                }

                // receive time may equal the removal time, yielding 0
                self.buffer_times
                    .push(event.at - event.message.receive_time());
            }
        }

        Ok(())
    }

    /// Returns `true` when `id` was first seen as `Created` during warm-up.
    pub fn is_warm_up_id(&self, id: &MessageId) -> bool {
        self.warm_up_ids.contains(id)
    }

    /// The current counter values.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Creation-to-delivery times in seconds, one per delivered message.
    pub fn latencies(&self) -> &[f64] {
        &self.latencies
    }

    /// Edges traversed, one per delivered message.
    pub fn hop_counts(&self) -> &[usize] {
        &self.hop_counts
    }

    /// Buffer residence times in seconds, one per dropped/removed message.
    pub fn buffer_times(&self) -> &[f64] {
        &self.buffer_times
    }

    /// Request-creation-to-response-delivery times in seconds.
    pub fn round_trip_times(&self) -> &[f64] {
        &self.round_trip_times
    }

    /// Derives the ratio/average/median statistics from the current state.
    pub fn summary(&self) -> MessageStatsSummary {
        MessageStatsSummary::derive(self)
    }
}
