//! Delivery-performance statistics and connectivity analysis for
//! delay-tolerant network simulations.
//!
//! The crate sits at the end of a simulation run and does two things:
//!
//! 1. **Streaming aggregation** — [`MessageStats`] consumes message
//!    lifecycle [`Event`]s one at a time while the run is in progress and
//!    maintains the counters and series (latencies, hop counts, buffer
//!    residence times, round-trip times) delivery performance is derived
//!    from. Messages created during a configured warm-up interval are
//!    excluded throughout.
//! 2. **One-shot structural analysis** — at run end, [`finalize`] derives
//!    ratio/average/median statistics from the terminal accumulator state
//!    and runs three pure analyzers over the terminal connectivity
//!    [`Snapshot`]: per-station leaf [`coverage`], a station-sequence
//!    [`route`] hypothesis between two endpoints of interest, and a
//!    per-edge link [`rate`] estimate for one designated station.
//!
//! Ratios with zero denominators and statistics over empty series are
//! reported as explicit sentinels (`undefined`, `no data`), never coerced to
//! 0 and never a crash; the one fatal condition is an event feed that breaks
//! its ordering contract ([`StatsError::UnknownMessage`]).
//!
//! ```
//! use dtnstat_core::{Event, EventKind, Message, MessageStats, SimTime};
//!
//! let mut stats = MessageStats::new();
//! let message = Message::new("M1", "user1", SimTime::ZERO);
//!
//! stats.on_event(Event {
//!     at: SimTime::ZERO,
//!     message: &message,
//!     kind: EventKind::Created,
//! })?;
//!
//! assert_eq!(stats.counters().created, 1);
//! # Ok::<(), dtnstat_core::StatsError>(())
//! ```

pub mod coverage;
pub mod message;
pub mod rate;
pub mod report;
pub mod route;
pub mod snapshot;
pub mod stats;
pub mod summary;
mod time;

pub use self::{
    coverage::{leaf_coverage, CoverageReport, StationCoverage},
    message::{Event, EventKind, Message, MessageId},
    rate::{edge_rates, link_rate, Bandwidth, EdgeRate},
    report::{finalize, FinalReport, FinalizeInputs},
    route::{infer_route, RouteHints, RouteHypothesis},
    snapshot::{Node, NodeId, NodeRole, Position, Snapshot, SnapshotBuilder, SnapshotError},
    stats::{Counters, MessageStats, StatsError},
    summary::MessageStatsSummary,
    time::SimTime,
};
