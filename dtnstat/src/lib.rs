/*!
# DTN run reporter

Driver-facing surface over [`dtnstat_core`]: a [`Reporter`] that the
simulation's event loop feeds message lifecycle events into, and that
produces the combined [`FinalReport`] once the run is over.

See `examples/campus.rs` for a complete run against a synthetic scenario.
*/

mod reporter;

// convenient re-export of `dtnstat_core` core objects
pub use dtnstat_core::{
    Bandwidth, Counters, EdgeRate, Event, EventKind, FinalReport, FinalizeInputs, Message,
    MessageId, MessageStats, MessageStatsSummary, NodeRole, Position, RouteHints, RouteHypothesis,
    SimTime, Snapshot, SnapshotBuilder, StatsError,
};

pub use self::reporter::{write_report, Reporter};
