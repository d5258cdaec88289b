use dtnstat_core::{finalize, Event, FinalReport, FinalizeInputs, MessageStats, SimTime, StatsError};
use std::io;

/// Driver-side orchestrator over [`MessageStats`].
///
/// The simulation pushes every lifecycle event through
/// [`on_event`](Reporter::on_event) for the duration of the run, then calls
/// [`finalize`](Reporter::finalize) exactly once against its terminal state.
///
/// An event feed that breaks the ordering contract poisons the reporter:
/// the first [`StatsError`] is latched and `finalize` refuses to produce a
/// report afterwards, surfacing the defect instead of statistics that are no
/// longer trustworthy.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    stats: MessageStats,
    defect: Option<StatsError>,
}

impl Reporter {
    /// Creates a reporter with no warm-up interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reporter that excludes messages created before `until`.
    pub fn with_warm_up(until: SimTime) -> Self {
        Self {
            stats: MessageStats::with_warm_up(until),
            defect: None,
        }
    }

    /// Forwards one lifecycle event to the accumulator.
    ///
    /// The error, if any, is also latched so a driver that ignores it still
    /// cannot finalize a corrupted run.
    pub fn on_event(&mut self, event: Event<'_>) -> Result<(), StatsError> {
        let result = self.stats.on_event(event);
        if let Err(defect) = &result {
            self.defect.get_or_insert(defect.clone());
        }
        result
    }

    /// Read access to the accumulator (counters, series).
    pub fn stats(&self) -> &MessageStats {
        &self.stats
    }

    /// Derives the final report from the terminal state.
    ///
    /// Fails with the first latched [`StatsError`] when the event feed
    /// violated its contract at any point during the run.
    pub fn finalize(&self, inputs: &FinalizeInputs<'_>) -> Result<FinalReport, StatsError> {
        match &self.defect {
            Some(defect) => Err(defect.clone()),
            None => Ok(finalize(&self.stats, inputs)),
        }
    }
}

/// Writes the rendered report text to `writer`.
///
/// Where the bytes go (file, console, socket) and the file lifecycle around
/// them are the caller's business.
pub fn write_report<W: io::Write>(writer: &mut W, report: &FinalReport) -> io::Result<()> {
    write!(writer, "{report}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtnstat_core::{
        Bandwidth, EventKind, Message, NodeRole, Position, RouteHints, Snapshot, SnapshotBuilder,
    };

    fn snapshot() -> Snapshot {
        let mut builder = SnapshotBuilder::new();
        let hub = builder.add_node("hub", NodeRole::Infrastructure, Position::new(0.0, 0.0));
        let bs1 = builder.add_node("bs1", NodeRole::Infrastructure, Position::new(10.0, 0.0));
        let u1 = builder.add_node("user1", NodeRole::Leaf, Position::new(13.0, 4.0));
        builder.connect(hub, bs1).unwrap();
        builder.connect(bs1, u1).unwrap();
        builder.build()
    }

    fn inputs<'a>(
        snapshot: &'a Snapshot,
        hints_a: &'a RouteHints,
        hints_b: &'a RouteHints,
    ) -> FinalizeInputs<'a> {
        FinalizeInputs {
            scenario: "test",
            sim_time: SimTime::from_seconds(10.0),
            snapshot,
            hints_a,
            hints_b,
            designated: "bs1",
            bandwidth: Bandwidth::new(1_000_000),
        }
    }

    #[test]
    fn run_and_finalize() {
        let mut reporter = Reporter::new();
        let message = Message::new("M1", "user1", SimTime::ZERO);
        reporter
            .on_event(Event {
                at: SimTime::ZERO,
                message: &message,
                kind: EventKind::Created,
            })
            .unwrap();

        let snapshot = snapshot();
        let hints_a = RouteHints::new("user1");
        let hints_b = RouteHints::new("user10");
        let report = reporter
            .finalize(&inputs(&snapshot, &hints_a, &hints_b))
            .unwrap();

        assert_eq!(report.summary.counters.created, 1);
        assert_eq!(report.coverage.leaf_count("bs1"), Some(1));

        let mut rendered = Vec::new();
        write_report(&mut rendered, &report).unwrap();
        assert!(String::from_utf8(rendered)
            .unwrap()
            .starts_with("Message stats for scenario test"));
    }

    #[test]
    fn contract_violation_poisons_finalize() {
        let mut reporter = Reporter::new();
        let message = Message::new("M1", "user1", SimTime::ZERO);

        // final-target transfer without a Created first
        let defect = reporter
            .on_event(Event {
                at: SimTime::from_seconds(1.0),
                message: &message,
                kind: EventKind::Transferred {
                    from: "user1",
                    to: "user10",
                    final_target: true,
                },
            })
            .unwrap_err();

        // later well-formed traffic does not clear the defect
        reporter
            .on_event(Event {
                at: SimTime::from_seconds(2.0),
                message: &message,
                kind: EventKind::Created,
            })
            .unwrap();

        let snapshot = snapshot();
        let hints_a = RouteHints::new("user1");
        let hints_b = RouteHints::new("user10");
        let result = reporter.finalize(&inputs(&snapshot, &hints_a, &hints_b));
        assert_eq!(result.unwrap_err(), defect);
    }
}
