//! The structured bundle handed to the output collaborator at run end.

use crate::{
    coverage::{leaf_coverage, CoverageReport},
    rate::{edge_rates, Bandwidth, EdgeRate},
    route::{infer_route, RouteHints, RouteHypothesis},
    snapshot::Snapshot,
    stats::MessageStats,
    summary::MessageStatsSummary,
    time::SimTime,
};
use std::fmt;

/// Everything [`finalize`] needs besides the accumulator itself.
///
/// Borrowed from the simulation's terminal state; the caller guarantees none
/// of it mutates during the call.
#[derive(Debug, Clone, Copy)]
pub struct FinalizeInputs<'a> {
    /// Name of the scenario that produced the run.
    pub scenario: &'a str,
    /// Simulation time at the end of the run.
    pub sim_time: SimTime,
    /// Connectivity at the moment of finalization.
    pub snapshot: &'a Snapshot,
    /// Visitation history of the first endpoint of interest.
    pub hints_a: &'a RouteHints,
    /// Visitation history of the second endpoint of interest.
    pub hints_b: &'a RouteHints,
    /// Name of the node whose edges get per-link rate estimates.
    pub designated: &'a str,
    /// Transmit bandwidth used by the rate estimator.
    pub bandwidth: Bandwidth,
}

/// The combined result of a finished run.
///
/// One-shot: derived once from the terminal accumulator state and snapshot,
/// then handed to the output collaborator. The [`fmt::Display`]
/// implementation renders the full report text; how (and whether) that text
/// reaches a file is the collaborator's business.
#[derive(Debug, Clone)]
pub struct FinalReport {
    pub scenario: String,
    pub sim_time: SimTime,
    pub summary: MessageStatsSummary,
    pub coverage: CoverageReport,
    pub route: RouteHypothesis,
    /// Node the rate estimates below belong to.
    pub designated: String,
    pub rates: Vec<EdgeRate>,
}

/// Derives the final report from the terminal state.
///
/// Pure and bounded: one pass over the accumulated series, one pass over the
/// snapshot per analyzer. Runs exactly once, after the event stream is
/// exhausted.
pub fn finalize(stats: &MessageStats, inputs: &FinalizeInputs<'_>) -> FinalReport {
    FinalReport {
        scenario: inputs.scenario.to_owned(),
        sim_time: inputs.sim_time,
        summary: stats.summary(),
        coverage: leaf_coverage(inputs.snapshot),
        route: infer_route(inputs.hints_a, inputs.hints_b),
        designated: inputs.designated.to_owned(),
        rates: edge_rates(inputs.snapshot, inputs.designated, inputs.bandwidth),
    }
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Message stats for scenario {}", self.scenario)?;
        writeln!(f, "sim_time: {}", self.sim_time)?;
        writeln!(f)?;
        writeln!(f, "{}", self.summary)?;
        writeln!(f)?;
        writeln!(f, "{}", self.coverage)?;
        writeln!(f)?;
        writeln!(f, "{}", self.route)?;
        writeln!(f)?;
        writeln!(f, "designated station: {}", self.designated)?;
        for rate in &self.rates {
            writeln!(f, "{rate}")?;
        }
        Ok(())
    }
}
