//! Ratio/median finalization over the accumulated statistics.
//!
//! Everything here is a pure function of the terminal [`MessageStats`]
//! state. Degenerate inputs never crash: a ratio with a zero denominator and
//! an average/median over an empty series are reported as explicit `None`
//! sentinels (rendered `undefined` / `no data`), with two deliberate
//! exceptions documented on [`MessageStatsSummary::response_prob`] and
//! [`median_int`].

use crate::stats::{Counters, MessageStats};
use std::fmt;

/// Arithmetic mean of a series; `None` for an empty one.
pub fn average(series: &[f64]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }

    Some(series.iter().sum::<f64>() / series.len() as f64)
}

/// Median of a real-valued series; `None` for an empty one.
///
/// For a sorted series of length `n`: the element at index `n / 2` when `n`
/// is odd, the mean of the two middle elements when `n` is even.
pub fn median(series: &[f64]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }

    let mut sorted = series.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Median of an integer series, 0 for an empty one.
///
/// The zero-for-empty convention differs from [`median`]'s `None`; the
/// integer series (hop counts) has historically reported 0 when no message
/// was delivered and downstream consumers rely on that. Preserved per
/// series, not unified.
pub fn median_int(series: &[usize]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }

    let mut sorted = series.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    }
}

/// The derived statistics of a finished run.
///
/// Obtained via [`MessageStats::summary`]. Plain data; the [`fmt::Display`]
/// implementation renders the classic key/value block.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageStatsSummary {
    /// The nine raw event counters.
    pub counters: Counters,

    /// `delivered / created`; `None` when no message was created — a run
    /// with zero created messages has no defined delivery probability.
    pub delivery_prob: Option<f64>,
    /// `(relayed − delivered) / delivered`; `None` when nothing was
    /// delivered.
    pub overhead_ratio: Option<f64>,
    /// `response_delivered / response_requested`, but **0.0** when no
    /// response was requested.
    ///
    /// Note the asymmetry with [`delivery_prob`](Self::delivery_prob) and
    /// [`overhead_ratio`](Self::overhead_ratio), which report `None` for a
    /// zero denominator. The original report behaved this way and consumers
    /// may rely on it; review before unifying the conventions.
    pub response_prob: f64,

    /// Mean creation-to-delivery latency in seconds.
    pub latency_avg: Option<f64>,
    /// Median creation-to-delivery latency in seconds.
    pub latency_med: Option<f64>,
    /// Mean hop count over delivered messages.
    pub hop_count_avg: Option<f64>,
    /// Median hop count; 0 when nothing was delivered (see [`median_int`]).
    pub hop_count_med: f64,
    /// Mean buffer residence time in seconds.
    pub buffer_time_avg: Option<f64>,
    /// Median buffer residence time in seconds.
    pub buffer_time_med: Option<f64>,
    /// Mean round-trip time in seconds.
    pub rtt_avg: Option<f64>,
    /// Median round-trip time in seconds.
    pub rtt_med: Option<f64>,
}

impl MessageStatsSummary {
    pub(crate) fn derive(stats: &MessageStats) -> Self {
        let counters = stats.counters();

        let delivery_prob = (counters.created > 0)
            .then(|| counters.delivered as f64 / counters.created as f64);
        let overhead_ratio = (counters.delivered > 0)
            .then(|| (counters.relayed - counters.delivered) as f64 / counters.delivered as f64);
        let response_prob = if counters.response_requested > 0 {
            counters.response_delivered as f64 / counters.response_requested as f64
        } else {
            0.0
        };

        let hop_counts_f64: Vec<f64> = stats.hop_counts().iter().map(|&h| h as f64).collect();

        Self {
            counters,
            delivery_prob,
            overhead_ratio,
            response_prob,
            latency_avg: average(stats.latencies()),
            latency_med: median(stats.latencies()),
            hop_count_avg: average(&hop_counts_f64),
            hop_count_med: median_int(stats.hop_counts()),
            buffer_time_avg: average(stats.buffer_times()),
            buffer_time_med: median(stats.buffer_times()),
            rtt_avg: average(stats.round_trip_times()),
            rtt_med: median(stats.round_trip_times()),
        }
    }
}

fn ratio(value: Option<f64>) -> RenderedValue {
    RenderedValue(value, "undefined")
}

fn series(value: Option<f64>) -> RenderedValue {
    RenderedValue(value, "no data")
}

struct RenderedValue(Option<f64>, &'static str);

impl fmt::Display for RenderedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.4}"),
            None => f.write_str(self.1),
        }
    }
}

impl fmt::Display for MessageStatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counters;
        writeln!(f, "created: {}", c.created)?;
        writeln!(f, "started: {}", c.started)?;
        writeln!(f, "relayed: {}", c.relayed)?;
        writeln!(f, "aborted: {}", c.aborted)?;
        writeln!(f, "dropped: {}", c.dropped)?;
        writeln!(f, "removed: {}", c.removed)?;
        writeln!(f, "delivered: {}", c.delivered)?;
        writeln!(f, "delivery_prob: {}", ratio(self.delivery_prob))?;
        writeln!(f, "response_prob: {:.4}", self.response_prob)?;
        writeln!(f, "overhead_ratio: {}", ratio(self.overhead_ratio))?;
        writeln!(f, "latency_avg: {}", series(self.latency_avg))?;
        writeln!(f, "latency_med: {}", series(self.latency_med))?;
        writeln!(f, "hopcount_avg: {}", series(self.hop_count_avg))?;
        writeln!(f, "hopcount_med: {:.4}", self.hop_count_med)?;
        writeln!(f, "buffertime_avg: {}", series(self.buffer_time_avg))?;
        writeln!(f, "buffertime_med: {}", series(self.buffer_time_med))?;
        writeln!(f, "rtt_avg: {}", series(self.rtt_avg))?;
        write!(f, "rtt_med: {}", series(self.rtt_med))
    }
}
