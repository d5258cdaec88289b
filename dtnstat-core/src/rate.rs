//! Per-edge link capacity estimation.
//!
//! A deliberately simplified, Shannon-shaped capacity model — not a physical
//! radio model. [`link_rate`] reproduces the exact formula downstream
//! consumers expect, including the division by 1000 that converts the result
//! to Kb/s.

use crate::snapshot::{NodeRole, Snapshot};
use anyhow::{bail, ensure};
use logos::{Lexer, Logos};
use std::{fmt, str::FromStr};

/// Transmit bandwidth of an interface, in bits per second.
///
/// # Parsing and display
///
/// ```
/// use dtnstat_core::Bandwidth;
///
/// let bandwidth: Bandwidth = "250kbps".parse().unwrap();
/// assert_eq!(bandwidth.bits_per_sec(), 250 * 1_024);
/// assert_eq!(bandwidth.to_string(), "250kbps");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bandwidth(u64);

impl Bandwidth {
    /// Creates a bandwidth of `bits_per_sec` bits per second.
    pub const fn new(bits_per_sec: u64) -> Self {
        Self(bits_per_sec)
    }

    /// Returns the raw bits-per-second value.
    pub const fn bits_per_sec(self) -> u64 {
        self.0
    }
}

const K: u64 = 1_024;
const M: u64 = 1_024 * 1_024;
const G: u64 = 1_024 * 1_024 * 1_024;

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;

        if v < K || v % K != 0 {
            write!(f, "{v}bps")
        } else if v < M || v % M != 0 {
            write!(f, "{}kbps", v / K)
        } else if v < G || v % G != 0 {
            write!(f, "{}mbps", v / M)
        } else {
            write!(f, "{}gbps", v / G)
        }
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")] // Ignore this regex pattern between tokens
enum BandwidthToken {
    #[regex("bps")]
    Bps,
    #[regex("kbps")]
    Kbps,
    #[regex("mbps")]
    Mbps,
    #[regex("gbps")]
    Gbps,

    #[regex("[0-9]+")]
    Value,
}

impl FromStr for Bandwidth {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lex = Lexer::<'_, BandwidthToken>::new(s);

        let Some(Ok(BandwidthToken::Value)) = lex.next() else {
            bail!("Expecting to parse a number")
        };
        let number: u64 = lex.slice().parse()?;
        let Some(Ok(token)) = lex.next() else {
            bail!("Expecting to parse a unit")
        };
        let bps = match token {
            BandwidthToken::Bps => number,
            BandwidthToken::Kbps => number * K,
            BandwidthToken::Mbps => number * M,
            BandwidthToken::Gbps => number * G,
            BandwidthToken::Value => bail!("Expecting to parse a unit (bps, kbps, ...)"),
        };

        ensure!(
            lex.next().is_none(),
            "Not expecting any other tokens to parse a bandwidth"
        );

        Ok(Self::new(bps))
    }
}

/// Propagation constant of the capacity model.
pub const K_PROPAGATION: f64 = 5.0;

/// Estimated throughput over one edge, in Kb/s.
///
/// `rate = bandwidth · log2(1 + K_PROPAGATION / distance) / 1000`
///
/// A distance of 0 yields `inf` — two co-located nodes are outside the
/// model's domain.
pub fn link_rate(bandwidth: Bandwidth, distance: f64) -> f64 {
    bandwidth.bits_per_sec() as f64 * (1.0 + K_PROPAGATION / distance).log2() / 1000.0
}

/// Rate estimate for one edge of the designated node.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRate {
    /// Name of the leaf node at the other end of the edge.
    pub neighbor: String,
    /// Distance between the two nodes' positions.
    pub distance: f64,
    /// Estimated throughput in Kb/s.
    pub kbps: f64,
}

impl fmt::Display for EdgeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\t{}  \trate = {} Kb/s", self.neighbor, self.kbps)
    }
}

/// Estimates the throughput of every leaf edge of the node named `name`.
///
/// Returns one [`EdgeRate`] per leaf neighbor, in the snapshot's edge order.
/// A name that does not appear in the snapshot yields an empty list: the
/// designated node is a reporting convenience, not a contract.
pub fn edge_rates(snapshot: &Snapshot, name: &str, bandwidth: Bandwidth) -> Vec<EdgeRate> {
    let Some((id, node)) = snapshot.node_by_name(name) else {
        return Vec::new();
    };

    snapshot
        .neighbors(id)
        .filter(|(_, peer)| peer.role() == NodeRole::Leaf)
        .map(|(_, peer)| {
            let distance = node.position().distance_to(&peer.position());
            EdgeRate {
                neighbor: peer.name().to_owned(),
                distance,
                kbps: link_rate(bandwidth, distance),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Position, SnapshotBuilder};

    #[test]
    fn parse_bandwidth() {
        macro_rules! assert_bandwidth {
            ($string:literal == $value:expr) => {
                assert_eq!(
                    $string.parse::<Bandwidth>().unwrap(),
                    Bandwidth::new($value)
                );
            };
        }

        assert_bandwidth!("0bps" == 0);
        assert_bandwidth!("42bps" == 42);
        assert_bandwidth!("42kbps" == 42 * 1_024);
        assert_bandwidth!("42mbps" == 42 * 1_024 * 1_024);
        assert_bandwidth!("2gbps" == 2 * 1_024 * 1_024 * 1_024);
    }

    #[test]
    fn parse_invalid_strings() {
        assert!("42".parse::<Bandwidth>().is_err()); // no unit
        assert!("mbps".parse::<Bandwidth>().is_err()); // no number
        assert!("".parse::<Bandwidth>().is_err()); // empty
        assert!("42mbps extra".parse::<Bandwidth>().is_err()); // trailing token
    }

    #[test]
    fn print_bandwidth() {
        assert_eq!(Bandwidth::new(42).to_string(), "42bps");
        assert_eq!(Bandwidth::new(250 * K).to_string(), "250kbps");
        assert_eq!(Bandwidth::new(3 * M).to_string(), "3mbps");
        // non-multiples fall back to the finer unit
        assert_eq!(Bandwidth::new(K + 1).to_string(), "1025bps");
    }

    #[test]
    fn rate_at_distance_equal_to_propagation_constant() {
        // log2(1 + 5/5) = 1 → 1_000_000 / 1_000 = 1_000 Kb/s
        let rate = link_rate(Bandwidth::new(1_000_000), 5.0);
        assert_eq!(rate, 1_000.0);
    }

    #[test]
    fn rate_decreases_with_distance() {
        let bandwidth = Bandwidth::new(1_000_000);
        let near = link_rate(bandwidth, 1.0);
        let far = link_rate(bandwidth, 100.0);
        assert!(near > far);
        assert!(far > 0.0);
    }

    #[test]
    fn rate_at_zero_distance_is_infinite() {
        assert_eq!(link_rate(Bandwidth::new(1_000_000), 0.0), f64::INFINITY);
    }

    #[test]
    fn rates_for_designated_node_edges() {
        let mut builder = SnapshotBuilder::new();
        let bs = builder.add_node("bs106", NodeRole::Infrastructure, Position::new(0.0, 0.0));
        let u1 = builder.add_node("u1", NodeRole::Leaf, Position::new(3.0, 4.0));
        let u2 = builder.add_node("u2", NodeRole::Leaf, Position::new(0.0, 5.0));
        let hub = builder.add_node("hub", NodeRole::Infrastructure, Position::new(1.0, 0.0));
        builder.connect(bs, u1).unwrap();
        builder.connect(bs, u2).unwrap();
        builder.connect(bs, hub).unwrap();
        let snapshot = builder.build();

        let rates = edge_rates(&snapshot, "bs106", Bandwidth::new(1_000_000));
        // the infrastructure neighbor is skipped, both leaves at distance 5
        assert_eq!(rates.len(), 2);
        for rate in &rates {
            assert_eq!(rate.distance, 5.0);
            assert_eq!(rate.kbps, 1_000.0);
        }
        assert_eq!(rates[0].neighbor, "u1");
        assert_eq!(rates[1].neighbor, "u2");
    }

    #[test]
    fn unknown_designated_node_yields_no_rates() {
        let snapshot = SnapshotBuilder::new().build();
        assert!(edge_rates(&snapshot, "bs106", Bandwidth::new(1_000)).is_empty());
    }
}
