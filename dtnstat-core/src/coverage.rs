//! Per-station leaf coverage at the snapshot instant.

use crate::snapshot::{NodeRole, Snapshot};
use std::{collections::BTreeMap, fmt};

/// Coverage of one servicing infrastructure node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StationCoverage {
    /// Names of the leaf nodes with an active edge to the station.
    pub leaves: Vec<String>,
}

impl StationCoverage {
    /// Number of leaf nodes the station directly serves.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }
}

/// Per-node coverage counts derived by [`leaf_coverage`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoverageReport {
    /// Servicing-station name → coverage, in name order.
    stations: BTreeMap<String, StationCoverage>,
}

impl CoverageReport {
    /// Iterates over `(station name, coverage)` in name order.
    pub fn stations(&self) -> impl Iterator<Item = (&str, &StationCoverage)> {
        self.stations
            .iter()
            .map(|(name, coverage)| (name.as_str(), coverage))
    }

    /// Coverage of a single station, if it appears in the report.
    pub fn station(&self, name: &str) -> Option<&StationCoverage> {
        self.stations.get(name)
    }

    /// Leaf count of a single station, if it appears in the report.
    pub fn leaf_count(&self, name: &str) -> Option<usize> {
        self.station(name).map(StationCoverage::leaf_count)
    }

    /// The stations whose leaf count is not exceeded by any other entry.
    ///
    /// All ties are reported (in name order), never broken arbitrarily.
    /// Empty when the report itself is empty.
    pub fn best_covered(&self) -> Vec<&str> {
        let Some(max) = self
            .stations
            .values()
            .map(StationCoverage::leaf_count)
            .max()
        else {
            return Vec::new();
        };

        self.stations
            .iter()
            .filter(|(_, coverage)| coverage.leaf_count() == max)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, coverage) in self.stations() {
            write!(f, "{name}:")?;
            for leaf in &coverage.leaves {
                write!(f, "\t{leaf}")?;
            }
            writeln!(f)?;
            writeln!(f, "{name} serves {} leaf node(s)", coverage.leaf_count())?;
            writeln!(f)?;
        }
        write!(f, "best coverage: {}", self.best_covered().join("/"))
    }
}

/// Counts, for each servicing station, the leaf nodes it directly serves.
///
/// The traversal is a deliberate two-hop indirection: for every
/// infrastructure node, for every edge of that node, if the neighbor is
/// itself an infrastructure node, that neighbor's own leaf neighbors are
/// counted. Only infrastructure nodes adjacent to other infrastructure
/// nodes report coverage — a station with no infrastructure neighbor never
/// appears in the report, regardless of how many leaves it serves.
pub fn leaf_coverage(snapshot: &Snapshot) -> CoverageReport {
    let mut stations = BTreeMap::new();

    for (id, node) in snapshot.nodes() {
        if node.role() != NodeRole::Infrastructure {
            continue;
        }
        for (station_id, station) in snapshot.neighbors(id) {
            if station.role() != NodeRole::Infrastructure {
                continue;
            }

            let leaves: Vec<String> = snapshot
                .neighbors(station_id)
                .filter(|(_, peer)| peer.role() == NodeRole::Leaf)
                .map(|(_, peer)| peer.name().to_owned())
                .collect();

            // the same station may be reached from several infrastructure
            // neighbors; the recomputed entry is identical
            stations.insert(station.name().to_owned(), StationCoverage { leaves });
        }
    }

    CoverageReport { stations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{NodeId, Position, SnapshotBuilder};

    fn station_grid(
        stations: usize,
        leaves_per_station: &[usize],
    ) -> (Snapshot, Vec<NodeId>) {
        let mut builder = SnapshotBuilder::new();
        let hub = builder.add_node("hub", NodeRole::Infrastructure, Position::default());
        let mut ids = vec![hub];
        for s in 0..stations {
            let bs = builder.add_node(
                format!("bs{}", s + 1),
                NodeRole::Infrastructure,
                Position::new(s as f64, 0.0),
            );
            builder.connect(hub, bs).unwrap();
            for l in 0..leaves_per_station[s] {
                let leaf = builder.add_node(
                    format!("u{}_{}", s + 1, l + 1),
                    NodeRole::Leaf,
                    Position::new(s as f64, l as f64 + 1.0),
                );
                builder.connect(bs, leaf).unwrap();
            }
            ids.push(bs);
        }
        (builder.build(), ids)
    }

    #[test]
    fn counts_leaves_behind_each_station() {
        // hub ↔ bs1 (1 leaf), hub ↔ bs2 (3 leaves)
        let (snapshot, _) = station_grid(2, &[1, 3]);
        let report = leaf_coverage(&snapshot);

        assert_eq!(report.leaf_count("bs1"), Some(1));
        assert_eq!(report.leaf_count("bs2"), Some(3));
        assert_eq!(report.best_covered(), ["bs2"]);
        assert_eq!(
            report.station("bs2").unwrap().leaves,
            ["u2_1", "u2_2", "u2_3"]
        );
    }

    #[test]
    fn ties_are_all_reported() {
        let (snapshot, _) = station_grid(3, &[2, 1, 2]);
        let report = leaf_coverage(&snapshot);

        assert_eq!(report.best_covered(), ["bs1", "bs3"]);
    }

    #[test]
    fn station_without_infrastructure_neighbor_is_invisible() {
        let mut builder = SnapshotBuilder::new();
        // lone station serving two leaves, but adjacent to no infrastructure
        let bs = builder.add_node("bs1", NodeRole::Infrastructure, Position::default());
        for name in ["u1", "u2"] {
            let leaf = builder.add_node(name, NodeRole::Leaf, Position::new(1.0, 1.0));
            builder.connect(bs, leaf).unwrap();
        }
        let report = leaf_coverage(&builder.build());

        assert_eq!(report.stations().count(), 0);
        assert!(report.best_covered().is_empty());
    }

    #[test]
    fn leaf_to_leaf_edges_do_not_count() {
        let mut builder = SnapshotBuilder::new();
        let hub = builder.add_node("hub", NodeRole::Infrastructure, Position::default());
        let bs = builder.add_node("bs1", NodeRole::Infrastructure, Position::default());
        let u1 = builder.add_node("u1", NodeRole::Leaf, Position::default());
        let u2 = builder.add_node("u2", NodeRole::Leaf, Position::default());
        let other = builder.add_node("sensor", NodeRole::Other, Position::default());
        builder.connect(hub, bs).unwrap();
        builder.connect(bs, u1).unwrap();
        builder.connect(u1, u2).unwrap();
        builder.connect(bs, other).unwrap();

        let report = leaf_coverage(&builder.build());
        // u2 hangs off u1, the sensor is not a leaf: only u1 counts
        assert_eq!(report.leaf_count("bs1"), Some(1));
    }

    #[test]
    fn empty_snapshot_yields_empty_report() {
        let snapshot = SnapshotBuilder::new().build();
        let report = leaf_coverage(&snapshot);
        assert_eq!(report, CoverageReport::default());
    }

    #[test]
    fn render_listing() {
        let (snapshot, _) = station_grid(1, &[2]);
        let text = leaf_coverage(&snapshot).to_string();

        assert!(text.contains("bs1:\tu1_1\tu1_2"));
        assert!(text.contains("bs1 serves 2 leaf node(s)"));
        assert!(text.ends_with("best coverage: bs1"));
    }
}
