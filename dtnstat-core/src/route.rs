//! Route hypothesis between two endpoints from their visitation history.
//!
//! The simulation records, for each endpoint of interest, the set of
//! infrastructure stations the endpoint has been connected to at any point
//! during the run. [`infer_route`] intersects the two sets to guess the
//! station sequence a message between the endpoints travelled through. This
//! is inference, not ground truth — the result is named a *hypothesis*
//! accordingly.

use std::{collections::BTreeSet, fmt};

/// Visitation history of one endpoint.
///
/// Owned and populated by the simulation during the run; read-only to this
/// crate at finalization. The ordered set gives every enumeration a
/// deterministic, documented order (ascending station id).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteHints {
    endpoint: String,
    visited: BTreeSet<u32>,
}

impl RouteHints {
    /// Creates an empty history for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            visited: BTreeSet::new(),
        }
    }

    /// Records that the endpoint was connected to station `station`.
    pub fn record(&mut self, station: u32) {
        self.visited.insert(station);
    }

    /// The endpoint's name.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The stations the endpoint has visited, in ascending id order.
    pub fn visited(&self) -> &BTreeSet<u32> {
        &self.visited
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

/// The inferred route between two endpoints.
///
/// Produced by [`infer_route`]; the [`fmt::Display`] implementation renders
/// the `a->bs1/bs2->b` report text, with station ids carrying the `bs`
/// prefix downstream consumers expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteHypothesis {
    /// At least one endpoint never touched any station: nothing to infer.
    NoRoute { a: String, b: String },
    /// The endpoints share stations: the most likely path runs through the
    /// intersection, with a secondary hypothesis through each endpoint's
    /// remaining (non-shared) stations.
    Shared {
        a: String,
        b: String,
        /// Stations both endpoints visited, ascending.
        common: Vec<u32>,
        /// A's stations outside the intersection, ascending.
        alt_a: Vec<u32>,
        /// B's stations outside the intersection, ascending.
        alt_b: Vec<u32>,
    },
    /// No station in common: two independent single-hop enumerations.
    Disjoint {
        a: String,
        b: String,
        via_a: Vec<u32>,
        via_b: Vec<u32>,
    },
}

/// Computes the route hypothesis between endpoints `a` and `b`.
///
/// - either history empty → [`RouteHypothesis::NoRoute`];
/// - non-empty intersection → [`RouteHypothesis::Shared`];
/// - empty intersection → [`RouteHypothesis::Disjoint`], listing each side's
///   full history (the degenerate form of the "stations outside the
///   intersection" fallback).
pub fn infer_route(a: &RouteHints, b: &RouteHints) -> RouteHypothesis {
    if a.is_empty() || b.is_empty() {
        return RouteHypothesis::NoRoute {
            a: a.endpoint().to_owned(),
            b: b.endpoint().to_owned(),
        };
    }

    let common: Vec<u32> = a.visited().intersection(b.visited()).copied().collect();

    if common.is_empty() {
        RouteHypothesis::Disjoint {
            a: a.endpoint().to_owned(),
            b: b.endpoint().to_owned(),
            via_a: a.visited().iter().copied().collect(),
            via_b: b.visited().iter().copied().collect(),
        }
    } else {
        let shared: BTreeSet<u32> = common.iter().copied().collect();
        RouteHypothesis::Shared {
            a: a.endpoint().to_owned(),
            b: b.endpoint().to_owned(),
            alt_a: a.visited().difference(&shared).copied().collect(),
            alt_b: b.visited().difference(&shared).copied().collect(),
            common,
        }
    }
}

/// `"/"`-joined `bs`-prefixed station listing (`"bs1/bs4"`).
fn stations(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| format!("bs{id}"))
        .collect::<Vec<_>>()
        .join("/")
}

impl fmt::Display for RouteHypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoute { a, b } => {
                write!(f, "station sequence between {a} and {b}: no route")
            }
            Self::Shared {
                a,
                b,
                common,
                alt_a,
                alt_b,
            } => {
                write!(
                    f,
                    "station sequence between {a} and {b}\nmost likely: {a}->{}->{b}",
                    stations(common)
                )?;
                if !alt_a.is_empty() || !alt_b.is_empty() {
                    let mut hops = vec![a.as_str().to_owned()];
                    if !alt_a.is_empty() {
                        hops.push(stations(alt_a));
                    }
                    if !alt_b.is_empty() {
                        hops.push(stations(alt_b));
                    }
                    hops.push(b.clone());
                    write!(f, "\nalternatively: {}", hops.join("->"))?;
                }
                Ok(())
            }
            Self::Disjoint { a, b, via_a, via_b } => {
                write!(
                    f,
                    "station sequence between {a} and {b}\npossibly: {a}->{}->{}->{b}",
                    stations(via_a),
                    stations(via_b)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(endpoint: &str, visited: &[u32]) -> RouteHints {
        let mut hints = RouteHints::new(endpoint);
        for &station in visited {
            hints.record(station);
        }
        hints
    }

    #[test]
    fn shared_station_gives_single_path() {
        let a = hints("user1", &[1, 2]);
        let b = hints("user10", &[2, 3]);

        let hypothesis = infer_route(&a, &b);
        assert_eq!(
            hypothesis,
            RouteHypothesis::Shared {
                a: "user1".into(),
                b: "user10".into(),
                common: vec![2],
                alt_a: vec![1],
                alt_b: vec![3],
            }
        );
        let text = hypothesis.to_string();
        assert!(text.contains("most likely: user1->bs2->user10"));
        assert!(text.contains("alternatively: user1->bs1->bs3->user10"));
    }

    #[test]
    fn identical_histories_have_no_alternative() {
        let a = hints("user1", &[4]);
        let b = hints("user10", &[4]);

        let text = infer_route(&a, &b).to_string();
        assert!(text.contains("most likely: user1->bs4->user10"));
        assert!(!text.contains("alternatively"));
    }

    #[test]
    fn disjoint_histories_give_two_listings() {
        let a = hints("user1", &[1]);
        let b = hints("user10", &[3]);

        let hypothesis = infer_route(&a, &b);
        assert_eq!(
            hypothesis,
            RouteHypothesis::Disjoint {
                a: "user1".into(),
                b: "user10".into(),
                via_a: vec![1],
                via_b: vec![3],
            }
        );
        assert!(hypothesis
            .to_string()
            .contains("possibly: user1->bs1->bs3->user10"));
    }

    #[test]
    fn multiple_disjoint_stations_are_slash_joined() {
        let a = hints("user1", &[5, 1]);
        let b = hints("user10", &[7, 3]);

        // BTreeSet ordering: ascending, regardless of record() order
        assert!(infer_route(&a, &b)
            .to_string()
            .contains("user1->bs1/bs5->bs3/bs7->user10"));
    }

    #[test]
    fn empty_history_means_no_route() {
        let a = hints("user1", &[]);
        let b = hints("user10", &[1, 2]);

        let hypothesis = infer_route(&a, &b);
        assert_eq!(
            hypothesis,
            RouteHypothesis::NoRoute {
                a: "user1".into(),
                b: "user10".into(),
            }
        );
        assert!(hypothesis.to_string().ends_with("no route"));

        // symmetric: B empty means no route as well
        assert!(matches!(
            infer_route(&b, &a),
            RouteHypothesis::NoRoute { .. }
        ));
    }
}
