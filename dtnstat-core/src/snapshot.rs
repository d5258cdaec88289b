//! Read-only view over the network's connectivity at one instant.
//!
//! The simulation materializes a [`Snapshot`] at finalization time through a
//! [`SnapshotBuilder`]; once built it is immutable, and the analyzers
//! ([`leaf_coverage`](crate::coverage::leaf_coverage),
//! [`edge_rates`](crate::rate::edge_rates)) only ever read from it.

use std::fmt;
use thiserror::Error;

/// Role a node plays in the topology.
///
/// An explicit capability enum rather than a free-form group tag, so the
/// analyzers never depend on string equality against `"core"`/`"user"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// A fixed serving node (base station, relay tower, ...).
    Infrastructure,
    /// An end-user node served by the infrastructure.
    Leaf,
    /// Anything else; ignored by the coverage and rate analyzers.
    Other,
}

/// A 2-D position in the simulation's world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// The identifier of a node within one [`Snapshot`].
///
/// Assigned by [`SnapshotBuilder::add_node`]; only meaningful for the
/// snapshot that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One node of the connectivity snapshot.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    role: NodeRole,
    position: Position,
    /// Active bidirectional edges, as peer ids.
    neighbors: Vec<NodeId>,
}

impl Node {
    /// The node's name (`"bs106"`, `"user1"`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's role in the topology.
    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// The node's position at the snapshot instant.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Ids of the nodes this node has an active edge to.
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }
}

/// Error returned when a [`SnapshotBuilder`] edge references an unknown or
/// invalid node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The node id was not produced by this builder.
    #[error("node ({id}) not found in the snapshot under construction")]
    NodeNotFound { id: NodeId },
    /// Both endpoints of the edge are the same node.
    #[error("node ({id}) cannot be connected to itself")]
    SelfEdge { id: NodeId },
}

/// Builder assembling a [`Snapshot`].
///
/// ## Example
///
/// ```
/// use dtnstat_core::{NodeRole, Position, SnapshotBuilder};
///
/// let mut builder = SnapshotBuilder::new();
/// let bs1 = builder.add_node("bs1", NodeRole::Infrastructure, Position::new(0.0, 0.0));
/// let u1 = builder.add_node("u1", NodeRole::Leaf, Position::new(3.0, 4.0));
/// builder.connect(bs1, u1).unwrap();
///
/// let snapshot = builder.build();
/// assert_eq!(snapshot.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    nodes: Vec<Node>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node and returns its id.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        role: NodeRole,
        position: Position,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            role,
            position,
            neighbors: Vec::new(),
        });
        id
    }

    /// Records an active bidirectional edge between `a` and `b`.
    ///
    /// Connecting the same pair twice is a no-op.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<(), SnapshotError> {
        if a == b {
            return Err(SnapshotError::SelfEdge { id: a });
        }
        for id in [a, b] {
            if id.0 >= self.nodes.len() {
                return Err(SnapshotError::NodeNotFound { id });
            }
        }

        if !self.nodes[a.0].neighbors.contains(&b) {
            self.nodes[a.0].neighbors.push(b);
            self.nodes[b.0].neighbors.push(a);
        }

        Ok(())
    }

    /// Finalizes the snapshot. No mutation is possible afterwards.
    pub fn build(self) -> Snapshot {
        Snapshot { nodes: self.nodes }
    }
}

/// The network's connectivity at one simulation instant.
///
/// Valid only for that instant: positions and edges are whatever the
/// simulation computed at the moment of finalization.
#[derive(Debug, Clone)]
pub struct Snapshot {
    nodes: Vec<Node>,
}

impl Snapshot {
    /// Number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes with their ids, in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// The node with the given id, if it belongs to this snapshot.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Looks a node up by name.
    pub fn node_by_name(&self, name: &str) -> Option<(NodeId, &Node)> {
        self.nodes().find(|(_, node)| node.name() == name)
    }

    /// Iterates over the neighbors of `id` as `(NodeId, &Node)` pairs.
    ///
    /// Yields nothing for an id that does not belong to this snapshot.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        self.node(id)
            .map(|node| node.neighbors())
            .unwrap_or_default()
            .iter()
            .filter_map(|&peer| self.node(peer).map(|node| (peer, node)))
    }
}
