// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-edge-kind behaviour table.
//!
//! Every "can this edge be moved / deleted / pointed at that node" question is
//! answered here, keyed by [`EdgeKind`], so callers never compare type tags.

use topo_graph::{EdgeKind, NodeId, TopologyEdge, TopologyGraph};

/// Which nodes an edge may be re-pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFilter {
    /// The edge cannot be re-pointed.
    Fixed,
    /// Any node not already connected from the edge's source.
    Unconnected,
    /// Any node.
    Any,
}

/// Behaviour of one edge kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRule {
    /// The target end can be dragged and the "Move Connector" action offered.
    pub can_move: bool,
    /// The "Delete Connector" action is offered.
    pub can_delete: bool,
    /// Move-target filter.
    pub targets: TargetFilter,
}

const CONNECTS_TO: EdgeRule = EdgeRule {
    can_move: true,
    can_delete: true,
    targets: TargetFilter::Unconnected,
};

const SERVICE_BINDING: EdgeRule = EdgeRule {
    can_move: false,
    can_delete: true,
    targets: TargetFilter::Fixed,
};

const DERIVED: EdgeRule = EdgeRule {
    can_move: false,
    can_delete: false,
    targets: TargetFilter::Fixed,
};

const GENERIC: EdgeRule = EdgeRule {
    can_move: true,
    can_delete: false,
    targets: TargetFilter::Any,
};

/// Rule for `kind`.
pub fn rule_for(kind: &EdgeKind) -> &'static EdgeRule {
    match kind {
        EdgeKind::ConnectsTo => &CONNECTS_TO,
        EdgeKind::ServiceBinding => &SERVICE_BINDING,
        EdgeKind::EventSourceLink | EdgeKind::TrafficConnector | EdgeKind::AggregateEdge => {
            &DERIVED
        }
        EdgeKind::Other(_) => &GENERIC,
    }
}

impl EdgeRule {
    /// True when `candidate` is an acceptable new target for `edge`.
    /// The edge's current target is always acceptable for movable kinds.
    pub fn offers_target(
        &self,
        graph: &TopologyGraph,
        edge: &TopologyEdge,
        candidate: &NodeId,
    ) -> bool {
        if candidate == &edge.source {
            return false;
        }
        match self.targets {
            TargetFilter::Fixed => false,
            TargetFilter::Any => true,
            TargetFilter::Unconnected => {
                candidate == &edge.target || !graph.has_edge_between(&edge.source, candidate)
            }
        }
    }
}
