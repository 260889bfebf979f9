// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Operation descriptors produced by the drag classifier.

use serde::{Deserialize, Serialize};
use topo_graph::{EdgeId, NodeId, TopologyGraph};

use crate::edge_rules::rule_for;
use crate::validator;

/// What a drag means once dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    /// Reposition only; nothing is committed on drop.
    PlainMove,
    /// Move a node into, out of, or between application groups.
    Regroup,
    /// Re-point an existing connector at another node.
    MoveConnector,
    /// Draw a new connector from a node.
    CreateConnector,
}

/// Immutable description of the in-progress drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Operation kind.
    pub kind: OperationKind,
    /// When set, the UI dims drop targets that reject this operation.
    pub edit: bool,
    /// Edge being moved, for [`OperationKind::MoveConnector`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeId>,
}

impl OperationDescriptor {
    /// Descriptor for a non-semantic drag.
    pub fn plain_move() -> Self {
        Self {
            kind: OperationKind::PlainMove,
            edit: false,
            edge: None,
        }
    }

    /// Descriptor for a regroup drag.
    pub fn regroup() -> Self {
        Self {
            kind: OperationKind::Regroup,
            edit: true,
            edge: None,
        }
    }

    /// Descriptor for dragging the target end of `edge`.
    pub fn move_connector(edge: EdgeId) -> Self {
        Self {
            kind: OperationKind::MoveConnector,
            edit: true,
            edge: Some(edge),
        }
    }

    /// Descriptor for drawing a new connector.
    pub fn create_connector() -> Self {
        Self {
            kind: OperationKind::CreateConnector,
            edit: true,
            edge: None,
        }
    }

    /// Drop predicate for node targets while moving a connector.
    /// Always true for other operations; their validity is decided per target kind.
    ///
    /// Edges whose kind cannot move only accept a re-drop on their current target.
    pub fn can_drop_on_node(&self, graph: &TopologyGraph, candidate: &NodeId) -> bool {
        match (&self.kind, &self.edge) {
            (OperationKind::MoveConnector, Some(edge_id)) => graph.edge(edge_id).is_some_and(|edge| {
                &edge.target == candidate
                    || (rule_for(&edge.kind).can_move
                        && validator::can_drop_edge_on_node(self.kind, graph, edge, candidate))
            }),
            _ => true,
        }
    }
}
