// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drop target validation.
//!
//! Called on every pointer move while dragging. Everything here is pure and
//! uses the graph's adjacency/containment indexes: a check costs at most the
//! source's out-degree or the containment depth.

use serde::{Deserialize, Serialize};
use topo_graph::{NodeId, NodeKind, TopologyEdge, TopologyGraph};

use crate::gesture::{DragSession, DragSubject, DropTarget};
use crate::operation::{OperationDescriptor, OperationKind};

/// Visual affordance for a drop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DropCandidate {
    /// The zone accepts the dragged element.
    pub can_drop: bool,
    /// The pointer is over the zone.
    pub is_over_target: bool,
}

/// Can `edge` be dropped on `candidate`?
///
/// Never onto its own source; always back onto its current target when moving
/// a connector; otherwise only where the source has no edge yet.
pub fn can_drop_edge_on_node(
    kind: OperationKind,
    graph: &TopologyGraph,
    edge: &TopologyEdge,
    candidate: &NodeId,
) -> bool {
    if candidate == &edge.source {
        return false;
    }
    if candidate == &edge.target && kind == OperationKind::MoveConnector {
        return true;
    }
    !graph.has_edge_between(&edge.source, candidate)
}

/// Can a connector drawn from `dragged` end on `candidate`?
pub fn can_create_connector(graph: &TopologyGraph, dragged: &NodeId, candidate: &NodeId) -> bool {
    if dragged == candidate {
        return false;
    }
    let Some(node) = graph.node(candidate) else {
        return false;
    };
    if node.kind == NodeKind::EventSource || node.kind == NodeKind::ApplicationGroup {
        return false;
    }
    !graph.has_edge_between(dragged, candidate)
}

/// Can `node` be regrouped into `target` (`None` = graph root)?
pub fn can_regroup(
    operation: &OperationDescriptor,
    graph: &TopologyGraph,
    node: &NodeId,
    target: Option<&NodeId>,
) -> bool {
    if operation.kind != OperationKind::Regroup {
        return false;
    }
    let Some(current) = graph.node(node) else {
        return false;
    };
    if current.parent.as_ref() == target {
        return false;
    }
    match target {
        None => true,
        Some(group) => {
            group != node
                && graph
                    .node(group)
                    .is_some_and(|g| g.kind == NodeKind::ApplicationGroup)
                && !graph.is_descendant_of(group, node)
        }
    }
}

/// Does `target` accept the drag described by `subject` + `operation`?
pub fn accepts(
    graph: &TopologyGraph,
    subject: &DragSubject,
    operation: &OperationDescriptor,
    target: &DropTarget,
) -> bool {
    match (operation.kind, subject, target) {
        (OperationKind::Regroup, DragSubject::Node(node), DropTarget::Group(group)) => {
            can_regroup(operation, graph, node, Some(group))
        }
        (OperationKind::Regroup, DragSubject::Node(node), DropTarget::Graph) => {
            can_regroup(operation, graph, node, None)
        }
        (OperationKind::CreateConnector, DragSubject::ConnectorHandle(source), DropTarget::Node(candidate)) => {
            can_create_connector(graph, source, candidate)
        }
        (OperationKind::CreateConnector, DragSubject::ConnectorHandle(source), DropTarget::Group(group)) => {
            // Dropping on the group the source already sits in still opens the menu.
            source != group && graph.contains_node(group)
        }
        (OperationKind::CreateConnector, DragSubject::ConnectorHandle(_), DropTarget::Graph) => true,
        (OperationKind::MoveConnector, _, DropTarget::Node(candidate)) => {
            operation.can_drop_on_node(graph, candidate)
        }
        _ => false,
    }
}

/// Affordance for `target` given the current session.
pub fn drop_candidate(
    graph: &TopologyGraph,
    session: Option<&DragSession>,
    target: &DropTarget,
) -> DropCandidate {
    let Some(session) = session else {
        return DropCandidate::default();
    };
    DropCandidate {
        can_drop: accepts(graph, session.subject(), session.operation(), target),
        is_over_target: session.hovered() == Some(target),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use topo_graph::{EdgeKind, GraphOp, TopologyNode};

    fn add(g: &mut TopologyGraph, id: &str, kind: NodeKind, parent: Option<&str>) {
        g.apply_op(GraphOp::AddNode(TopologyNode {
            id: id.into(),
            kind,
            label: id.into(),
            parent: parent.map(NodeId::from),
            resource: None,
        }))
        .unwrap();
    }

    fn graph() -> TopologyGraph {
        let mut g = TopologyGraph::new();
        add(&mut g, "g1", NodeKind::ApplicationGroup, None);
        add(&mut g, "g2", NodeKind::ApplicationGroup, None);
        add(&mut g, "a", NodeKind::Workload, Some("g1"));
        add(&mut g, "b", NodeKind::Workload, None);
        add(&mut g, "c", NodeKind::Workload, None);
        add(&mut g, "src", NodeKind::EventSource, None);
        g.apply_op(GraphOp::AddEdge(TopologyEdge::new(
            EdgeKind::ConnectsTo,
            "a".into(),
            "b".into(),
        )))
        .unwrap();
        g
    }

    fn ab(g: &TopologyGraph) -> TopologyEdge {
        g.find_edge(&"a".into(), &"b".into(), &EdgeKind::ConnectsTo)
            .cloned()
            .unwrap()
    }

    #[test]
    fn edge_rules_for_source_target_and_duplicates() {
        let g = graph();
        let e = ab(&g);
        let mv = OperationKind::MoveConnector;
        assert!(!can_drop_edge_on_node(mv, &g, &e, &"a".into()));
        assert!(can_drop_edge_on_node(mv, &g, &e, &"b".into()));
        assert!(can_drop_edge_on_node(mv, &g, &e, &"c".into()));
        // Any other operation treats the current target as a duplicate.
        assert!(!can_drop_edge_on_node(OperationKind::CreateConnector, &g, &e, &"b".into()));
    }

    #[test]
    fn create_connector_rejects_self_duplicates_and_event_sources() {
        let g = graph();
        assert!(!can_create_connector(&g, &"a".into(), &"a".into()));
        assert!(!can_create_connector(&g, &"a".into(), &"b".into()));
        assert!(!can_create_connector(&g, &"a".into(), &"src".into()));
        assert!(can_create_connector(&g, &"a".into(), &"c".into()));
        // Reverse direction is not a duplicate.
        assert!(can_create_connector(&g, &"b".into(), &"a".into()));
    }

    #[test]
    fn regroup_requires_a_different_parent() {
        let g = graph();
        let op = OperationDescriptor::regroup();
        assert!(!can_regroup(&op, &g, &"a".into(), Some(&"g1".into())));
        assert!(can_regroup(&op, &g, &"a".into(), Some(&"g2".into())));
        assert!(can_regroup(&op, &g, &"a".into(), None));
        assert!(!can_regroup(&op, &g, &"b".into(), None));
        assert!(!can_regroup(&op, &g, &"b".into(), Some(&"c".into())));
        assert!(!can_regroup(
            &OperationDescriptor::create_connector(),
            &g,
            &"a".into(),
            Some(&"g2".into())
        ));
    }

    #[test]
    fn regroup_never_nests_a_group_in_itself() {
        let mut g = graph();
        add(&mut g, "inner", NodeKind::ApplicationGroup, Some("g1"));
        let op = OperationDescriptor::regroup();
        assert!(!can_regroup(&op, &g, &"g1".into(), Some(&"g1".into())));
        assert!(!can_regroup(&op, &g, &"g1".into(), Some(&"inner".into())));
    }

    #[test]
    fn plain_moves_accept_nothing() {
        let g = graph();
        let op = OperationDescriptor::plain_move();
        let subject = DragSubject::Node("b".into());
        for target in [
            DropTarget::Graph,
            DropTarget::Group("g1".into()),
            DropTarget::Node("c".into()),
        ] {
            assert!(!accepts(&g, &subject, &op, &target));
        }
    }
}
