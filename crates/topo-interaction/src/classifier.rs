// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drag operation classifier.
//!
//! Runs once at drag-begin. The result is stored in the
//! [`DragSession`](crate::gesture::DragSession) and never recomputed, so
//! pressing or releasing a modifier mid-drag cannot flip the operation.

use topo_graph::{NodeKind, TopologyGraph, TopologyNode};

use crate::gesture::{DragSubject, GestureContext};
use crate::operation::OperationDescriptor;
use crate::ports::{AccessPort, ResourcePort, Verb};

/// Node kinds that can be moved between application groups.
pub fn is_regroupable(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Workload | NodeKind::KnativeService | NodeKind::EventSource
    )
}

/// True when the user may patch the resource behind `node`.
pub fn can_edit(node: &TopologyNode, resources: &dyn ResourcePort, access: &dyn AccessPort) -> bool {
    resources
        .resource_of(node)
        .is_some_and(|r| access.has_access(&r.model(), &r, Verb::Patch))
}

/// Classify a drag on `subject`. `None` means a plain move with no commit on drop.
pub fn classify(
    graph: &TopologyGraph,
    subject: &DragSubject,
    ctx: &GestureContext,
    resources: &dyn ResourcePort,
    access: &dyn AccessPort,
) -> Option<OperationDescriptor> {
    match subject {
        DragSubject::Node(id) => {
            let node = graph.node(id)?;
            if !is_regroupable(&node.kind) || !can_edit(node, resources, access) {
                return None;
            }
            ctx.regroup_requested()
                .then(OperationDescriptor::regroup)
        }
        DragSubject::ConnectorHandle(id) => {
            let node = graph.node(id)?;
            can_edit(node, resources, access).then(OperationDescriptor::create_connector)
        }
        DragSubject::EdgeEndpoint(id) => graph
            .edge(id)
            .map(|edge| OperationDescriptor::move_connector(edge.id.clone())),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gesture::Modifiers;
    use crate::operation::OperationKind;
    use crate::ports::{AllowAll, NodeResources};
    use topo_app_core::prefs::ModifierKey;
    use topo_graph::{
        EdgeKind, GraphOp, NodeId, ResourceModel, ResourceRef, TopologyEdge,
    };

    struct DenyAll;

    impl AccessPort for DenyAll {
        fn has_access(&self, _: &ResourceModel, _: &ResourceRef, _: Verb) -> bool {
            false
        }
    }

    fn node(id: &str, kind: NodeKind) -> TopologyNode {
        TopologyNode {
            id: id.into(),
            kind,
            label: id.into(),
            parent: None,
            resource: Some(ResourceRef {
                api_group: "apps".into(),
                api_version: "v1".into(),
                kind: "Deployment".into(),
                name: id.into(),
                namespace: "demo".into(),
            }),
        }
    }

    fn graph() -> TopologyGraph {
        let mut g = TopologyGraph::new();
        g.apply_op(GraphOp::AddNode(node("w", NodeKind::Workload))).unwrap();
        g.apply_op(GraphOp::AddNode(node("op", NodeKind::OperatorBackedService)))
            .unwrap();
        g.apply_op(GraphOp::AddEdge(TopologyEdge::new(
            EdgeKind::ConnectsTo,
            "w".into(),
            "op".into(),
        )))
        .unwrap();
        g
    }

    fn shift() -> GestureContext {
        GestureContext::new(Modifiers::only(ModifierKey::Shift), ModifierKey::Shift)
    }

    #[test]
    fn regroup_needs_modifier_and_edit_access() {
        let g = graph();
        let subject = DragSubject::Node(NodeId::from("w"));
        let op = classify(&g, &subject, &shift(), &NodeResources, &AllowAll).unwrap();
        assert_eq!(op.kind, OperationKind::Regroup);
        assert!(op.edit);

        let plain = GestureContext::new(Modifiers::NONE, ModifierKey::Shift);
        assert!(classify(&g, &subject, &plain, &NodeResources, &AllowAll).is_none());
        assert!(classify(&g, &subject, &shift(), &NodeResources, &DenyAll).is_none());
    }

    #[test]
    fn non_regroupable_kinds_stay_plain() {
        let g = graph();
        let subject = DragSubject::Node(NodeId::from("op"));
        assert!(classify(&g, &subject, &shift(), &NodeResources, &AllowAll).is_none());
    }

    #[test]
    fn edge_endpoints_always_move_connectors() {
        let g = graph();
        let edge = g.edges().next().unwrap().id.clone();
        let subject = DragSubject::EdgeEndpoint(edge.clone());
        let plain = GestureContext::new(Modifiers::NONE, ModifierKey::Shift);
        let op = classify(&g, &subject, &plain, &NodeResources, &DenyAll).unwrap();
        assert_eq!(op, OperationDescriptor::move_connector(edge));
    }

    #[test]
    fn connector_handle_requires_access() {
        let g = graph();
        let subject = DragSubject::ConnectorHandle(NodeId::from("w"));
        let plain = GestureContext::new(Modifiers::NONE, ModifierKey::Shift);
        assert_eq!(
            classify(&g, &subject, &plain, &NodeResources, &AllowAll).map(|o| o.kind),
            Some(OperationKind::CreateConnector)
        );
        assert!(classify(&g, &subject, &plain, &NodeResources, &DenyAll).is_none());
    }
}
