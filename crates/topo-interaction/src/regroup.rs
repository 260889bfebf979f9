// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Regrouping protocol: move a node into, out of, or between application
//! groups.
//!
//! Taking a node out of a group it already belongs to is destructive, so that
//! path asks for confirmation. Grouping an ungrouped node proceeds directly.

use topo_app_core::notify::Notifier;
use topo_graph::{GraphOp, NodeId, NodeKind, ResourceRef, TopologyGraph, TopologyNode};
use tracing::{debug, info};

use crate::controller::TopologyController;
use crate::outcome::{MutationError, Outcome};
use crate::ports::{ConfirmRequest, Decision, DialogPort, MutationPort, ResourcePort};

const REGROUP_ERROR: &str = "Error moving component node";

/// Resolved regroup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegroupPlan {
    /// Node being moved.
    pub node: TopologyNode,
    /// Resource behind `node`.
    pub resource: ResourceRef,
    /// Group the node currently sits in.
    pub source_group: Option<TopologyNode>,
    /// Group the node moves to; `None` removes it from its application.
    pub target_group: Option<TopologyNode>,
}

impl RegroupPlan {
    /// Application label written to the resource.
    pub fn application(&self) -> Option<&str> {
        self.target_group.as_ref().map(|g| g.label.as_str())
    }

    /// Confirmation to show before mutating; `None` when the node is ungrouped.
    pub fn confirmation(&self) -> Option<ConfirmRequest> {
        let source = self.source_group.as_ref()?;
        Some(match &self.target_group {
            Some(target) => ConfirmRequest {
                title: "Move component node".into(),
                message: format!(
                    "Are you sure you want to move {} from {} to {}?",
                    self.node.label, source.label, target.label
                ),
                confirm_label: "Move".into(),
            },
            None => ConfirmRequest {
                title: "Remove component node from application".into(),
                message: format!(
                    "Are you sure you want to remove {} from {}?",
                    self.node.label, source.label
                ),
                confirm_label: "Remove".into(),
            },
        })
    }
}

/// Resolve a move of `node` into `target` (`None` = out of any group).
///
/// `Ok(None)` means there is nothing to do: the node already sits there, or the
/// target is not a group the node may enter.
pub fn plan_regroup(
    graph: &TopologyGraph,
    resources: &dyn ResourcePort,
    node: &NodeId,
    target: Option<&NodeId>,
) -> Result<Option<RegroupPlan>, MutationError> {
    let current = graph
        .node(node)
        .ok_or_else(|| MutationError::UnknownNode(node.clone()))?;
    if current.parent.as_ref() == target {
        return Ok(None);
    }
    let target_group = match target {
        None => None,
        Some(id) => {
            let group = graph
                .node(id)
                .ok_or_else(|| MutationError::UnknownNode(id.clone()))?;
            if group.kind != NodeKind::ApplicationGroup
                || id == node
                || graph.is_descendant_of(id, node)
            {
                return Ok(None);
            }
            Some(group.clone())
        }
    };
    let resource = resources
        .resource_of(current)
        .ok_or_else(|| MutationError::MissingResource(node.clone()))?;
    Ok(Some(RegroupPlan {
        node: current.clone(),
        resource,
        source_group: graph.parent(node).cloned(),
        target_group,
    }))
}

impl<M, D, N> TopologyController<M, D, N>
where
    M: MutationPort,
    D: DialogPort,
    N: Notifier,
{
    /// Move `node` into `target` (`None` removes it from its application).
    ///
    /// `Cancelled` when there is nothing to do or the user declines.
    pub async fn move_node_to_group(&mut self, node: &NodeId, target: Option<&NodeId>) -> Outcome<()> {
        let planned = plan_regroup(&self.graph.read(), self.resources.as_ref(), node, target);
        let plan = match planned {
            Ok(Some(plan)) => plan,
            Ok(None) => {
                debug!(%node, ?target, "regroup is a no-op");
                return Outcome::Cancelled;
            }
            Err(err) => return self.fail(REGROUP_ERROR, err),
        };

        if let Some(request) = plan.confirmation() {
            if self.dialogs.confirm(request).await == Decision::Declined {
                info!(%node, "regroup declined");
                return Outcome::Cancelled;
            }
        }

        info!(%node, application = ?plan.application(), "updating application");
        let updated = self
            .mutations
            .update_application(&plan.resource, plan.application())
            .await;
        match updated {
            Ok(()) => {
                self.graph.apply_optimistic(vec![GraphOp::Reparent {
                    id: node.clone(),
                    parent: target.cloned(),
                }]);
                Outcome::Done(())
            }
            Err(err) => self.fail(REGROUP_ERROR, err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::NodeResources;

    fn add(g: &mut TopologyGraph, id: &str, kind: NodeKind, parent: Option<&str>) {
        g.apply_op(GraphOp::AddNode(TopologyNode {
            id: id.into(),
            kind,
            label: id.to_uppercase(),
            parent: parent.map(NodeId::from),
            resource: Some(ResourceRef {
                api_group: "apps".into(),
                api_version: "v1".into(),
                kind: "Deployment".into(),
                name: id.into(),
                namespace: "demo".into(),
            }),
        }))
        .unwrap();
    }

    fn graph() -> TopologyGraph {
        let mut g = TopologyGraph::new();
        add(&mut g, "g1", NodeKind::ApplicationGroup, None);
        add(&mut g, "g2", NodeKind::ApplicationGroup, None);
        add(&mut g, "w", NodeKind::Workload, Some("g1"));
        add(&mut g, "loose", NodeKind::Workload, None);
        g
    }

    #[test]
    fn moving_between_groups_names_both() {
        let g = graph();
        let plan = plan_regroup(&g, &NodeResources, &"w".into(), Some(&"g2".into()))
            .unwrap()
            .unwrap();
        assert_eq!(plan.application(), Some("G2"));
        let confirm = plan.confirmation().unwrap();
        assert_eq!(confirm.title, "Move component node");
        assert!(confirm.message.contains("G1") && confirm.message.contains("G2"));
    }

    #[test]
    fn removal_uses_its_own_title() {
        let g = graph();
        let plan = plan_regroup(&g, &NodeResources, &"w".into(), None)
            .unwrap()
            .unwrap();
        assert_eq!(plan.application(), None);
        assert_eq!(
            plan.confirmation().unwrap().title,
            "Remove component node from application"
        );
    }

    #[test]
    fn ungrouped_nodes_need_no_confirmation() {
        let g = graph();
        let plan = plan_regroup(&g, &NodeResources, &"loose".into(), Some(&"g1".into()))
            .unwrap()
            .unwrap();
        assert!(plan.confirmation().is_none());
    }

    #[test]
    fn same_group_and_non_groups_are_no_ops() {
        let g = graph();
        assert!(plan_regroup(&g, &NodeResources, &"w".into(), Some(&"g1".into()))
            .unwrap()
            .is_none());
        assert!(plan_regroup(&g, &NodeResources, &"loose".into(), None)
            .unwrap()
            .is_none());
        assert!(plan_regroup(&g, &NodeResources, &"w".into(), Some(&"loose".into()))
            .unwrap()
            .is_none());
        assert_eq!(
            plan_regroup(&g, &NodeResources, &"nope".into(), None),
            Err(MutationError::UnknownNode("nope".into()))
        );
    }
}
