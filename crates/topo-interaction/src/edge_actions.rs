// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Edge context menu: building the actions and running them.

use serde::Serialize;
use topo_app_core::notify::Notifier;
use topo_graph::{EdgeId, GraphOp, NodeId, NodeKind, ResourceRef, TopologyEdge, TopologyGraph};
use tracing::{debug, info};

use crate::controller::{GestureEffect, TopologyController};
use crate::edge_rules::rule_for;
use crate::operation::OperationKind;
use crate::outcome::{MutationError, Outcome};
use crate::ports::{
    AccessReview, ConfirmRequest, Decision, DialogPort, MutationPort, ResourcePort, Verb,
};
use crate::validator;

const MOVE_ERROR: &str = "Error moving connection";
const DELETE_ERROR: &str = "Error deleting connection";

/// What a context-menu entry does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeAction {
    /// Open the move dialog seeded with these targets.
    MoveConnector {
        /// Edge to move.
        edge: EdgeId,
        /// Nodes the edge may point at, current target included.
        targets: Vec<NodeId>,
    },
    /// Confirm, then delete the connection.
    DeleteConnector {
        /// Edge to delete.
        edge: EdgeId,
    },
}

/// One entry of an edge's context menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    /// Stable identifier.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Review the UI evaluates to hide or disable the entry.
    pub access_review: Option<AccessReview>,
    /// What selecting the entry does.
    pub action: EdgeAction,
}

/// Nodes `edge` may be re-pointed at, sorted by label then id.
///
/// Excludes the source, event sources, groups, and whatever the edge kind's
/// rule forbids. The current target is included whenever the kind can move.
pub fn available_targets(graph: &TopologyGraph, edge: &TopologyEdge) -> Vec<NodeId> {
    let rule = rule_for(&edge.kind);
    let mut targets: Vec<_> = graph
        .nodes()
        .filter(|n| n.kind != NodeKind::EventSource && !n.kind.is_group())
        .filter(|n| rule.offers_target(graph, edge, &n.id))
        .collect();
    targets.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
    targets.into_iter().map(|n| n.id.clone()).collect()
}

/// Context-menu actions for `edge`.
pub fn edge_actions(
    graph: &TopologyGraph,
    edge: &TopologyEdge,
    resources: &dyn ResourcePort,
) -> Vec<ActionItem> {
    let rule = rule_for(&edge.kind);
    let review = graph
        .node(&edge.source)
        .and_then(|n| resources.resource_of(n))
        .map(|r| AccessReview::for_resource(&r, Verb::Delete));

    let mut items = Vec::new();
    if rule.can_move {
        let targets = available_targets(graph, edge);
        if targets.len() > 1 {
            items.push(ActionItem {
                id: "move-connector",
                label: "Move Connector",
                access_review: review.clone(),
                action: EdgeAction::MoveConnector {
                    edge: edge.id.clone(),
                    targets,
                },
            });
        }
    }
    if rule.can_delete {
        items.push(ActionItem {
            id: "delete-connector",
            label: "Delete Connector",
            access_review: review,
            action: EdgeAction::DeleteConnector {
                edge: edge.id.clone(),
            },
        });
    }
    items
}

struct Endpoints {
    edge: TopologyEdge,
    source: ResourceRef,
    target: ResourceRef,
}

impl<M, D, N> TopologyController<M, D, N> {
    /// Context-menu actions for the edge `id`; empty when it is gone.
    pub fn edge_actions(&self, id: &EdgeId) -> Vec<ActionItem> {
        let graph = self.graph.read();
        graph
            .edge(id)
            .map(|edge| edge_actions(&graph, edge, self.resources.as_ref()))
            .unwrap_or_default()
    }

    fn node_resource(&self, id: &NodeId) -> Result<ResourceRef, MutationError> {
        let graph = self.graph.read();
        let node = graph
            .node(id)
            .ok_or_else(|| MutationError::UnknownNode(id.clone()))?;
        self.resource(node)
    }

    fn endpoints(&self, id: &EdgeId) -> Result<Endpoints, MutationError> {
        let edge = self
            .graph
            .read()
            .edge(id)
            .cloned()
            .ok_or_else(|| MutationError::UnknownEdge(id.clone()))?;
        Ok(Endpoints {
            source: self.node_resource(&edge.source)?,
            target: self.node_resource(&edge.target)?,
            edge,
        })
    }
}

impl<M, D, N> TopologyController<M, D, N>
where
    M: MutationPort,
    D: DialogPort,
    N: Notifier,
{
    /// Run a context-menu action.
    pub async fn run_edge_action(&mut self, action: &EdgeAction) -> Outcome<GestureEffect> {
        match action {
            EdgeAction::MoveConnector { edge, targets } => {
                let current = self.graph.read().edge(edge).cloned();
                let Some(current) = current else {
                    return self.fail(MOVE_ERROR, MutationError::UnknownEdge(edge.clone()));
                };
                match self.dialogs.choose_move_target(&current, targets).await {
                    Some(target) => self.move_connector(edge, &target).await,
                    None => Outcome::Cancelled,
                }
            }
            EdgeAction::DeleteConnector { edge } => self.remove_connector(edge).await,
        }
    }

    /// Re-point the connector `edge` at `new_target`.
    ///
    /// Dropping back on the current target is `Done(Unchanged)` with no port
    /// calls; a target the edge may not point at is `Cancelled`.
    pub async fn move_connector(&mut self, edge: &EdgeId, new_target: &NodeId) -> Outcome<GestureEffect> {
        let allowed = {
            let graph = self.graph.read();
            graph.edge(edge).map(|e| {
                (
                    &e.target == new_target,
                    rule_for(&e.kind).can_move
                        && validator::can_drop_edge_on_node(
                            OperationKind::MoveConnector,
                            &graph,
                            e,
                            new_target,
                        ),
                )
            })
        };
        match allowed {
            Some((true, _)) => return Outcome::Done(GestureEffect::Unchanged),
            Some((false, false)) => {
                debug!(%edge, %new_target, "move target rejected");
                return Outcome::Cancelled;
            }
            _ => {}
        }

        let resolved = self
            .endpoints(edge)
            .and_then(|ends| Ok((self.node_resource(new_target)?, ends)));
        let (target, ends) = match resolved {
            Ok(resolved) => resolved,
            Err(err) => return self.fail(MOVE_ERROR, err),
        };

        info!(%edge, from = %ends.edge.target, to = %new_target, "moving connection");
        let moved = self
            .mutations
            .create_connection(&ends.source, &target, Some(&ends.target))
            .await;
        match moved {
            Ok(_) => {
                self.graph.apply_optimistic(vec![GraphOp::RetargetEdge {
                    id: edge.clone(),
                    target: new_target.clone(),
                }]);
                Outcome::Done(GestureEffect::ConnectorMoved)
            }
            Err(err) => self.fail(MOVE_ERROR, err),
        }
    }

    /// Confirm, then delete the connector `edge`.
    ///
    /// Derived kinds are `Cancelled` without a dialog or port call.
    pub async fn remove_connector(&mut self, edge: &EdgeId) -> Outcome<GestureEffect> {
        let resolved = self.endpoints(edge);
        let ends = match resolved {
            Ok(ends) => ends,
            Err(err) => return self.fail(DELETE_ERROR, err),
        };
        if !rule_for(&ends.edge.kind).can_delete {
            debug!(%edge, kind = ends.edge.kind.tag(), "edge kind cannot be deleted");
            return Outcome::Cancelled;
        }
        let (source_label, target_label) = {
            let graph = self.graph.read();
            let label = |id: &NodeId| graph.node(id).map_or_else(|| id.to_string(), |n| n.label.clone());
            (label(&ends.edge.source), label(&ends.edge.target))
        };
        let request = ConfirmRequest {
            title: "Delete Connector?".into(),
            message: format!(
                "Deleting the connector from {source_label} to {target_label} removes the relationship only; both components stay."
            ),
            confirm_label: "Delete".into(),
        };
        if self.dialogs.confirm(request).await == Decision::Declined {
            info!(%edge, "delete declined");
            return Outcome::Cancelled;
        }

        info!(%edge, "removing connection");
        let removed = self
            .mutations
            .remove_connection(&ends.edge, &ends.source, &ends.target)
            .await;
        match removed {
            Ok(()) => {
                self.graph
                    .apply_optimistic(vec![GraphOp::RemoveEdge { id: edge.clone() }]);
                Outcome::Done(GestureEffect::ConnectorRemoved)
            }
            Err(err) => self.fail(DELETE_ERROR, err),
        }
    }
}
