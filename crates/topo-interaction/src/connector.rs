// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Connector creation protocol.
//!
//! A connector handle dropped on a node creates the connection right away. A
//! drop on a group or on empty canvas is ambiguous, so the protocol answers
//! with a creation menu instead of mutating anything.
//!
//! Specialised edge kinds hook in through [`ConnectorCreator`] extensions,
//! which see the drop first.

use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use topo_app_core::notify::Notifier;
use topo_graph::{
    EdgeKind, GraphOp, NodeId, NodeKind, ResourceRef, TopologyEdge, TopologyNode,
};
use tracing::{debug, info};

use crate::controller::TopologyController;
use crate::gesture::DropTarget;
use crate::outcome::{MutationError, Outcome};
use crate::ports::{DialogPort, MutationPort, SinkPort};

const CREATE_ERROR: &str = "Error creating connection";

/// What an extension gets to look at before claiming a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropHints {
    /// Kind of the node the connector was drawn from.
    pub source_kind: NodeKind,
    /// Where it was dropped.
    pub target: DropTarget,
    /// Kind of the target node, when the target is a node or group.
    pub target_kind: Option<NodeKind>,
}

/// Resolved endpoints of a node-to-node connector drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorRequest {
    /// Node the connector starts at.
    pub source: TopologyNode,
    /// Resource behind `source`.
    pub source_resource: ResourceRef,
    /// Node the connector ends at.
    pub target: TopologyNode,
    /// Resource behind `target`.
    pub target_resource: ResourceRef,
    /// Edges already leaving `source`.
    pub outgoing: Vec<TopologyEdge>,
}

/// Creation logic for a specialised connector kind.
pub trait ConnectorCreator {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// True when this creator handles the drop.
    fn accepts(&self, hints: &DropHints) -> bool;

    /// Persist the connector and return the optimistic graph ops to apply on success.
    fn create<'a>(
        &'a self,
        request: &'a ConnectorRequest,
    ) -> LocalBoxFuture<'a, Result<Vec<GraphOp>, MutationError>>;
}

/// Ordered list of creators; the first one that accepts wins.
#[derive(Default)]
pub struct ConnectorExtensions {
    creators: Vec<Box<dyn ConnectorCreator>>,
}

impl ConnectorExtensions {
    /// Append `creator`.
    pub fn register(&mut self, creator: impl ConnectorCreator + 'static) {
        self.creators.push(Box::new(creator));
    }

    /// First creator accepting `hints`.
    pub fn find(&self, hints: &DropHints) -> Option<&dyn ConnectorCreator> {
        self.creators
            .iter()
            .find(|c| c.accepts(hints))
            .map(|c| &**c)
    }

    /// Number of registered creators.
    pub fn len(&self) -> usize {
        self.creators.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

impl std::fmt::Debug for ConnectorExtensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.creators.iter().map(|c| c.name()))
            .finish()
    }
}

/// Connects an event source to a Knative service by setting its sink.
#[derive(Debug, Clone)]
pub struct EventSinkCreator<S> {
    sink: S,
}

impl<S> EventSinkCreator<S> {
    /// Creator writing through `sink`.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: SinkPort> ConnectorCreator for EventSinkCreator<S> {
    fn name(&self) -> &str {
        "event-sink"
    }

    fn accepts(&self, hints: &DropHints) -> bool {
        hints.source_kind == NodeKind::EventSource
            && matches!(hints.target, DropTarget::Node(_))
            && hints.target_kind == Some(NodeKind::KnativeService)
    }

    fn create<'a>(
        &'a self,
        request: &'a ConnectorRequest,
    ) -> LocalBoxFuture<'a, Result<Vec<GraphOp>, MutationError>> {
        Box::pin(async move {
            self.sink
                .set_sink(&request.source_resource, &request.target_resource)
                .await?;
            // A source has one sink; re-point the existing link if there is one.
            let existing = request
                .outgoing
                .iter()
                .find(|e| e.kind == EdgeKind::EventSourceLink);
            Ok(vec![match existing {
                Some(edge) => GraphOp::RetargetEdge {
                    id: edge.id.clone(),
                    target: request.target.id.clone(),
                },
                None => GraphOp::AddEdge(TopologyEdge::new(
                    EdgeKind::EventSourceLink,
                    request.source.id.clone(),
                    request.target.id.clone(),
                )),
            }])
        })
    }
}

/// Resource a creation menu entry will make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreateKind {
    /// Build from a Git repository.
    GitImport,
    /// Deploy an existing container image.
    ContainerImage,
    /// Build from a Dockerfile.
    Dockerfile,
    /// Create an operator-backed service.
    OperatorBacked,
}

impl CreateKind {
    /// Menu order.
    pub const ALL: [Self; 4] = [
        Self::GitImport,
        Self::ContainerImage,
        Self::Dockerfile,
        Self::OperatorBacked,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::GitImport => "Import from Git",
            Self::ContainerImage => "Container Image",
            Self::Dockerfile => "From Dockerfile",
            Self::OperatorBacked => "Operator Backed",
        }
    }
}

/// One entry of the creation menu shown after an ambiguous connector drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// What to create.
    pub kind: CreateKind,
    /// Display label.
    pub label: &'static str,
    /// The new resource gets connected from this node.
    pub connect_from: NodeId,
    /// Application to place the new resource in; `None` for ungrouped.
    pub application: Option<String>,
}

/// Creation menu for a connector drawn from `source`, scoped to `application`.
pub fn creation_menu(source: &NodeId, application: Option<&str>) -> Vec<MenuItem> {
    CreateKind::ALL
        .into_iter()
        .map(|kind| MenuItem {
            kind,
            label: kind.label(),
            connect_from: source.clone(),
            application: application.map(str::to_owned),
        })
        .collect()
}

enum ConnectorPlan {
    Menu(Vec<MenuItem>),
    Direct(Box<ConnectorRequest>),
    Extension(Box<ConnectorRequest>),
}

impl<M, D, N> TopologyController<M, D, N> {
    fn plan_connector(
        &self,
        source: &NodeId,
        target: &DropTarget,
    ) -> Result<ConnectorPlan, MutationError> {
        let graph = self.graph.read();
        let src = graph
            .node(source)
            .ok_or_else(|| MutationError::UnknownNode(source.clone()))?;
        match target {
            DropTarget::Graph => Ok(ConnectorPlan::Menu(creation_menu(source, None))),
            DropTarget::Group(group) => {
                let group = graph
                    .node(group)
                    .ok_or_else(|| MutationError::UnknownNode(group.clone()))?;
                Ok(ConnectorPlan::Menu(creation_menu(source, Some(group.label.as_str()))))
            }
            DropTarget::Node(id) => {
                let tgt = graph
                    .node(id)
                    .ok_or_else(|| MutationError::UnknownNode(id.clone()))?;
                let hints = DropHints {
                    source_kind: src.kind.clone(),
                    target: target.clone(),
                    target_kind: Some(tgt.kind.clone()),
                };
                let request = Box::new(ConnectorRequest {
                    source: src.clone(),
                    source_resource: self.resource(src)?,
                    target: tgt.clone(),
                    target_resource: self.resource(tgt)?,
                    outgoing: graph.edges_from(source).cloned().collect(),
                });
                Ok(if self.extensions.find(&hints).is_some() {
                    ConnectorPlan::Extension(request)
                } else {
                    ConnectorPlan::Direct(request)
                })
            }
        }
    }
}

impl<M, D, N> TopologyController<M, D, N>
where
    M: MutationPort,
    D: DialogPort,
    N: Notifier,
{
    /// Finish a connector drawn from `source` onto `target`.
    ///
    /// Returns `Done(Some(menu))` when the user still has to pick what to
    /// create, and `Done(None)` once the connection exists (or for a drop on
    /// the source itself).
    pub async fn create_connector(
        &mut self,
        source: &NodeId,
        target: &DropTarget,
    ) -> Outcome<Option<Vec<MenuItem>>> {
        if matches!(target, DropTarget::Node(id) if id == source) {
            return Outcome::Done(None);
        }
        let planned = self.plan_connector(source, target);
        let request = match planned {
            Ok(ConnectorPlan::Menu(items)) => {
                debug!(%source, ?target, "connector drop needs a creation menu");
                return Outcome::Done(Some(items));
            }
            Ok(ConnectorPlan::Extension(request)) => {
                return self.create_with_extension(&request).await;
            }
            Ok(ConnectorPlan::Direct(request)) => request,
            Err(err) => return self.fail(CREATE_ERROR, err),
        };

        info!(source = %request.source.id, target = %request.target.id, "creating connection");
        let created = self
            .mutations
            .create_connection(&request.source_resource, &request.target_resource, None)
            .await;
        match created {
            Ok(_) => {
                self.graph.apply_optimistic(vec![GraphOp::AddEdge(TopologyEdge::new(
                    EdgeKind::ConnectsTo,
                    request.source.id,
                    request.target.id,
                ))]);
                Outcome::Done(None)
            }
            Err(err) => self.fail(CREATE_ERROR, err),
        }
    }

    async fn create_with_extension(
        &mut self,
        request: &ConnectorRequest,
    ) -> Outcome<Option<Vec<MenuItem>>> {
        let hints = DropHints {
            source_kind: request.source.kind.clone(),
            target: DropTarget::Node(request.target.id.clone()),
            target_kind: Some(request.target.kind.clone()),
        };
        let result = match self.extensions.find(&hints) {
            Some(creator) => {
                info!(
                    creator = creator.name(),
                    source = %request.source.id,
                    target = %request.target.id,
                    "creating connection via extension"
                );
                creator.create(request).await
            }
            None => Ok(Vec::new()),
        };
        match result {
            Ok(ops) => {
                self.graph.apply_optimistic(ops);
                Outcome::Done(None)
            }
            Err(err) => self.fail(CREATE_ERROR, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(source_kind: NodeKind, target_kind: NodeKind) -> DropHints {
        DropHints {
            source_kind,
            target: DropTarget::Node("t".into()),
            target_kind: Some(target_kind),
        }
    }

    struct NoSink;

    impl SinkPort for NoSink {
        async fn set_sink(&self, _: &ResourceRef, _: &ResourceRef) -> Result<(), MutationError> {
            Ok(())
        }
    }

    #[test]
    fn event_sink_creator_claims_only_source_to_knative_drops() {
        let creator = EventSinkCreator::new(NoSink);
        assert!(creator.accepts(&hints(NodeKind::EventSource, NodeKind::KnativeService)));
        assert!(!creator.accepts(&hints(NodeKind::Workload, NodeKind::KnativeService)));
        assert!(!creator.accepts(&hints(NodeKind::EventSource, NodeKind::Workload)));
        let on_graph = DropHints {
            source_kind: NodeKind::EventSource,
            target: DropTarget::Graph,
            target_kind: None,
        };
        assert!(!creator.accepts(&on_graph));
    }

    #[test]
    fn first_accepting_extension_wins() {
        let mut ext = ConnectorExtensions::default();
        assert!(ext.find(&hints(NodeKind::EventSource, NodeKind::KnativeService)).is_none());
        ext.register(EventSinkCreator::new(NoSink));
        assert_eq!(ext.len(), 1);
        let found = ext.find(&hints(NodeKind::EventSource, NodeKind::KnativeService));
        assert_eq!(found.map(|c| c.name()), Some("event-sink"));
    }

    #[test]
    fn menu_carries_source_and_application() {
        let menu = creation_menu(&"a".into(), Some("shop"));
        let labels: Vec<_> = menu.iter().map(|m| m.label).collect();
        assert_eq!(
            labels,
            ["Import from Git", "Container Image", "From Dockerfile", "Operator Backed"]
        );
        assert!(menu
            .iter()
            .all(|m| m.connect_from.as_str() == "a" && m.application.as_deref() == Some("shop")));
        assert!(creation_menu(&"a".into(), None)[0].application.is_none());
    }
}
