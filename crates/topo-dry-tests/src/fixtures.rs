// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Topology graph builder for tests.

use topo_graph::{
    EdgeId, EdgeKind, GraphOp, NodeId, NodeKind, ResourceRef, TopologyEdge, TopologyGraph,
    TopologyNode,
};

/// Namespace used for generated resources.
pub const TEST_NAMESPACE: &str = "demo";

/// Resource reference a node of `kind` named `name` would carry.
pub fn resource_for(name: &str, kind: &NodeKind) -> ResourceRef {
    let (api_group, api_version, resource_kind) = match kind {
        NodeKind::KnativeService => ("serving.knative.dev", "v1", "Service"),
        NodeKind::EventSource => ("sources.knative.dev", "v1", "PingSource"),
        NodeKind::OperatorBackedService => ("operators.coreos.com", "v1alpha1", "ClusterServiceVersion"),
        NodeKind::ApplicationGroup => ("app.k8s.io", "v1beta1", "Application"),
        NodeKind::Workload | NodeKind::Other(_) => ("apps", "v1", "Deployment"),
    };
    ResourceRef {
        api_group: api_group.into(),
        api_version: api_version.into(),
        kind: resource_kind.into(),
        name: name.into(),
        namespace: TEST_NAMESPACE.into(),
    }
}

/// Builder for [`TopologyGraph`] fixtures.
///
/// Nodes get their id as label and a generated [`ResourceRef`]. Edges are
/// applied after all nodes, so declaration order does not matter.
///
/// # Example
///
/// ```
/// use topo_dry_tests::TopologyBuilder;
///
/// let graph = TopologyBuilder::new()
///     .group("G1")
///     .workload_in("W", "G1")
///     .workload("B")
///     .connect("W", "B")
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    nodes: Vec<TopologyNode>,
    edges: Vec<TopologyEdge>,
}

impl TopologyBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully specified node.
    pub fn node(mut self, node: TopologyNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a node of `kind` under `parent`.
    pub fn kind_in(self, id: &str, kind: NodeKind, parent: Option<&str>) -> Self {
        self.node(TopologyNode {
            id: id.into(),
            resource: Some(resource_for(id, &kind)),
            kind,
            label: id.into(),
            parent: parent.map(NodeId::from),
        })
    }

    /// Add a root-level application group.
    pub fn group(self, id: &str) -> Self {
        self.kind_in(id, NodeKind::ApplicationGroup, None)
    }

    /// Add a root-level workload.
    pub fn workload(self, id: &str) -> Self {
        self.kind_in(id, NodeKind::Workload, None)
    }

    /// Add a workload inside `group`.
    pub fn workload_in(self, id: &str, group: &str) -> Self {
        self.kind_in(id, NodeKind::Workload, Some(group))
    }

    /// Add a root-level Knative service.
    pub fn knative_service(self, id: &str) -> Self {
        self.kind_in(id, NodeKind::KnativeService, None)
    }

    /// Add a root-level event source.
    pub fn event_source(self, id: &str) -> Self {
        self.kind_in(id, NodeKind::EventSource, None)
    }

    /// Add a root-level node with no backing resource.
    pub fn unmanaged(self, id: &str) -> Self {
        self.node(TopologyNode {
            id: id.into(),
            kind: NodeKind::Workload,
            label: id.into(),
            parent: None,
            resource: None,
        })
    }

    /// Add an edge of `kind`.
    pub fn edge(mut self, kind: EdgeKind, source: &str, target: &str) -> Self {
        self.edges
            .push(TopologyEdge::new(kind, source.into(), target.into()));
        self
    }

    /// Add a connects-to edge.
    pub fn connect(self, source: &str, target: &str) -> Self {
        self.edge(EdgeKind::ConnectsTo, source, target)
    }

    /// Build the graph; fails on dangling parents, duplicates, or self-edges.
    pub fn build(self) -> anyhow::Result<TopologyGraph> {
        let mut graph = TopologyGraph::new();
        let mut deferred = Vec::new();
        for mut node in self.nodes {
            let parent = node.parent.take();
            deferred.push((node.id.clone(), parent));
            graph.apply_op(GraphOp::AddNode(node))?;
        }
        for (id, parent) in deferred {
            if parent.is_some() {
                graph.apply_op(GraphOp::Reparent { id, parent })?;
            }
        }
        for edge in self.edges {
            graph.apply_op(GraphOp::AddEdge(edge))?;
        }
        Ok(graph)
    }
}

/// Id of the connects-to edge `source → target`.
pub fn connects_to(source: &str, target: &str) -> EdgeId {
    EdgeId::between(&source.into(), &target.into(), &EdgeKind::ConnectsTo)
}
