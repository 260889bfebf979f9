// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Topology graph model shared by the interaction engine and its tools.
//!
//! Pure data (nodes, edges, containment) plus the structural operations the
//! engine applies after a backing-resource mutation succeeds. Nodes and edges
//! are rebuilt wholesale on every resource refresh; nothing here owns their
//! lifecycle beyond a single snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

mod graph;

pub use graph::{GraphOp, GraphSnapshot, TopologyGraph};

/// Stable node identifier (the uid of the backing resource or a synthetic group id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Stable edge identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl NodeId {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EdgeId {
    /// Canonical id for an edge of `kind` from `source` to `target`.
    pub fn between(source: &NodeId, target: &NodeId, kind: &EdgeKind) -> Self {
        Self(format!("{}_{}_{}", source.0, kind.tag(), target.0))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Node classification. Serialized as the console's kebab-case type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Deployment, deployment config, stateful set and friends.
    Workload,
    /// Application grouping (`app.kubernetes.io/part-of`).
    ApplicationGroup,
    /// Knative serving service.
    KnativeService,
    /// Group of workloads owned by an operator-managed service.
    OperatorBackedService,
    /// Knative eventing source.
    EventSource,
    /// Any other tag; carried through untouched.
    Other(String),
}

impl NodeKind {
    /// Wire tag for this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::Workload => "workload",
            Self::ApplicationGroup => "application-group",
            Self::KnativeService => "knative-service",
            Self::OperatorBackedService => "operator-backed-service",
            Self::EventSource => "event-source",
            Self::Other(tag) => tag,
        }
    }

    /// Parse a wire tag; unknown tags become [`NodeKind::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "workload" => Self::Workload,
            "application-group" => Self::ApplicationGroup,
            "knative-service" => Self::KnativeService,
            "operator-backed-service" => Self::OperatorBackedService,
            "event-source" => Self::EventSource,
            other => Self::Other(other.to_owned()),
        }
    }

    /// True for kinds that act as regroup containers. Operator-backed
    /// services group their workloads visually but connect like any node.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::ApplicationGroup)
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        Self::from_tag(&value)
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.tag().to_owned()
    }
}

/// Edge classification. Serialized as the console's kebab-case type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeKind {
    /// User-drawn "connects to" annotation between workloads.
    ConnectsTo,
    /// Service binding request between a workload and a bindable service.
    ServiceBinding,
    /// Event source sink reference.
    EventSourceLink,
    /// Knative revision traffic split.
    TrafficConnector,
    /// Collapsed edge between groups.
    AggregateEdge,
    /// Any other tag; carried through untouched.
    Other(String),
}

impl EdgeKind {
    /// Wire tag for this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::ConnectsTo => "connects-to",
            Self::ServiceBinding => "service-binding",
            Self::EventSourceLink => "event-source-link",
            Self::TrafficConnector => "traffic-connector",
            Self::AggregateEdge => "aggregate-edge",
            Self::Other(tag) => tag,
        }
    }

    /// Parse a wire tag; unknown tags become [`EdgeKind::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "connects-to" => Self::ConnectsTo,
            "service-binding" => Self::ServiceBinding,
            "event-source-link" => Self::EventSourceLink,
            "traffic-connector" => Self::TrafficConnector,
            "aggregate-edge" => Self::AggregateEdge,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for EdgeKind {
    fn from(value: String) -> Self {
        Self::from_tag(&value)
    }
}

impl From<EdgeKind> for String {
    fn from(value: EdgeKind) -> Self {
        value.tag().to_owned()
    }
}

/// Reference to the managed resource behind a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    /// API group; empty for the core group.
    #[serde(default)]
    pub api_group: String,
    /// API version within the group.
    pub api_version: String,
    /// Resource kind (e.g. `Deployment`).
    pub kind: String,
    /// Object name.
    pub name: String,
    /// Object namespace.
    pub namespace: String,
}

impl ResourceRef {
    /// Resolve the model (group + kind) used for access reviews.
    pub fn model(&self) -> ResourceModel {
        ResourceModel {
            api_group: self.api_group.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} in {}", self.kind, self.name, self.namespace)
    }
}

/// Group + kind of a resource, without a specific object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceModel {
    /// API group; empty for the core group.
    pub api_group: String,
    /// Resource kind.
    pub kind: String,
}

/// A vertex: workload, group, or similar entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyNode {
    /// Node identifier.
    pub id: NodeId,
    /// Node classification.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Display label.
    pub label: String,
    /// Containing group; `None` means the graph root.
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Backing resource, if any (application groups have none).
    #[serde(default)]
    pub resource: Option<ResourceRef>,
}

/// A typed, directed relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyEdge {
    /// Edge identifier.
    pub id: EdgeId,
    /// Edge classification.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
}

impl TopologyEdge {
    /// Build an edge with its canonical id.
    pub fn new(kind: EdgeKind, source: NodeId, target: NodeId) -> Self {
        Self {
            id: EdgeId::between(&source, &target, &kind),
            kind,
            source,
            target,
        }
    }
}

/// Any element a gesture can touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphElement {
    /// The graph root (ungrouped area).
    Graph,
    /// A node.
    Node(NodeId),
    /// An edge.
    Edge(EdgeId),
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_round_trip_through_strings() {
        for tag in [
            "workload",
            "application-group",
            "knative-service",
            "operator-backed-service",
            "event-source",
        ] {
            assert_eq!(NodeKind::from_tag(tag).tag(), tag);
        }
        assert_eq!(
            NodeKind::from_tag("helm-release"),
            NodeKind::Other("helm-release".into())
        );
        assert_eq!(EdgeKind::from_tag("connects-to"), EdgeKind::ConnectsTo);
        assert_eq!(
            EdgeKind::from_tag("kafka-connection").tag(),
            "kafka-connection"
        );
    }

    #[test]
    fn only_application_groups_contain() {
        assert!(NodeKind::ApplicationGroup.is_group());
        assert!(!NodeKind::OperatorBackedService.is_group());
        assert!(!NodeKind::Workload.is_group());
    }

    #[test]
    fn node_json_uses_type_tag() {
        let node: TopologyNode = serde_json::from_str(
            r#"{"id":"w","type":"knative-service","label":"w","parent":"g"}"#,
        )
        .unwrap();
        assert_eq!(node.kind, NodeKind::KnativeService);
        assert_eq!(node.parent, Some(NodeId::from("g")));
        assert!(node.resource.is_none());
    }

    #[test]
    fn edge_ids_are_unique_per_kind() {
        let a = NodeId::from("a");
        let b = NodeId::from("b");
        assert_ne!(
            EdgeId::between(&a, &b, &EdgeKind::ConnectsTo),
            EdgeId::between(&a, &b, &EdgeKind::ServiceBinding)
        );
    }
}
