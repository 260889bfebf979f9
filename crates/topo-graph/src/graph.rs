// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Indexed in-memory topology graph.
//!
//! Adjacency and containment are indexed both ways so the hover-time checks in
//! the interaction engine stay `O(out-degree)` / `O(depth)` instead of scanning
//! every edge on each pointer move.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EdgeId, EdgeKind, NodeId, TopologyEdge, TopologyNode};

/// Structural graph mutations applied after a backing mutation succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOp {
    /// Insert a node under its declared parent.
    AddNode(TopologyNode),
    /// Remove a node and its incident edges; its children move up to its parent.
    RemoveNode {
        /// Node identifier.
        id: NodeId,
    },
    /// Move a node under a new parent (`None` = graph root).
    Reparent {
        /// Node identifier.
        id: NodeId,
        /// New parent.
        parent: Option<NodeId>,
    },
    /// Insert an edge.
    AddEdge(TopologyEdge),
    /// Remove an edge.
    RemoveEdge {
        /// Edge identifier.
        id: EdgeId,
    },
    /// Point an existing edge at a different target. The edge is re-keyed
    /// under the canonical id for its new endpoints.
    RetargetEdge {
        /// Edge identifier.
        id: EdgeId,
        /// New target node.
        target: NodeId,
    },
}

/// Flat serialized form of a [`TopologyGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Nodes in insertion order; `parent` may reference a later node.
    pub nodes: Vec<TopologyNode>,
    /// Edges.
    #[serde(default)]
    pub edges: Vec<TopologyEdge>,
}

/// Live topology graph with containment and adjacency indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphSnapshot", into = "GraphSnapshot")]
pub struct TopologyGraph {
    nodes: BTreeMap<NodeId, TopologyNode>,
    /// Insertion order, used for deterministic iteration and snapshots.
    order: Vec<NodeId>,
    root_children: Vec<NodeId>,
    children: BTreeMap<NodeId, Vec<NodeId>>,
    edges: BTreeMap<EdgeId, TopologyEdge>,
    edges_from: BTreeMap<NodeId, Vec<EdgeId>>,
    edges_to: BTreeMap<NodeId, Vec<EdgeId>>,
}

impl TopologyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the node when it exists.
    pub fn node(&self, id: &NodeId) -> Option<&TopologyNode> {
        self.nodes.get(id)
    }

    /// True when the node exists.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns the edge when it exists.
    pub fn edge(&self, id: &EdgeId) -> Option<&TopologyEdge> {
        self.edges.get(id)
    }

    /// Iterate nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &TopologyNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Iterate edges in id order.
    pub fn edges(&self) -> impl Iterator<Item = &TopologyEdge> {
        self.edges.values()
    }

    /// Parent node of `id`; `None` for root-level or unknown nodes.
    pub fn parent(&self, id: &NodeId) -> Option<&TopologyNode> {
        self.nodes
            .get(id)
            .and_then(|n| n.parent.as_ref())
            .and_then(|p| self.nodes.get(p))
    }

    /// Ordered children of a container (`None` = graph root).
    pub fn children(&self, container: Option<&NodeId>) -> &[NodeId] {
        match container {
            None => &self.root_children,
            Some(id) => self.children.get(id).map_or(&[], Vec::as_slice),
        }
    }

    /// Outgoing edges of `id`.
    pub fn edges_from<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a TopologyEdge> + 'a {
        self.edges_from
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|eid| self.edges.get(eid))
    }

    /// Incoming edges of `id`.
    pub fn edges_to<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a TopologyEdge> + 'a {
        self.edges_to
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|eid| self.edges.get(eid))
    }

    /// True when any edge runs from `source` to `target`.
    pub fn has_edge_between(&self, source: &NodeId, target: &NodeId) -> bool {
        self.edges_from(source).any(|e| &e.target == target)
    }

    /// Edge of `kind` from `source` to `target`, if present.
    pub fn find_edge(
        &self,
        source: &NodeId,
        target: &NodeId,
        kind: &EdgeKind,
    ) -> Option<&TopologyEdge> {
        self.edges_from(source)
            .find(|e| &e.target == target && &e.kind == kind)
    }

    /// True when `node` sits (transitively) inside `ancestor`.
    pub fn is_descendant_of(&self, node: &NodeId, ancestor: &NodeId) -> bool {
        let mut cursor = self.nodes.get(node).and_then(|n| n.parent.as_ref());
        // Bounded by node count so a corrupted tree cannot spin forever.
        for _ in 0..self.nodes.len() {
            match cursor {
                Some(p) if p == ancestor => return true,
                Some(p) => cursor = self.nodes.get(p).and_then(|n| n.parent.as_ref()),
                None => return false,
            }
        }
        false
    }

    /// Apply a structural op; errors if ids are missing/duplicate or an
    /// invariant (distinct endpoints, unique edges, acyclic containment) would break.
    pub fn apply_op(&mut self, op: GraphOp) -> anyhow::Result<()> {
        match op {
            GraphOp::AddNode(node) => {
                if self.nodes.contains_key(&node.id) {
                    anyhow::bail!("node already exists: {}", node.id);
                }
                if let Some(parent) = &node.parent {
                    if !self.nodes.contains_key(parent) {
                        anyhow::bail!("missing parent node: {}", parent);
                    }
                }
                self.attach(&node.id, node.parent.as_ref());
                self.order.push(node.id.clone());
                self.nodes.insert(node.id.clone(), node);
            }
            GraphOp::RemoveNode { id } => {
                let Some(node) = self.nodes.remove(&id) else {
                    anyhow::bail!("missing node: {}", id);
                };
                self.order.retain(|n| n != &id);
                self.detach(&id, node.parent.as_ref());
                let incident: Vec<EdgeId> = self
                    .edges_from
                    .get(&id)
                    .into_iter()
                    .chain(self.edges_to.get(&id))
                    .flatten()
                    .cloned()
                    .collect();
                for eid in incident {
                    self.remove_edge(&eid);
                }
                for child in self.children.remove(&id).unwrap_or_default() {
                    if let Some(c) = self.nodes.get_mut(&child) {
                        c.parent.clone_from(&node.parent);
                    }
                    self.attach(&child, node.parent.as_ref());
                }
            }
            GraphOp::Reparent { id, parent } => {
                let Some(current) = self.nodes.get(&id).map(|n| n.parent.clone()) else {
                    anyhow::bail!("missing node: {}", id);
                };
                if let Some(p) = &parent {
                    if !self.nodes.contains_key(p) {
                        anyhow::bail!("missing parent node: {}", p);
                    }
                    if p == &id || self.is_descendant_of(p, &id) {
                        anyhow::bail!("reparenting {} under {} would create a cycle", id, p);
                    }
                }
                if current == parent {
                    return Ok(());
                }
                self.detach(&id, current.as_ref());
                self.attach(&id, parent.as_ref());
                if let Some(n) = self.nodes.get_mut(&id) {
                    n.parent = parent;
                }
            }
            GraphOp::AddEdge(edge) => {
                if self.edges.contains_key(&edge.id) {
                    anyhow::bail!("edge already exists: {}", edge.id);
                }
                self.check_endpoints(&edge.source, &edge.target, &edge.kind)?;
                self.insert_edge(edge);
            }
            GraphOp::RemoveEdge { id } => {
                if !self.remove_edge(&id) {
                    anyhow::bail!("missing edge: {}", id);
                }
            }
            GraphOp::RetargetEdge { id, target } => {
                let Some(edge) = self.edges.get(&id).cloned() else {
                    anyhow::bail!("missing edge: {}", id);
                };
                if edge.target == target {
                    return Ok(());
                }
                self.check_endpoints(&edge.source, &target, &edge.kind)?;
                self.remove_edge(&id);
                self.insert_edge(TopologyEdge::new(edge.kind, edge.source, target));
            }
        }
        Ok(())
    }

    fn check_endpoints(
        &self,
        source: &NodeId,
        target: &NodeId,
        kind: &EdgeKind,
    ) -> anyhow::Result<()> {
        if !self.nodes.contains_key(source) {
            anyhow::bail!("missing src node: {}", source);
        }
        if !self.nodes.contains_key(target) {
            anyhow::bail!("missing dst node: {}", target);
        }
        if source == target {
            anyhow::bail!("edge endpoints must differ: {}", source);
        }
        if self.find_edge(source, target, kind).is_some() {
            anyhow::bail!(
                "duplicate {} edge from {} to {}",
                kind.tag(),
                source,
                target
            );
        }
        Ok(())
    }

    fn insert_edge(&mut self, edge: TopologyEdge) {
        self.edges_from
            .entry(edge.source.clone())
            .or_default()
            .push(edge.id.clone());
        self.edges_to
            .entry(edge.target.clone())
            .or_default()
            .push(edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
    }

    fn remove_edge(&mut self, id: &EdgeId) -> bool {
        let Some(edge) = self.edges.remove(id) else {
            return false;
        };
        if let Some(list) = self.edges_from.get_mut(&edge.source) {
            list.retain(|e| e != id);
        }
        if let Some(list) = self.edges_to.get_mut(&edge.target) {
            list.retain(|e| e != id);
        }
        true
    }

    fn attach(&mut self, id: &NodeId, parent: Option<&NodeId>) {
        match parent {
            None => self.root_children.push(id.clone()),
            Some(p) => self.children.entry(p.clone()).or_default().push(id.clone()),
        }
    }

    fn detach(&mut self, id: &NodeId, parent: Option<&NodeId>) {
        let list = match parent {
            None => Some(&mut self.root_children),
            Some(p) => self.children.get_mut(p),
        };
        if let Some(list) = list {
            list.retain(|c| c != id);
        }
    }
}

impl TryFrom<GraphSnapshot> for TopologyGraph {
    type Error = anyhow::Error;

    fn try_from(snapshot: GraphSnapshot) -> anyhow::Result<Self> {
        let mut graph = Self::new();
        let mut parents = Vec::new();
        // Parents may be declared after their children; attach in a second pass.
        for mut node in snapshot.nodes {
            if let Some(parent) = node.parent.take() {
                parents.push((node.id.clone(), parent));
            }
            graph.apply_op(GraphOp::AddNode(node))?;
        }
        for (id, parent) in parents {
            graph.apply_op(GraphOp::Reparent {
                id,
                parent: Some(parent),
            })?;
        }
        for edge in snapshot.edges {
            graph.apply_op(GraphOp::AddEdge(edge))?;
        }
        Ok(graph)
    }
}

impl From<TopologyGraph> for GraphSnapshot {
    fn from(graph: TopologyGraph) -> Self {
        let TopologyGraph {
            mut nodes,
            order,
            edges,
            ..
        } = graph;
        Self {
            nodes: order.iter().filter_map(|id| nodes.remove(id)).collect(),
            edges: edges.into_values().collect(),
        }
    }
}
