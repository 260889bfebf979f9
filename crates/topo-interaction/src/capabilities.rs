// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Interaction capabilities the rendering layer attaches to graph elements.
//!
//! Each capability is an independent trait. An element gets whichever
//! descriptors apply to its kind; nothing is layered through wrappers.

use topo_graph::{EdgeId, GraphElement, NodeId, TopologyGraph};

use crate::classifier;
use crate::edge_actions::{edge_actions, ActionItem};
use crate::edge_rules::rule_for;
use crate::gesture::{DragSession, DragSubject, DropTarget, GestureContext};
use crate::operation::OperationDescriptor;
use crate::ports::{AccessPort, ResourcePort};
use crate::validator::{self, DropCandidate};

/// Something the user can pick up.
pub trait Draggable {
    /// What is being dragged.
    fn subject(&self) -> DragSubject;

    /// Operation a drag started now would perform.
    fn operation(
        &self,
        graph: &TopologyGraph,
        ctx: &GestureContext,
        resources: &dyn ResourcePort,
        access: &dyn AccessPort,
    ) -> Option<OperationDescriptor> {
        classifier::classify(graph, &self.subject(), ctx, resources, access)
    }
}

/// A drop zone.
pub trait Droppable {
    /// Zone identity.
    fn target(&self) -> DropTarget;

    /// Affordance during `session`.
    fn candidate(&self, graph: &TopologyGraph, session: Option<&DragSession>) -> DropCandidate {
        validator::drop_candidate(graph, session, &self.target())
    }
}

/// Something that can be selected.
pub trait Selectable {
    /// Selected element.
    fn element(&self) -> GraphElement;
}

/// Something with a context menu.
pub trait ContextMenuable {
    /// Menu entries.
    fn context_menu(&self, graph: &TopologyGraph, resources: &dyn ResourcePort) -> Vec<ActionItem>;
}

/// Node body; dragging it moves the node or, with the modifier, regroups it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDragSource(pub NodeId);

impl Draggable for NodeDragSource {
    fn subject(&self) -> DragSubject {
        DragSubject::Node(self.0.clone())
    }
}

/// Connector handle on a node; dragging it draws a new connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorHandleSource(pub NodeId);

impl Draggable for ConnectorHandleSource {
    fn subject(&self) -> DragSubject {
        DragSubject::ConnectorHandle(self.0.clone())
    }
}

/// Target end of an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDragSource(pub EdgeId);

impl Draggable for EdgeDragSource {
    fn subject(&self) -> DragSubject {
        DragSubject::EdgeEndpoint(self.0.clone())
    }
}

/// A plain node as a drop zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDropTarget(pub NodeId);

impl Droppable for NodeDropTarget {
    fn target(&self) -> DropTarget {
        DropTarget::Node(self.0.clone())
    }
}

/// A group as a drop zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDropTarget(pub NodeId);

impl Droppable for GroupDropTarget {
    fn target(&self) -> DropTarget {
        DropTarget::Group(self.0.clone())
    }
}

/// Empty canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphDropTarget;

impl Droppable for GraphDropTarget {
    fn target(&self) -> DropTarget {
        DropTarget::Graph
    }
}

/// Selectable node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSelection(pub NodeId);

impl Selectable for NodeSelection {
    fn element(&self) -> GraphElement {
        GraphElement::Node(self.0.clone())
    }
}

/// Selectable edge with the connector context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSelection(pub EdgeId);

impl Selectable for EdgeSelection {
    fn element(&self) -> GraphElement {
        GraphElement::Edge(self.0.clone())
    }
}

impl ContextMenuable for EdgeSelection {
    fn context_menu(&self, graph: &TopologyGraph, resources: &dyn ResourcePort) -> Vec<ActionItem> {
        graph
            .edge(&self.0)
            .map(|edge| edge_actions(graph, edge, resources))
            .unwrap_or_default()
    }
}

/// Drag sources for `element`. Groups are not draggable; derived edges cannot
/// be re-pointed.
pub fn drag_sources_for(graph: &TopologyGraph, element: &GraphElement) -> Vec<Box<dyn Draggable>> {
    match element {
        GraphElement::Graph => Vec::new(),
        GraphElement::Node(id) => match graph.node(id) {
            Some(node) if !node.kind.is_group() => {
                let body: Box<dyn Draggable> = Box::new(NodeDragSource(id.clone()));
                let handle: Box<dyn Draggable> = Box::new(ConnectorHandleSource(id.clone()));
                vec![body, handle]
            }
            _ => Vec::new(),
        },
        GraphElement::Edge(id) => match graph.edge(id) {
            Some(edge) if rule_for(&edge.kind).can_move => {
                let endpoint: Box<dyn Draggable> = Box::new(EdgeDragSource(id.clone()));
                vec![endpoint]
            }
            _ => Vec::new(),
        },
    }
}

/// Drop zone for `element`, if it is one.
pub fn drop_target_for(graph: &TopologyGraph, element: &GraphElement) -> Option<Box<dyn Droppable>> {
    match element {
        GraphElement::Graph => Some(Box::new(GraphDropTarget)),
        GraphElement::Node(id) => {
            let node = graph.node(id)?;
            let zone: Box<dyn Droppable> = if node.kind.is_group() {
                Box::new(GroupDropTarget(id.clone()))
            } else {
                Box::new(NodeDropTarget(id.clone()))
            };
            Some(zone)
        }
        GraphElement::Edge(_) => None,
    }
}

/// All capabilities of one element.
pub struct ElementCapabilities {
    /// Drag sources.
    pub drag_sources: Vec<Box<dyn Draggable>>,
    /// Drop zone.
    pub drop_target: Option<Box<dyn Droppable>>,
    /// Selection.
    pub selectable: Option<Box<dyn Selectable>>,
    /// Context menu.
    pub context_menu: Option<Box<dyn ContextMenuable>>,
}

/// Capabilities for `element`.
pub fn capabilities_for(graph: &TopologyGraph, element: &GraphElement) -> ElementCapabilities {
    let mut selectable: Option<Box<dyn Selectable>> = None;
    let mut context_menu: Option<Box<dyn ContextMenuable>> = None;
    match element {
        GraphElement::Node(id) if graph.contains_node(id) => {
            selectable = Some(Box::new(NodeSelection(id.clone())));
        }
        GraphElement::Edge(id) if graph.edge(id).is_some() => {
            selectable = Some(Box::new(EdgeSelection(id.clone())));
            context_menu = Some(Box::new(EdgeSelection(id.clone())));
        }
        _ => {}
    }
    ElementCapabilities {
        drag_sources: drag_sources_for(graph, element),
        drop_target: drop_target_for(graph, element),
        selectable,
        context_menu,
    }
}
