// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Gesture inputs: what is being dragged, where it may land, and the
//! modifier state captured when the drag began.

use serde::{Deserialize, Serialize};
use topo_app_core::prefs::ModifierKey;
use topo_graph::{EdgeId, NodeId};

use crate::operation::OperationDescriptor;

/// Modifier keys held at drag-begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Shift held.
    pub shift: bool,
    /// Alt / Option held.
    pub alt: bool,
    /// Control held.
    pub ctrl: bool,
    /// Meta / Command held.
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };

    /// Only `key` held.
    pub fn only(key: ModifierKey) -> Self {
        let mut m = Self::NONE;
        match key {
            ModifierKey::Shift => m.shift = true,
            ModifierKey::Alt => m.alt = true,
            ModifierKey::Ctrl => m.ctrl = true,
            ModifierKey::Meta => m.meta = true,
        }
        m
    }

    /// True when `key` is held.
    pub fn holds(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Alt => self.alt,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Meta => self.meta,
        }
    }
}

/// Immutable per-gesture context threaded into classifier and validator calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureContext {
    /// Modifiers held when the drag began.
    pub modifiers: Modifiers,
    /// Modifier configured to mean "regroup".
    pub regroup_modifier: ModifierKey,
}

impl GestureContext {
    /// Context for a drag started with `modifiers`.
    pub fn new(modifiers: Modifiers, regroup_modifier: ModifierKey) -> Self {
        Self {
            modifiers,
            regroup_modifier,
        }
    }

    /// True when the regroup modifier was held at drag-begin.
    pub fn regroup_requested(&self) -> bool {
        self.modifiers.holds(self.regroup_modifier)
    }
}

/// The element a drag started on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragSubject {
    /// The node body.
    Node(NodeId),
    /// The node's "create connector" handle.
    ConnectorHandle(NodeId),
    /// The target end of an edge.
    EdgeEndpoint(EdgeId),
}

/// A drop zone the rendering layer registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    /// A concrete node.
    Node(NodeId),
    /// An application group.
    Group(NodeId),
    /// Empty canvas (graph root).
    Graph,
}

impl DropTarget {
    /// Node behind the target; `None` for the graph root.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::Node(id) | Self::Group(id) => Some(id),
            Self::Graph => None,
        }
    }
}

/// Drag in progress. The operation is frozen at drag-begin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    subject: DragSubject,
    operation: OperationDescriptor,
    context: GestureContext,
    hovered: Option<DropTarget>,
}

impl DragSession {
    pub(crate) fn new(
        subject: DragSubject,
        operation: OperationDescriptor,
        context: GestureContext,
    ) -> Self {
        Self {
            subject,
            operation,
            context,
            hovered: None,
        }
    }

    /// What is being dragged.
    pub fn subject(&self) -> &DragSubject {
        &self.subject
    }

    /// Operation captured at drag-begin.
    pub fn operation(&self) -> &OperationDescriptor {
        &self.operation
    }

    /// Context captured at drag-begin.
    pub fn context(&self) -> &GestureContext {
        &self.context
    }

    /// Drop zone currently under the pointer.
    pub fn hovered(&self) -> Option<&DropTarget> {
        self.hovered.as_ref()
    }

    pub(crate) fn set_hovered(&mut self, target: Option<DropTarget>) {
        self.hovered = target;
    }
}
