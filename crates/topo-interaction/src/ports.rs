// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Collaborator ports consumed by the engine.
//!
//! The engine never talks to the cluster or draws modals itself. Adapters
//! implement these traits: a resource client behind [`MutationPort`], modal
//! widgets behind [`DialogPort`], and an access-review cache behind
//! [`AccessPort`]. Error reporting goes through
//! [`topo_app_core::notify::Notifier`].
//!
//! Async ports are consumed on a single UI thread, so their futures carry no
//! `Send` bound.

use serde::{Deserialize, Serialize};
use topo_graph::{NodeId, ResourceModel, ResourceRef, TopologyEdge, TopologyNode};

use crate::outcome::MutationError;

/// Resolves the managed resource behind a node.
pub trait ResourcePort {
    /// Resource backing `node`, if any.
    fn resource_of(&self, node: &TopologyNode) -> Option<ResourceRef>;
}

/// Default resolver: the resource reference carried on the node itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeResources;

impl ResourcePort for NodeResources {
    fn resource_of(&self, node: &TopologyNode) -> Option<ResourceRef> {
        node.resource.clone()
    }
}

/// Persists relationship and grouping changes on backing resources.
pub trait MutationPort {
    /// Record that `source` connects to `target`. When `replace` is given the
    /// existing connection to it is swapped for the new one in the same write.
    async fn create_connection(
        &self,
        source: &ResourceRef,
        target: &ResourceRef,
        replace: Option<&ResourceRef>,
    ) -> Result<Vec<ResourceRef>, MutationError>;

    /// Set (or clear, with `None`) the application a resource belongs to.
    async fn update_application(
        &self,
        resource: &ResourceRef,
        application: Option<&str>,
    ) -> Result<(), MutationError>;

    /// Remove the connection represented by `edge`.
    async fn remove_connection(
        &self,
        edge: &TopologyEdge,
        source: &ResourceRef,
        target: &ResourceRef,
    ) -> Result<(), MutationError>;
}

/// Kubernetes-style verb checked by access reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Read.
    Get,
    /// Partial update; required to drag a node into a group or draw connectors.
    Patch,
    /// Full update.
    Update,
    /// Delete; required for connector actions.
    Delete,
}

impl Verb {
    /// Lowercase verb string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Patch => "patch",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Access-review descriptor a UI can evaluate to hide or disable an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessReview {
    /// Resolved resource model.
    pub model: ResourceModel,
    /// Verb to review.
    pub verb: Verb,
    /// Object name.
    pub name: String,
    /// Object namespace.
    pub namespace: String,
}

impl AccessReview {
    /// Review `verb` on `resource`.
    pub fn for_resource(resource: &ResourceRef, verb: Verb) -> Self {
        Self {
            model: resource.model(),
            verb,
            name: resource.name.clone(),
            namespace: resource.namespace.clone(),
        }
    }
}

/// Answers access reviews.
pub trait AccessPort {
    /// True when the current user may perform `verb` on `resource`.
    fn has_access(&self, model: &ResourceModel, resource: &ResourceRef, verb: Verb) -> bool;
}

/// Grants everything. Used when the host enforces access elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPort for AllowAll {
    fn has_access(&self, _model: &ResourceModel, _resource: &ResourceRef, _verb: Verb) -> bool {
        true
    }
}

/// Confirmation modal content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    /// Modal title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Label for the confirm button.
    pub confirm_label: String,
}

/// User answer to a confirmation modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Confirm clicked.
    Confirmed,
    /// Cancel clicked or modal dismissed.
    Declined,
}

/// Modal presentation.
pub trait DialogPort {
    /// Show a confirmation modal and wait for the answer.
    async fn confirm(&self, request: ConfirmRequest) -> Decision;

    /// Open the move-connector dialog for `edge` offering `targets`; `None` on cancel.
    async fn choose_move_target(&self, edge: &TopologyEdge, targets: &[NodeId]) -> Option<NodeId>;
}

/// Sets an event source's sink. Used by
/// [`EventSinkCreator`](crate::connector::EventSinkCreator).
pub trait SinkPort {
    /// Point `source` at `sink`.
    async fn set_sink(&self, source: &ResourceRef, sink: &ResourceRef) -> Result<(), MutationError>;
}
