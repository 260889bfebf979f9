// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Gesture controller.
//!
//! Owns the ports and the drag session, and routes a finished gesture to the
//! connector or regroup protocol. The protocols themselves live in
//! [`crate::connector`], [`crate::regroup`] and [`crate::edge_actions`] as
//! further `impl` blocks on [`TopologyController`].

use topo_app_core::notify::Notifier;
use topo_app_core::prefs::InteractionPrefs;
use topo_graph::{GraphElement, ResourceRef, TopologyGraph, TopologyNode};
use tracing::{debug, warn};

use crate::capabilities::{self, ElementCapabilities};
use crate::classifier;
use crate::connector::{ConnectorCreator, ConnectorExtensions, MenuItem};
use crate::gesture::{DragSession, DragSubject, DropTarget, GestureContext, Modifiers};
use crate::live::LiveGraph;
use crate::operation::{OperationDescriptor, OperationKind};
use crate::outcome::{MutationError, Outcome};
use crate::ports::{
    AccessPort, AllowAll, DialogPort, MutationPort, NodeResources, ResourcePort,
};
use crate::validator::{self, DropCandidate};

/// What a finished gesture changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEffect {
    /// Nothing to commit (plain move, re-drop on the current target, rejected drop).
    Unchanged,
    /// The drop was ambiguous; the user picks from these creation actions.
    Menu(Vec<MenuItem>),
    /// A connector was created.
    ConnectorCreated,
    /// A connector now points at a different node.
    ConnectorMoved,
    /// A connector was deleted.
    ConnectorRemoved,
    /// A node moved into, out of, or between groups.
    NodeRegrouped,
}

/// Drives drag gestures against a live graph and a set of collaborator ports.
pub struct TopologyController<M, D, N> {
    pub(crate) graph: LiveGraph,
    pub(crate) mutations: M,
    pub(crate) dialogs: D,
    pub(crate) notifier: N,
    pub(crate) resources: Box<dyn ResourcePort>,
    pub(crate) access: Box<dyn AccessPort>,
    pub(crate) extensions: ConnectorExtensions,
    prefs: InteractionPrefs,
    session: Option<DragSession>,
}

impl<M, D, N> TopologyController<M, D, N> {
    /// Controller over `graph`. Resources resolve from node data and access
    /// is granted unless [`with_access`](Self::with_access) installs a policy.
    pub fn new(graph: LiveGraph, mutations: M, dialogs: D, notifier: N) -> Self {
        Self {
            graph,
            mutations,
            dialogs,
            notifier,
            resources: Box::new(NodeResources),
            access: Box::new(AllowAll),
            extensions: ConnectorExtensions::default(),
            prefs: InteractionPrefs::default(),
            session: None,
        }
    }

    /// Use `prefs` (regroup modifier etc.).
    pub fn with_prefs(mut self, prefs: InteractionPrefs) -> Self {
        self.prefs = prefs;
        self
    }

    /// Install an access-review policy.
    pub fn with_access(mut self, access: impl AccessPort + 'static) -> Self {
        self.access = Box::new(access);
        self
    }

    /// Install a resource resolver.
    pub fn with_resources(mut self, resources: impl ResourcePort + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }

    /// Append a connector-creation extension; earlier ones win.
    pub fn with_extension(mut self, creator: impl ConnectorCreator + 'static) -> Self {
        self.extensions.register(creator);
        self
    }

    /// Live graph handle.
    pub fn graph(&self) -> &LiveGraph {
        &self.graph
    }

    /// Active preferences.
    pub fn prefs(&self) -> &InteractionPrefs {
        &self.prefs
    }

    /// Mutation port.
    pub fn mutations(&self) -> &M {
        &self.mutations
    }

    /// Dialog port.
    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    /// Notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Mutable notifier (e.g. to dismiss entries).
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Drag in progress, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Replace the graph with a freshly watched one. A drag whose subject
    /// disappeared is abandoned.
    pub fn refresh(&mut self, graph: TopologyGraph) {
        let stale = self.session.as_ref().is_some_and(|s| match s.subject() {
            DragSubject::Node(id) | DragSubject::ConnectorHandle(id) => !graph.contains_node(id),
            DragSubject::EdgeEndpoint(id) => graph.edge(id).is_none(),
        });
        if stale {
            debug!("drag subject vanished in refresh; abandoning gesture");
            self.session = None;
        }
        self.graph.replace(graph);
    }

    /// Capabilities the rendering layer attaches to `element`.
    pub fn capabilities(&self, element: &GraphElement) -> ElementCapabilities {
        capabilities::capabilities_for(&self.graph.read(), element)
    }

    /// Start a drag. The operation is classified once and frozen for the
    /// gesture; `None` means a plain move. Replaces any abandoned session.
    pub fn begin_drag(
        &mut self,
        subject: DragSubject,
        modifiers: Modifiers,
    ) -> Option<OperationDescriptor> {
        let context = GestureContext::new(modifiers, self.prefs.regroup_modifier);
        let classified = classifier::classify(
            &self.graph.read(),
            &subject,
            &context,
            self.resources.as_ref(),
            self.access.as_ref(),
        );
        let operation = classified
            .clone()
            .unwrap_or_else(OperationDescriptor::plain_move);
        debug!(?subject, kind = ?operation.kind, "drag started");
        self.session = Some(DragSession::new(subject, operation, context));
        classified
    }

    /// Pointer moved over `target` (`None` = over nothing). Returns the
    /// affordance for the hovered zone.
    pub fn hover(&mut self, target: Option<DropTarget>) -> DropCandidate {
        let Some(session) = self.session.as_mut() else {
            return DropCandidate::default();
        };
        session.set_hovered(target.clone());
        match target {
            Some(t) => validator::drop_candidate(&self.graph.read(), self.session.as_ref(), &t),
            None => DropCandidate::default(),
        }
    }

    /// Affordance for any registered drop zone during the current drag.
    pub fn drop_candidate(&self, target: &DropTarget) -> DropCandidate {
        validator::drop_candidate(&self.graph.read(), self.session.as_ref(), target)
    }

    /// Abort the drag (escape key, pointer lost). Nothing is mutated.
    pub fn cancel(&mut self) -> Outcome<GestureEffect> {
        match self.session.take() {
            Some(session) => {
                debug!(kind = ?session.operation().kind, "drag cancelled");
                Outcome::Cancelled
            }
            None => Outcome::Done(GestureEffect::Unchanged),
        }
    }

    pub(crate) fn resource(&self, node: &TopologyNode) -> Result<ResourceRef, MutationError> {
        self.resources
            .resource_of(node)
            .ok_or_else(|| MutationError::MissingResource(node.id.clone()))
    }
}

impl<M, D, N> TopologyController<M, D, N>
where
    M: MutationPort,
    D: DialogPort,
    N: Notifier,
{
    /// Finish the drag over `target` (`None` = outside every drop zone).
    ///
    /// A rejected or missing target commits nothing; for a regroup that is
    /// reported as [`Outcome::Cancelled`].
    pub async fn drop(&mut self, target: Option<DropTarget>) -> Outcome<GestureEffect> {
        let Some(session) = self.session.take() else {
            return Outcome::Done(GestureEffect::Unchanged);
        };
        let kind = session.operation().kind;
        let rejected = || {
            if kind == OperationKind::Regroup {
                Outcome::Cancelled
            } else {
                Outcome::Done(GestureEffect::Unchanged)
            }
        };
        let Some(target) = target else {
            debug!(?kind, "dropped outside any target");
            return rejected();
        };
        let accepted = validator::accepts(
            &self.graph.read(),
            session.subject(),
            session.operation(),
            &target,
        );
        if !accepted {
            debug!(?kind, ?target, "drop target rejected");
            return rejected();
        }

        match (session.subject(), target) {
            (DragSubject::Node(node), DropTarget::Group(group)) => self
                .move_node_to_group(node, Some(&group))
                .await
                .map(|()| GestureEffect::NodeRegrouped),
            (DragSubject::Node(node), DropTarget::Graph) => self
                .move_node_to_group(node, None)
                .await
                .map(|()| GestureEffect::NodeRegrouped),
            (DragSubject::ConnectorHandle(source), target) => self
                .create_connector(source, &target)
                .await
                .map(|menu| menu.map_or(GestureEffect::ConnectorCreated, GestureEffect::Menu)),
            (DragSubject::EdgeEndpoint(edge), DropTarget::Node(node)) => {
                self.move_connector(edge, &node).await
            }
            _ => Outcome::Done(GestureEffect::Unchanged),
        }
    }

    /// Report a failed mutation and turn it into an outcome.
    pub(crate) fn fail<T>(&mut self, title: &str, err: MutationError) -> Outcome<T> {
        warn!(%err, "{title}");
        self.notifier.error(title, &err.to_string());
        Outcome::Failed(err)
    }
}
