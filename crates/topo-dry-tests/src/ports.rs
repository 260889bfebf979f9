// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port doubles for driving `TopologyController` in tests.
//!
//! Clones share state through `Rc<RefCell<_>>`: hand one clone to the
//! controller and keep the other to inspect calls afterwards.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use topo_app_core::notify::Notifier;
use topo_graph::{EdgeId, NodeId, ResourceModel, ResourceRef, TopologyEdge, TopologyGraph};
use topo_interaction::ports::{
    AccessPort, ConfirmRequest, Decision, DialogPort, MutationPort, SinkPort, Verb,
};
use topo_interaction::{LiveGraph, MutationError};

/// One recorded [`MutationPort`] call, with resources reduced to their names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationCall {
    /// `create_connection(source, target, replace)`.
    CreateConnection {
        /// Source resource name.
        source: String,
        /// Target resource name.
        target: String,
        /// Replaced target resource name.
        replace: Option<String>,
    },
    /// `update_application(resource, application)`.
    UpdateApplication {
        /// Resource name.
        resource: String,
        /// New application label.
        application: Option<String>,
    },
    /// `remove_connection(edge, ..)`.
    RemoveConnection {
        /// Edge removed.
        edge: EdgeId,
    },
}

#[derive(Debug, Default)]
struct MutationState {
    calls: Vec<MutationCall>,
    fail_with: Option<String>,
    refresh: Option<(LiveGraph, TopologyGraph)>,
}

/// [`MutationPort`] that records calls and can fail or race a refresh.
#[derive(Debug, Clone, Default)]
pub struct RecordingMutations {
    state: Rc<RefCell<MutationState>>,
}

impl RecordingMutations {
    /// Succeeding port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Port whose calls all fail with `message`.
    pub fn failing(message: &str) -> Self {
        let port = Self::new();
        port.state.borrow_mut().fail_with = Some(message.to_owned());
        port
    }

    /// Replace `live` with `graph` while the next call is in flight, as a
    /// resource-watch refresh would.
    pub fn refresh_during_next_call(&self, live: &LiveGraph, graph: TopologyGraph) {
        self.state.borrow_mut().refresh = Some((live.clone(), graph));
    }

    /// Calls so far.
    pub fn calls(&self) -> Vec<MutationCall> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: MutationCall) -> Result<(), MutationError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if let Some((live, graph)) = state.refresh.take() {
            live.replace(graph);
        }
        match &state.fail_with {
            Some(message) => Err(MutationError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

impl MutationPort for RecordingMutations {
    async fn create_connection(
        &self,
        source: &ResourceRef,
        target: &ResourceRef,
        replace: Option<&ResourceRef>,
    ) -> Result<Vec<ResourceRef>, MutationError> {
        self.record(MutationCall::CreateConnection {
            source: source.name.clone(),
            target: target.name.clone(),
            replace: replace.map(|r| r.name.clone()),
        })?;
        Ok(vec![source.clone()])
    }

    async fn update_application(
        &self,
        resource: &ResourceRef,
        application: Option<&str>,
    ) -> Result<(), MutationError> {
        self.record(MutationCall::UpdateApplication {
            resource: resource.name.clone(),
            application: application.map(str::to_owned),
        })
    }

    async fn remove_connection(
        &self,
        edge: &TopologyEdge,
        _source: &ResourceRef,
        _target: &ResourceRef,
    ) -> Result<(), MutationError> {
        self.record(MutationCall::RemoveConnection {
            edge: edge.id.clone(),
        })
    }
}

#[derive(Debug)]
struct DialogState {
    decision: Decision,
    move_target: Option<NodeId>,
    confirmations: Vec<ConfirmRequest>,
    move_requests: Vec<(EdgeId, Vec<NodeId>)>,
}

/// [`DialogPort`] answering from a script and recording what it was shown.
#[derive(Debug, Clone)]
pub struct ScriptedDialogs {
    state: Rc<RefCell<DialogState>>,
}

impl Default for ScriptedDialogs {
    fn default() -> Self {
        Self::confirming()
    }
}

impl ScriptedDialogs {
    fn answering(decision: Decision) -> Self {
        Self {
            state: Rc::new(RefCell::new(DialogState {
                decision,
                move_target: None,
                confirmations: Vec::new(),
                move_requests: Vec::new(),
            })),
        }
    }

    /// Confirms everything; the move dialog is cancelled.
    pub fn confirming() -> Self {
        Self::answering(Decision::Confirmed)
    }

    /// Declines everything; the move dialog is cancelled.
    pub fn declining() -> Self {
        Self::answering(Decision::Declined)
    }

    /// Pick `target` in the move dialog.
    pub fn choosing(self, target: &str) -> Self {
        self.state.borrow_mut().move_target = Some(target.into());
        self
    }

    /// Confirmations shown so far.
    pub fn confirmations(&self) -> Vec<ConfirmRequest> {
        self.state.borrow().confirmations.clone()
    }

    /// Move dialogs opened so far, with the targets they offered.
    pub fn move_requests(&self) -> Vec<(EdgeId, Vec<NodeId>)> {
        self.state.borrow().move_requests.clone()
    }
}

impl DialogPort for ScriptedDialogs {
    async fn confirm(&self, request: ConfirmRequest) -> Decision {
        let mut state = self.state.borrow_mut();
        state.confirmations.push(request);
        state.decision
    }

    async fn choose_move_target(&self, edge: &TopologyEdge, targets: &[NodeId]) -> Option<NodeId> {
        let mut state = self.state.borrow_mut();
        state.move_requests.push((edge.id.clone(), targets.to_vec()));
        state.move_target.clone()
    }
}

/// [`Notifier`] that keeps every error.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    /// `(title, message)` pairs in order.
    pub errors: Vec<(String, String)>,
}

impl RecordingNotifier {
    /// Titles in order.
    pub fn titles(&self) -> Vec<&str> {
        self.errors.iter().map(|(t, _)| t.as_str()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&mut self, title: &str, message: &str) {
        self.errors.push((title.to_owned(), message.to_owned()));
    }
}

/// [`AccessPort`] granting everything except listed `(name, verb)` pairs.
#[derive(Debug, Clone, Default)]
pub struct StaticAccess {
    denied: HashSet<(String, Verb)>,
}

impl StaticAccess {
    /// Grant everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny `verb` on the resource named `name`.
    pub fn deny(mut self, name: &str, verb: Verb) -> Self {
        self.denied.insert((name.to_owned(), verb));
        self
    }
}

impl AccessPort for StaticAccess {
    fn has_access(&self, _model: &ResourceModel, resource: &ResourceRef, verb: Verb) -> bool {
        !self.denied.contains(&(resource.name.clone(), verb))
    }
}

/// [`SinkPort`] recording `(source, sink)` name pairs.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingSink {
    /// Calls so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl SinkPort for RecordingSink {
    async fn set_sink(&self, source: &ResourceRef, sink: &ResourceRef) -> Result<(), MutationError> {
        self.calls
            .borrow_mut()
            .push((source.name.clone(), sink.name.clone()));
        Ok(())
    }
}
