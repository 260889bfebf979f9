// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ports that log instead of writing.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use topo_graph::{NodeId, ResourceRef, TopologyEdge};
use topo_interaction::ports::{ConfirmRequest, Decision, DialogPort, MutationPort};
use topo_interaction::MutationError;
use tracing::info;

/// Mutation port that logs each write and succeeds, except for resources
/// named in its reject list.
#[derive(Debug, Default)]
pub struct DryRunMutations {
    rejected: BTreeSet<String>,
    writes: Cell<usize>,
}

impl DryRunMutations {
    /// Port rejecting every write that touches one of `names`.
    pub fn rejecting<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            rejected: names.into_iter().collect(),
            writes: Cell::new(0),
        }
    }

    /// Writes accepted so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn check(&self, resources: &[&ResourceRef]) -> Result<(), MutationError> {
        if let Some(r) = resources.iter().find(|r| self.rejected.contains(&r.name)) {
            return Err(MutationError::Api(format!(
                "{} {:?} is rejected by this dry run",
                r.kind, r.name
            )));
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl MutationPort for DryRunMutations {
    async fn create_connection(
        &self,
        source: &ResourceRef,
        target: &ResourceRef,
        replace: Option<&ResourceRef>,
    ) -> Result<Vec<ResourceRef>, MutationError> {
        self.check(&[source, target])?;
        info!(
            source = %source.name,
            target = %target.name,
            replace = replace.map(|r| r.name.as_str()),
            "would patch connects-to annotation"
        );
        Ok(vec![source.clone()])
    }

    async fn update_application(
        &self,
        resource: &ResourceRef,
        application: Option<&str>,
    ) -> Result<(), MutationError> {
        self.check(&[resource])?;
        info!(resource = %resource.name, application, "would patch part-of label");
        Ok(())
    }

    async fn remove_connection(
        &self,
        edge: &TopologyEdge,
        source: &ResourceRef,
        target: &ResourceRef,
    ) -> Result<(), MutationError> {
        self.check(&[source, target])?;
        info!(edge = %edge.id, kind = edge.kind.tag(), "would remove relationship");
        Ok(())
    }
}

/// Dialog port answering every confirmation the same way and picking the
/// move target queued by the caller.
#[derive(Debug)]
pub struct DryRunDialogs {
    decision: Decision,
    next_target: RefCell<Option<NodeId>>,
}

impl DryRunDialogs {
    /// Answer confirmations with `decision`.
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            next_target: RefCell::new(None),
        }
    }

    /// Node the next move dialog picks.
    pub fn pick(&self, target: NodeId) {
        self.next_target.replace(Some(target));
    }
}

impl DialogPort for DryRunDialogs {
    async fn confirm(&self, request: ConfirmRequest) -> Decision {
        info!(
            title = %request.title,
            message = %request.message,
            answer = ?self.decision,
            "confirmation"
        );
        self.decision
    }

    async fn choose_move_target(&self, edge: &TopologyEdge, targets: &[NodeId]) -> Option<NodeId> {
        let picked = self
            .next_target
            .take()
            .filter(|t| targets.contains(t));
        info!(edge = %edge.id, offered = targets.len(), picked = ?picked, "move dialog");
        picked
    }
}
