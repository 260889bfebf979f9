// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Runs a script through a [`TopologyController`] wired to dry-run ports.

use std::time::Instant;

use serde::Serialize;
use topo_app_core::notify::NotificationCenter;
use topo_app_core::prefs::InteractionPrefs;
use topo_graph::{EdgeId, NodeId, TopologyGraph};
use topo_interaction::edge_actions::{ActionItem, EdgeAction};
use topo_interaction::ports::Decision;
use topo_interaction::{GestureEffect, LiveGraph, Outcome, TopologyController};
use tracing::{info, warn};

use crate::dry_run::{DryRunDialogs, DryRunMutations};
use crate::script::{Script, Step};

type Controller = TopologyController<DryRunMutations, DryRunDialogs, NotificationCenter>;

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepResult {
    /// Completed with the described effect.
    Done(String),
    /// Declined, guarded, or dropped on an invalid target.
    Cancelled,
    /// A mutation failed; carries the notified message.
    Failed(String),
    /// The edge menu did not offer the requested action.
    NotOffered,
}

impl From<Outcome<GestureEffect>> for StepResult {
    fn from(outcome: Outcome<GestureEffect>) -> Self {
        match outcome {
            Outcome::Done(effect) => Self::Done(describe(&effect)),
            Outcome::Cancelled => Self::Cancelled,
            Outcome::Failed(err) => Self::Failed(err.to_string()),
        }
    }
}

/// Report line for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Zero-based step index.
    pub index: usize,
    /// Step op name.
    pub op: &'static str,
    /// Result.
    #[serde(flatten)]
    pub result: StepResult,
}

fn describe(effect: &GestureEffect) -> String {
    match effect {
        GestureEffect::Unchanged => "unchanged".into(),
        GestureEffect::Menu(items) => {
            let labels: Vec<_> = items.iter().map(|i| i.label).collect();
            format!("menu: {}", labels.join(", "))
        }
        GestureEffect::ConnectorCreated => "connector created".into(),
        GestureEffect::ConnectorMoved => "connector moved".into(),
        GestureEffect::ConnectorRemoved => "connector removed".into(),
        GestureEffect::NodeRegrouped => "node regrouped".into(),
    }
}

/// Replays scripts against one live graph.
pub struct Replayer {
    controller: Controller,
}

impl Replayer {
    /// Replayer over `graph`. Writes touching a `rejected` resource name fail;
    /// every confirmation is answered with `decision`.
    pub fn new(
        graph: TopologyGraph,
        prefs: InteractionPrefs,
        decision: Decision,
        rejected: Vec<String>,
    ) -> Self {
        let notifier = NotificationCenter::new(&prefs.notifications);
        let controller = TopologyController::new(
            LiveGraph::new(graph),
            DryRunMutations::rejecting(rejected),
            DryRunDialogs::new(decision),
            notifier,
        )
        .with_prefs(prefs);
        Self { controller }
    }

    /// Run every step in order; a failing step does not stop the script.
    pub async fn run(&mut self, script: &Script) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(script.steps.len());
        for (index, step) in script.steps.iter().enumerate() {
            let result = self.step(step).await;
            match &result {
                StepResult::Failed(message) => warn!(index, op = step.op(), %message, "step failed"),
                other => info!(index, op = step.op(), result = ?other, "step"),
            }
            reports.push(StepReport {
                index,
                op: step.op(),
                result,
            });
        }
        reports
    }

    async fn step(&mut self, step: &Step) -> StepResult {
        match step {
            Step::Drag {
                subject,
                modifiers,
                drop,
            } => {
                let operation = self.controller.begin_drag(subject.clone(), *modifiers);
                info!(?subject, operation = ?operation.map(|o| o.kind), "drag started");
                if let Some(target) = drop {
                    let candidate = self.controller.hover(Some(target.clone()));
                    info!(?target, can_drop = candidate.can_drop, "hover");
                }
                self.controller.drop(drop.clone()).await.into()
            }
            Step::EdgeMenu { edge } => {
                let actions = self.controller.edge_actions(edge);
                log_menu(edge, &actions);
                StepResult::Done(format!("{} action(s)", actions.len()))
            }
            Step::MoveConnector { edge, target } => {
                let Some(action) = self.offered(edge, "move-connector") else {
                    return StepResult::NotOffered;
                };
                self.controller.dialogs().pick(target.clone());
                self.controller.run_edge_action(&action).await.into()
            }
            Step::DeleteConnector { edge } => {
                let Some(action) = self.offered(edge, "delete-connector") else {
                    return StepResult::NotOffered;
                };
                self.controller.run_edge_action(&action).await.into()
            }
            Step::Regroup { node, group } => self
                .controller
                .move_node_to_group(node, group.as_ref())
                .await
                .map(|()| GestureEffect::NodeRegrouped)
                .into(),
            Step::Refresh { graph } => {
                self.controller.refresh(graph.clone());
                StepResult::Done(format!("{} node(s)", graph.node_count()))
            }
        }
    }

    fn offered(&self, edge: &EdgeId, id: &str) -> Option<EdgeAction> {
        self.controller
            .edge_actions(edge)
            .into_iter()
            .find(|a| a.id == id)
            .map(|a| a.action)
    }

    /// Edge menus for every edge in the live graph.
    pub fn menus(&self) -> Vec<(EdgeId, Vec<ActionItem>)> {
        let ids: Vec<EdgeId> = self.controller.graph().read().edges().map(|e| e.id.clone()).collect();
        ids.into_iter()
            .map(|id| {
                let actions = self.controller.edge_actions(&id);
                (id, actions)
            })
            .collect()
    }

    /// Owned copy of the live graph.
    pub fn graph(&self) -> TopologyGraph {
        self.controller.graph().snapshot()
    }

    /// Writes the dry-run port accepted.
    pub fn writes(&self) -> usize {
        self.controller.mutations().writes()
    }

    /// Error notifications still visible, as `(title, message)`.
    pub fn notifications(&self) -> Vec<(String, String)> {
        self.controller
            .notifier()
            .visible(Instant::now())
            .into_iter()
            .map(|n| (n.title.clone(), n.message.clone()))
            .collect()
    }
}

/// Log `actions` offered for `edge`.
pub fn log_menu(edge: &EdgeId, actions: &[ActionItem]) {
    if actions.is_empty() {
        info!(%edge, "no actions");
    }
    for item in actions {
        let targets: Vec<&NodeId> = match &item.action {
            EdgeAction::MoveConnector { targets, .. } => targets.iter().collect(),
            EdgeAction::DeleteConnector { .. } => Vec::new(),
        };
        info!(
            %edge,
            action = item.id,
            review = ?item.access_review.as_ref().map(|r| (r.verb.as_str(), r.name.as_str())),
            ?targets,
            "menu item"
        );
    }
}
