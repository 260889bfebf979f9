// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Edge context menu actions, connector failures, and connector extensions.

mod common;

use common::{connected, rig, rig_with};
use topo_dry_tests::fixtures::connects_to;
use topo_dry_tests::{
    MutationCall, RecordingMutations, RecordingSink, ScriptedDialogs, TopologyBuilder,
};
use topo_graph::{EdgeId, EdgeKind, NodeId, TopologyGraph};
use topo_interaction::connector::EventSinkCreator;
use topo_interaction::edge_actions::EdgeAction;
use topo_interaction::ports::Verb;
use topo_interaction::{DragSubject, DropTarget, GestureEffect, Modifiers, MutationError, Outcome};

fn abc() -> TopologyGraph {
    TopologyBuilder::new()
        .workload("A")
        .workload("B")
        .workload("C")
        .connect("A", "B")
        .build()
        .unwrap()
}

fn move_action(actions: &[topo_interaction::edge_actions::ActionItem]) -> EdgeAction {
    actions
        .iter()
        .find(|a| a.id == "move-connector")
        .map(|a| a.action.clone())
        .expect("move action offered")
}

// =============================================================================
// Move Connector
// =============================================================================

#[tokio::test]
async fn move_connector_action_repoints_after_success() {
    let mut rig = rig(abc(), ScriptedDialogs::confirming().choosing("C"));
    let actions = rig.controller.edge_actions(&connects_to("A", "B"));
    assert_eq!(actions.len(), 2);
    let review = actions[0].access_review.as_ref().unwrap();
    assert_eq!((review.verb, review.name.as_str()), (Verb::Delete, "A"));

    let outcome = rig.controller.run_edge_action(&move_action(&actions)).await;
    assert_eq!(outcome, Outcome::Done(GestureEffect::ConnectorMoved));
    assert_eq!(
        rig.dialogs.move_requests(),
        [(
            connects_to("A", "B"),
            vec![NodeId::from("B"), NodeId::from("C")]
        )]
    );
    assert_eq!(
        rig.mutations.calls(),
        [MutationCall::CreateConnection {
            source: "A".into(),
            target: "C".into(),
            replace: Some("B".into()),
        }]
    );
    assert!(!connected(&rig.live, "A", "B"));
    assert!(connected(&rig.live, "A", "C"));
}

#[tokio::test]
async fn closing_the_move_dialog_cancels() {
    let mut rig = rig(abc(), ScriptedDialogs::confirming());
    let actions = rig.controller.edge_actions(&connects_to("A", "B"));
    let outcome = rig.controller.run_edge_action(&move_action(&actions)).await;
    assert_eq!(outcome, Outcome::Cancelled);
    assert!(rig.mutations.calls().is_empty());
    assert!(connected(&rig.live, "A", "B"));
}

#[tokio::test]
async fn failed_moves_keep_the_original_edge() {
    let mut rig = rig_with(
        abc(),
        RecordingMutations::failing("conflict"),
        ScriptedDialogs::confirming().choosing("C"),
    );
    let actions = rig.controller.edge_actions(&connects_to("A", "B"));
    let outcome = rig.controller.run_edge_action(&move_action(&actions)).await;
    assert_eq!(outcome, Outcome::Failed(MutationError::Api("conflict".into())));
    assert_eq!(rig.controller.notifier().titles(), ["Error moving connection"]);
    assert!(connected(&rig.live, "A", "B"));
    assert!(!connected(&rig.live, "A", "C"));
}

#[tokio::test]
async fn moving_onto_the_source_is_rejected() {
    let mut rig = rig(abc(), ScriptedDialogs::confirming());
    let outcome = rig
        .controller
        .move_connector(&connects_to("A", "B"), &"A".into())
        .await;
    assert_eq!(outcome, Outcome::Cancelled);
    assert!(rig.mutations.calls().is_empty());
}

// =============================================================================
// Delete Connector
// =============================================================================

#[tokio::test]
async fn delete_confirms_then_removes_after_success() {
    let mut rig = rig(abc(), ScriptedDialogs::confirming());
    let edge = connects_to("A", "B");
    let outcome = rig
        .controller
        .run_edge_action(&EdgeAction::DeleteConnector { edge: edge.clone() })
        .await;
    assert_eq!(outcome, Outcome::Done(GestureEffect::ConnectorRemoved));
    assert_eq!(rig.dialogs.confirmations()[0].title, "Delete Connector?");
    assert_eq!(rig.mutations.calls(), [MutationCall::RemoveConnection { edge }]);
    assert_eq!(rig.live.read().edge_count(), 0);
}

#[tokio::test]
async fn declined_delete_keeps_the_edge() {
    let mut rig = rig(abc(), ScriptedDialogs::declining());
    let outcome = rig.controller.remove_connector(&connects_to("A", "B")).await;
    assert_eq!(outcome, Outcome::Cancelled);
    assert!(rig.mutations.calls().is_empty());
    assert!(rig.controller.notifier().errors.is_empty());
    assert!(connected(&rig.live, "A", "B"));
}

#[tokio::test]
async fn failed_delete_notifies() {
    let mut rig = rig_with(
        abc(),
        RecordingMutations::failing("forbidden"),
        ScriptedDialogs::confirming(),
    );
    let outcome = rig.controller.remove_connector(&connects_to("A", "B")).await;
    assert!(outcome.is_failed());
    assert_eq!(rig.controller.notifier().titles(), ["Error deleting connection"]);
    assert!(connected(&rig.live, "A", "B"));
}

#[tokio::test]
async fn unknown_edges_fail_without_calls() {
    let mut rig = rig(abc(), ScriptedDialogs::confirming());
    let gone = EdgeId::from("gone");
    let outcome = rig.controller.remove_connector(&gone).await;
    assert_eq!(outcome, Outcome::Failed(MutationError::UnknownEdge(gone.clone())));
    assert!(rig.controller.edge_actions(&gone).is_empty());
    assert!(rig.mutations.calls().is_empty());
}

#[tokio::test]
async fn derived_edges_cannot_be_deleted() {
    let graph = TopologyBuilder::new()
        .workload("K")
        .workload("R")
        .edge(EdgeKind::TrafficConnector, "K", "R")
        .build()
        .unwrap();
    let mut rig = rig(graph, ScriptedDialogs::confirming());
    let edge = EdgeId::between(&"K".into(), &"R".into(), &EdgeKind::TrafficConnector);
    let outcome = rig
        .controller
        .run_edge_action(&EdgeAction::DeleteConnector { edge: edge.clone() })
        .await;
    assert_eq!(outcome, Outcome::Cancelled);
    assert!(rig.dialogs.confirmations().is_empty());
    assert!(rig.mutations.calls().is_empty());
    assert!(rig.live.read().edge(&edge).is_some());
}

#[test]
fn service_bindings_only_offer_delete() {
    let graph = TopologyBuilder::new()
        .workload("A")
        .workload("B")
        .workload("C")
        .edge(EdgeKind::ServiceBinding, "A", "B")
        .build()
        .unwrap();
    let rig = rig(graph, ScriptedDialogs::confirming());
    let edge = EdgeId::between(&"A".into(), &"B".into(), &EdgeKind::ServiceBinding);
    let labels: Vec<_> = rig
        .controller
        .edge_actions(&edge)
        .iter()
        .map(|a| a.label)
        .collect();
    assert_eq!(labels, ["Delete Connector"]);
}

// =============================================================================
// Connector creation failures
// =============================================================================

#[tokio::test]
async fn failed_creation_notifies_and_adds_nothing() {
    let graph = TopologyBuilder::new().workload("A").workload("B").build().unwrap();
    let mut rig = rig_with(
        graph,
        RecordingMutations::failing("quota exceeded"),
        ScriptedDialogs::confirming(),
    );
    rig.controller
        .begin_drag(DragSubject::ConnectorHandle("A".into()), Modifiers::NONE);
    let outcome = rig.controller.drop(Some(DropTarget::Node("B".into()))).await;
    assert_eq!(outcome, Outcome::Failed(MutationError::Api("quota exceeded".into())));
    let notifier = rig.controller.notifier();
    assert_eq!(notifier.titles(), ["Error creating connection"]);
    assert_eq!(notifier.errors[0].1, "quota exceeded");
    assert_eq!(rig.live.read().edge_count(), 0);
}

#[tokio::test]
async fn unmanaged_targets_fail_before_any_call() {
    let graph = TopologyBuilder::new().workload("A").unmanaged("U").build().unwrap();
    let mut rig = rig(graph, ScriptedDialogs::confirming());
    let outcome = rig
        .controller
        .create_connector(&"A".into(), &DropTarget::Node("U".into()))
        .await;
    assert_eq!(outcome, Outcome::Failed(MutationError::MissingResource("U".into())));
    assert!(rig.mutations.calls().is_empty());
}

// =============================================================================
// Extensions
// =============================================================================

#[tokio::test]
async fn event_sources_connect_through_the_sink_extension() {
    let graph = TopologyBuilder::new()
        .event_source("ping")
        .knative_service("ksvc")
        .knative_service("ksvc2")
        .build()
        .unwrap();
    let sink = RecordingSink::default();
    let rig = rig(graph, ScriptedDialogs::confirming());
    let (mutations, live) = (rig.mutations, rig.live);
    let mut controller = rig
        .controller
        .with_extension(EventSinkCreator::new(sink.clone()));

    controller.begin_drag(DragSubject::ConnectorHandle("ping".into()), Modifiers::NONE);
    let outcome = controller.drop(Some(DropTarget::Node("ksvc".into()))).await;
    assert_eq!(outcome, Outcome::Done(GestureEffect::ConnectorCreated));
    assert!(live
        .read()
        .find_edge(&"ping".into(), &"ksvc".into(), &EdgeKind::EventSourceLink)
        .is_some());

    // A second sink re-points the existing link.
    controller.begin_drag(DragSubject::ConnectorHandle("ping".into()), Modifiers::NONE);
    let outcome = controller.drop(Some(DropTarget::Node("ksvc2".into()))).await;
    assert_eq!(outcome, Outcome::Done(GestureEffect::ConnectorCreated));
    assert!(!connected(&live, "ping", "ksvc"));
    assert!(connected(&live, "ping", "ksvc2"));
    assert_eq!(live.read().edge_count(), 1);

    assert_eq!(
        sink.calls(),
        [
            ("ping".to_owned(), "ksvc".to_owned()),
            ("ping".to_owned(), "ksvc2".to_owned())
        ]
    );
    assert!(mutations.calls().is_empty());
}

#[tokio::test]
async fn extensions_leave_other_drops_to_the_generic_path() {
    let graph = TopologyBuilder::new()
        .workload("A")
        .knative_service("ksvc")
        .build()
        .unwrap();
    let sink = RecordingSink::default();
    let rig = rig(graph, ScriptedDialogs::confirming());
    let mutations = rig.mutations;
    let mut controller = rig
        .controller
        .with_extension(EventSinkCreator::new(sink.clone()));

    let outcome = controller
        .create_connector(&"A".into(), &DropTarget::Node("ksvc".into()))
        .await;
    assert_eq!(outcome, Outcome::Done(None));
    assert!(sink.calls().is_empty());
    assert_eq!(mutations.calls().len(), 1);
}
