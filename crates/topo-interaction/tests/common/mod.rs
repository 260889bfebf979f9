// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use topo_dry_tests::{RecordingMutations, RecordingNotifier, ScriptedDialogs};
use topo_graph::{NodeId, TopologyGraph};
use topo_interaction::{LiveGraph, TopologyController};

pub type Controller = TopologyController<RecordingMutations, ScriptedDialogs, RecordingNotifier>;

/// Controller over `graph` plus handles to inspect its ports afterwards.
pub struct Rig {
    pub controller: Controller,
    pub mutations: RecordingMutations,
    pub dialogs: ScriptedDialogs,
    pub live: LiveGraph,
}

pub fn rig(graph: TopologyGraph, dialogs: ScriptedDialogs) -> Rig {
    rig_with(graph, RecordingMutations::new(), dialogs)
}

pub fn rig_with(graph: TopologyGraph, mutations: RecordingMutations, dialogs: ScriptedDialogs) -> Rig {
    let live = LiveGraph::new(graph);
    let controller = TopologyController::new(
        live.clone(),
        mutations.clone(),
        dialogs.clone(),
        RecordingNotifier::default(),
    );
    Rig {
        controller,
        mutations,
        dialogs,
        live,
    }
}

pub fn parent_of(live: &LiveGraph, id: &str) -> Option<String> {
    live.read()
        .node(&NodeId::from(id))
        .and_then(|n| n.parent.as_ref())
        .map(|p| p.0.clone())
}

pub fn connected(live: &LiveGraph, source: &str, target: &str) -> bool {
    live.read()
        .has_edge_between(&NodeId::from(source), &NodeId::from(target))
}
