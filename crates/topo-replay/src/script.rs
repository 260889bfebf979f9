// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Replay script format.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use topo_graph::{EdgeId, NodeId, TopologyGraph};
use topo_interaction::{DragSubject, DropTarget, Modifiers};

/// Ordered gesture steps.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    /// Steps, run in order.
    pub steps: Vec<Step>,
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Begin a drag on `subject`, then drop it on `drop` (or nowhere).
    Drag {
        /// Dragged element.
        subject: DragSubject,
        /// Modifiers held when the drag started.
        #[serde(default)]
        modifiers: Modifiers,
        /// Drop target; `None` releases over nothing.
        #[serde(default)]
        drop: Option<DropTarget>,
    },
    /// Log the context menu offered for `edge`.
    EdgeMenu {
        /// Edge to inspect.
        edge: EdgeId,
    },
    /// Pick "Move Connector" from the edge menu and choose `target` in the dialog.
    MoveConnector {
        /// Edge to move.
        edge: EdgeId,
        /// Node picked in the move dialog.
        target: NodeId,
    },
    /// Pick "Delete Connector" from the edge menu.
    DeleteConnector {
        /// Edge to delete.
        edge: EdgeId,
    },
    /// Move `node` into `group`, or out of any group when `group` is absent.
    Regroup {
        /// Node to move.
        node: NodeId,
        /// Destination application group.
        #[serde(default)]
        group: Option<NodeId>,
    },
    /// Replace the live graph, as a resource watch would.
    Refresh {
        /// New graph.
        graph: TopologyGraph,
    },
}

impl Step {
    /// Short name used in logs and reports.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Drag { .. } => "drag",
            Self::EdgeMenu { .. } => "edge_menu",
            Self::MoveConnector { .. } => "move_connector",
            Self::DeleteConnector { .. } => "delete_connector",
            Self::Regroup { .. } => "regroup",
            Self::Refresh { .. } => "refresh",
        }
    }
}

/// Read a JSON document from `path`.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}
