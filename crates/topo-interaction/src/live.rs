// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared handle to the live graph.
//!
//! The resource-watch layer and the controller both hold a [`LiveGraph`]. A
//! refresh may replace the graph while a mutation is awaiting, so the engine
//! never keeps a borrow across an `.await`; it re-reads the graph after the
//! port resolves.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use topo_graph::{GraphOp, TopologyGraph};
use tracing::debug;

/// Cloneable, single-threaded handle to the current graph.
#[derive(Debug, Clone, Default)]
pub struct LiveGraph {
    inner: Rc<RefCell<TopologyGraph>>,
}

impl LiveGraph {
    /// Wrap `graph`.
    pub fn new(graph: TopologyGraph) -> Self {
        Self {
            inner: Rc::new(RefCell::new(graph)),
        }
    }

    /// Borrow the current graph. Do not hold across an `.await`.
    pub fn read(&self) -> Ref<'_, TopologyGraph> {
        self.inner.borrow()
    }

    /// Swap in a freshly built graph; returns the previous one.
    pub fn replace(&self, graph: TopologyGraph) -> TopologyGraph {
        self.inner.replace(graph)
    }

    /// Owned copy of the current graph.
    pub fn snapshot(&self) -> TopologyGraph {
        self.inner.borrow().clone()
    }

    /// Apply optimistic ops after a successful mutation. Ops that no longer fit
    /// (their nodes or edges vanished in a refresh) are skipped; the next
    /// refresh reflects reality anyway. Returns how many ops applied.
    pub fn apply_optimistic(&self, ops: Vec<GraphOp>) -> usize {
        let mut graph = self.inner.borrow_mut();
        let mut applied = 0;
        for op in ops {
            match graph.apply_op(op) {
                Ok(()) => applied += 1,
                Err(err) => debug!(%err, "skipping stale optimistic update"),
            }
        }
        applied
    }
}
