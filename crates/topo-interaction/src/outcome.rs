// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Gesture results and mutation errors.

use thiserror::Error;
use topo_graph::{EdgeId, NodeId};

/// Failure of a mutation request or of resolving what to mutate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The backing API rejected the request or could not be reached.
    #[error("{0}")]
    Api(String),
    /// The node has no resolvable backing resource.
    #[error("no resource backs node {0}")]
    MissingResource(NodeId),
    /// The node is not in the live graph.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    /// The edge is not in the live graph.
    #[error("unknown edge: {0}")]
    UnknownEdge(EdgeId),
}

/// Result of a gesture-scoped operation.
///
/// `Cancelled` covers both a declined confirmation and a no-op guard; it is
/// never surfaced as an error. `Failed` always carries the cause and has
/// already been reported through the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    /// Completed; any optimistic update has been applied.
    Done(T),
    /// Nothing was mutated.
    Cancelled,
    /// The mutation failed; the graph is unchanged.
    Failed(MutationError),
}

impl<T> Outcome<T> {
    /// Map the completed value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Done(v) => Outcome::Done(f(v)),
            Self::Cancelled => Outcome::Cancelled,
            Self::Failed(e) => Outcome::Failed(e),
        }
    }

    /// True for [`Outcome::Done`].
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// True for [`Outcome::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// True for [`Outcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The completed value, if any.
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(v) => Some(v),
            _ => None,
        }
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&MutationError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}
