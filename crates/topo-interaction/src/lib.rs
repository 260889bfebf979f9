// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drag-and-drop interaction engine for topology graphs.
//!
//! Classifies what a drag means, validates drop targets while the pointer
//! moves, and runs the protocols a finished gesture triggers: creating or
//! re-pointing connectors, moving nodes between application groups, and the
//! edge context menu. Collaborators (resource API, modals, access reviews)
//! sit behind the traits in [`ports`].

pub mod capabilities;
pub mod classifier;
pub mod connector;
pub mod controller;
pub mod edge_actions;
pub mod edge_rules;
pub mod gesture;
pub mod live;
pub mod operation;
pub mod outcome;
pub mod ports;
pub mod regroup;
pub mod validator;

pub use controller::{GestureEffect, TopologyController};
pub use gesture::{DragSession, DragSubject, DropTarget, GestureContext, Modifiers};
pub use live::LiveGraph;
pub use operation::{OperationDescriptor, OperationKind};
pub use outcome::{MutationError, Outcome};
