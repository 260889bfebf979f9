// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for topology crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`fixtures`] - Topology graph builder with generated resource references
//! - [`ports`] - Recording/scripted doubles for the interaction engine's ports

pub mod config;
pub mod fixtures;
pub mod ports;

pub use config::InMemoryConfigStore;
pub use fixtures::{resource_for, TopologyBuilder};
pub use ports::{
    MutationCall, RecordingMutations, RecordingNotifier, RecordingSink, ScriptedDialogs,
    StaticAccess,
};
