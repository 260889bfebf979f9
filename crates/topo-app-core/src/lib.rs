// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for topology tools (config, prefs, notifications).
//! Keeps the interaction engine and its adapters thin and framework-agnostic.

pub mod config;
pub mod notify;
pub mod prefs;
