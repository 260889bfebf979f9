// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `topo-replay`: replay scripted drag/drop gestures against a topology
//! snapshot, logging the writes a live console would have made.

mod dry_run;
mod replay;
mod script;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use topo_app_core::config::{ConfigService, INTERACTION_PREFS_KEY};
use topo_app_core::prefs::InteractionPrefs;
use topo_config_fs::FsConfigStore;
use topo_graph::TopologyGraph;
use topo_interaction::ports::Decision;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::replay::{log_menu, Replayer, StepResult};
use crate::script::{read_json, Script};

#[derive(Parser, Debug)]
#[command(name = "topo-replay", version, about = "Replay topology gestures with dry-run ports")]
struct Cli {
    /// Directory holding `topology_interaction.json`; defaults to the user config dir
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a script against a graph snapshot
    Run {
        /// Path to the graph snapshot (JSON)
        graph: PathBuf,
        /// Path to the script (JSON)
        script: PathBuf,
        /// Answer every confirmation with "cancel"
        #[arg(long)]
        decline: bool,
        /// Reject writes touching this resource name (repeatable)
        #[arg(long)]
        reject: Vec<String>,
        /// Write the resulting graph here
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write the per-step report here
        #[arg(long)]
        report: Option<PathBuf>,
        /// Exit non-zero when any step failed
        #[arg(long)]
        strict: bool,
    },
    /// Log the context menu of every edge in a snapshot
    Inspect {
        /// Path to the graph snapshot (JSON)
        graph: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .init();

    let prefs = load_prefs(cli.config_dir.as_deref());

    match cli.command {
        Commands::Run {
            graph,
            script,
            decline,
            reject,
            out,
            report,
            strict,
        } => {
            let graph: TopologyGraph = read_json(&graph)?;
            let script: Script = read_json(&script)?;
            let decision = if decline {
                Decision::Declined
            } else {
                Decision::Confirmed
            };

            let mut replayer = Replayer::new(graph, prefs, decision, reject);
            let reports = replayer.run(&script).await;
            let failed = reports
                .iter()
                .filter(|r| matches!(r.result, StepResult::Failed(_)))
                .count();
            let final_graph = replayer.graph();
            info!(
                steps = reports.len(),
                failed,
                writes = replayer.writes(),
                nodes = final_graph.node_count(),
                edges = final_graph.edge_count(),
                "replay finished"
            );
            for (title, message) in replayer.notifications() {
                warn!(%title, %message, "notification");
            }

            if let Some(path) = out {
                write_json(&path, &final_graph)?;
            }
            if let Some(path) = report {
                write_json(&path, &reports)?;
            }
            if strict && failed > 0 {
                bail!("{failed} step(s) failed");
            }
        }
        Commands::Inspect { graph } => {
            let graph: TopologyGraph = read_json(&graph)?;
            let replayer = Replayer::new(graph, prefs, Decision::Declined, Vec::new());
            for (edge, actions) in replayer.menus() {
                log_menu(&edge, &actions);
            }
        }
    }
    Ok(())
}

/// Best-effort prefs load: a missing or unreadable config falls back to defaults.
fn load_prefs(dir: Option<&Path>) -> InteractionPrefs {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    let config = match store {
        Ok(store) => ConfigService::new(store),
        Err(err) => {
            warn!(%err, "config store unavailable; using default prefs");
            return InteractionPrefs::default();
        }
    };
    match config.load_or_default(INTERACTION_PREFS_KEY) {
        Ok(prefs) => prefs,
        Err(err) => {
            warn!(%err, "could not read interaction prefs; using defaults");
            InteractionPrefs::default()
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("failed to write {}", path.display()))
}
