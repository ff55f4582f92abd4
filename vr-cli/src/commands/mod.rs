//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod build;
mod procs;
mod release;
mod swarm;
mod swarms;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::time::Duration;
use vr_core::filter::SwarmFilter;
use vr_orchestrator::DEFAULT_COUNTDOWN;
use vr_orchestrator::service::procs::ProcCommand;

use crate::config::Config;

/// Filter pattern plus exclusions shared by the swarm-selecting commands
#[derive(Args, Debug)]
pub struct Selection {
    /// Regular expression matched against the start of `app-config-proc`
    pub filter: SwarmFilter,

    /// Drop swarms matching this pattern anywhere (case-insensitive, repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,
}

/// Same as [`Selection`] but the pattern may be left out to select everything
#[derive(Args, Debug)]
pub struct OptionalSelection {
    /// Regular expression matched against the start of `app-config-proc`
    pub filter: Option<SwarmFilter>,

    /// Drop swarms matching this pattern anywhere (case-insensitive, repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,
}

impl Selection {
    pub fn into_filter(self) -> Result<SwarmFilter> {
        self.filter
            .excluding(&self.exclude)
            .context("Invalid exclusion pattern")
    }
}

impl OptionalSelection {
    pub fn into_filter(self) -> Result<SwarmFilter> {
        self.filter
            .unwrap_or_default()
            .excluding(&self.exclude)
            .context("Invalid exclusion pattern")
    }
}

/// Host restriction for proc commands
#[derive(Args, Debug)]
pub struct HostArg {
    /// Apply actions to this host only
    #[arg(long)]
    pub host: Option<String>,
}

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Set the tag, squad or ingredients of matching swarms and dispatch them
    Swarm(swarm::SwarmArgs),
    /// Create and start a build of one app at one tag
    Build {
        app: String,
        tag: String,
    },
    /// Rebuild every matching swarm, then release and dispatch it
    RebuildAll {
        #[command(flatten)]
        selection: Selection,

        /// Give a 5 second countdown before building
        #[arg(long)]
        countdown: bool,
    },
    /// List, start, stop or restart the procs of matching swarms
    Procs {
        /// One of list, start, stop, restart
        method: ProcCommand,

        #[command(flatten)]
        selection: OptionalSelection,

        #[command(flatten)]
        host: HostArg,
    },
    /// List the procs of matching swarms
    ListProcs {
        #[command(flatten)]
        selection: OptionalSelection,

        #[command(flatten)]
        host: HostArg,
    },
    /// List the names of matching swarms
    ListSwarms {
        #[command(flatten)]
        selection: OptionalSelection,
    },
    /// Show the failures of the latest uptest run
    Uptests,
    /// Deploy a release to one host and port
    Deploy(release::DeployArgs),
    /// Show how the configs of two releases differ
    CompareReleases {
        /// Release id
        orig: String,
        /// Release id
        changed: String,
    },
}

fn countdown(requested: bool) -> Option<Duration> {
    requested.then_some(DEFAULT_COUNTDOWN)
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Swarm(args) => swarm::handle_swarm(args, config).await,
        Commands::Build { app, tag } => build::handle_build(&app, &tag, config).await,
        Commands::RebuildAll {
            selection,
            countdown: requested,
        } => build::handle_rebuild_all(selection.into_filter()?, countdown(requested), config).await,
        Commands::Procs {
            method,
            selection,
            host,
        } => procs::handle_procs(method, selection.into_filter()?, host.host, config).await,
        Commands::ListProcs { selection, host } => {
            procs::handle_procs(ProcCommand::List, selection.into_filter()?, host.host, config).await
        }
        Commands::ListSwarms { selection } => {
            swarms::handle_list_swarms(selection.into_filter()?, config).await
        }
        Commands::Uptests => swarms::handle_uptests(config).await,
        Commands::Deploy(args) => release::handle_deploy(args, config).await,
        Commands::CompareReleases { orig, changed } => {
            release::handle_compare(&orig, &changed, config).await
        }
    }
}
