//! Proc command handlers

use anyhow::Result;
use colored::*;
use std::io;
use vr_core::filter::{ProcHostFilter, SwarmFilter};
use vr_orchestrator::service::procs::{self, ProcCommand};
use vr_orchestrator::service::swarms;

use crate::auth;
use crate::config::Config;

pub async fn handle_procs(
    command: ProcCommand,
    filter: SwarmFilter,
    host: Option<String>,
    config: &Config,
) -> Result<()> {
    let client = auth::connect(config).await?;
    let selected = swarms::select(&client, &filter).await?;
    let hosts = ProcHostFilter::new(host);

    let handled = procs::run(&client, &selected, &hosts, command, &mut io::stdout()).await?;
    if handled == 0 {
        println!("{}", "No matching procs.".yellow());
    }
    Ok(())
}
