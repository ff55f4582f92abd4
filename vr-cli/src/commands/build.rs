//! Build command handlers

use anyhow::{Context, Result};
use colored::*;
use std::io;
use std::time::Duration;
use vr_core::filter::SwarmFilter;
use vr_orchestrator::service::{build, rebuild};

use crate::auth;
use crate::config::Config;
use crate::prompt::TerminalPrompt;

pub async fn handle_build(app: &str, tag: &str, config: &Config) -> Result<()> {
    let client = auth::connect(config).await?;
    let build = build::build(&client, app, tag)
        .await
        .with_context(|| format!("Failed to build {}-{}", app, tag))?;

    println!("{}", format!("✓ Build {} started", build).green().bold());
    if let Some(uri) = &build.resource_uri {
        println!("  {}", uri.dimmed());
    }
    Ok(())
}

pub async fn handle_rebuild_all(
    filter: SwarmFilter,
    countdown: Option<Duration>,
    config: &Config,
) -> Result<()> {
    let client = auth::connect(config).await?;
    let done =
        rebuild::rebuild_all(&client, &TerminalPrompt, &filter, countdown, &mut io::stdout()).await?;

    println!(
        "{}",
        format!(
            "✓ Rebuilt {} build(s) and dispatched {} swarm(s)",
            done.builds().len(),
            done.swarms().len()
        )
        .green()
        .bold()
    );
    Ok(())
}
