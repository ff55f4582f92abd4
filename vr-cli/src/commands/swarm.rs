//! Reswarm command handler

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use vr_core::dto::swarm::TagToken;
use vr_orchestrator::service::reswarm::{self, ReswarmRequest};

use super::{Selection, countdown};
use crate::auth;
use crate::config::Config;
use crate::prompt::TerminalPrompt;

#[derive(Args, Debug)]
pub struct SwarmArgs {
    #[command(flatten)]
    selection: Selection,

    /// Tag to deploy, or `-` to keep each swarm's current version
    tag: String,

    /// Give a 5 second countdown before dispatching swarms
    #[arg(long)]
    countdown: bool,

    /// Ingredients appended to each swarm's ingredient list
    #[arg(long, num_args = 1..)]
    add_ingredients: Vec<String>,

    /// Ingredients removed from each swarm
    #[arg(long, num_args = 1..)]
    remove_ingredients: Vec<String>,

    /// Ingredients that replace each swarm's whole ingredient list
    #[arg(long, num_args = 1..)]
    replace_ingredients: Vec<String>,

    /// Also match every swarm that includes one of these ingredients
    #[arg(long, num_args = 1..)]
    by_ingredients: Vec<String>,

    /// Set the squad (API path) when swarming
    #[arg(long)]
    squad: Option<String>,
}

pub async fn handle_swarm(args: SwarmArgs, config: &Config) -> Result<()> {
    let request = ReswarmRequest {
        filter: args.selection.into_filter()?,
        tag: TagToken::parse(&args.tag),
        squad: args.squad,
        add_ingredients: args.add_ingredients,
        remove_ingredients: args.remove_ingredients,
        replace_ingredients: args.replace_ingredients,
        by_ingredients: args.by_ingredients,
    };
    request.validate()?;

    let client = auth::connect(config).await?;
    let plan = reswarm::plan(&client, &request)
        .await
        .context("Failed to plan reswarm")?;

    println!("{}", format!("Matched {} apps", plan.len()).bold());
    for swarm in plan.swarms() {
        println!("  {}", swarm);
    }

    let dispatched = reswarm::execute(&client, &TerminalPrompt, plan, countdown(args.countdown)).await?;
    println!(
        "{}",
        format!("✓ Dispatched {} swarm(s)", dispatched.len()).green().bold()
    );
    Ok(())
}
