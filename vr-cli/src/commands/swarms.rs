//! Listing command handlers

use anyhow::Result;
use colored::*;
use serde_json::Value;
use vr_core::filter::SwarmFilter;
use vr_orchestrator::service::{swarms, uptests};

use crate::auth;
use crate::config::Config;

pub async fn handle_list_swarms(filter: SwarmFilter, config: &Config) -> Result<()> {
    let client = auth::connect(config).await?;
    let listing = swarms::list_swarms(&client, &filter).await?;

    println!(
        "{}",
        format!("Loaded {} swarms in {:.2?}", listing.loaded, listing.elapsed).dimmed()
    );
    for name in listing.names {
        println!("{}", name);
    }
    Ok(())
}

pub async fn handle_uptests(config: &Config) -> Result<()> {
    let client = auth::connect(config).await?;
    let failures = uptests::failures(&client).await?;

    if failures.is_empty() {
        println!("{}", "✓ All uptests passed".green());
        return Ok(());
    }
    for result in failures {
        println!("{}", format!("{} failed:", result.procname).red().bold());
        match &result.results {
            Value::String(text) => println!("{}", text),
            other => println!("{}", serde_json::to_string_pretty(other)?),
        }
    }
    Ok(())
}
