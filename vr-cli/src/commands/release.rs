//! Release command handlers

use anyhow::Result;
use clap::Args;
use colored::*;
use vr_core::dto::deploy::DeployTarget;
use vr_orchestrator::service::releases;

use crate::auth;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Release id
    release: String,
    host: String,
    port: u16,
    /// Proc name to run the release as
    proc: String,
    #[arg(short = 'c', long, default_value = DeployTarget::DEFAULT_CONFIG_NAME)]
    config_name: String,
}

pub async fn handle_deploy(args: DeployArgs, config: &Config) -> Result<()> {
    releases::parse_release_spec(&args.release)?;
    let target = DeployTarget {
        host: args.host,
        port: args.port,
        proc: args.proc,
        config_name: args.config_name,
    };

    let client = auth::connect(config).await?;
    let release = releases::deploy(&client, &args.release, &target).await?;
    println!(
        "{}",
        format!(
            "✓ Release {} deployed to {}:{}",
            release.id, target.host, target.port
        )
        .green()
        .bold()
    );
    Ok(())
}

pub async fn handle_compare(orig: &str, changed: &str, config: &Config) -> Result<()> {
    releases::parse_release_spec(orig)?;
    releases::parse_release_spec(changed)?;

    let client = auth::connect(config).await?;
    let changes = releases::compare(&client, orig, changed).await?;
    if changes.is_empty() {
        println!("{}", "No differences.".yellow());
        return Ok(());
    }
    for change in changes {
        for line in change.to_string().lines() {
            if line.starts_with('+') {
                println!("{}", line.green());
            } else {
                println!("{}", line.red());
            }
        }
    }
    Ok(())
}
