//! VR CLI
//!
//! Command-line interface for the Velociraptor fleet: select swarms by
//! pattern, rebuild and release them, and drive their procs.

mod auth;
mod commands;
mod config;
mod prompt;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vr")]
#[command(about = "Velociraptor fleet dispatch CLI", long_about = None)]
struct Cli {
    /// Velociraptor URL
    #[arg(long, env = "VELOCIRAPTOR_URL", default_value = config::DEFAULT_URL, global = true)]
    url: String,

    /// Override the username used for authentication
    #[arg(long, env = "VELOCIRAPTOR_USERNAME", global = true)]
    username: Option<String>,

    /// Log level for vr's own output on stderr (RUST_LOG takes precedence)
    #[arg(
        short = 'l',
        long,
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        global = true
    )]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "vr_cli={level},vr_client={level},vr_orchestrator={level}"
            ))
        })
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(1);
    };

    init_tracing(&cli.log_level)?;
    let config = Config::new(cli.url, cli.username)?;

    handle_command(command, &config).await
}
