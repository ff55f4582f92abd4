//! Terminal implementation of the operator prompt

use async_trait::async_trait;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use vr_orchestrator::OperatorPrompt;

/// Spinner countdown on stderr, confirmation read from stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

#[async_trait]
impl OperatorPrompt for TerminalPrompt {
    async fn countdown(&self, label: &str, duration: Duration) -> io::Result<()> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.yellow} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        for remaining in (1..=duration.as_secs()).rev() {
            spinner.set_message(format!("{} in {} sec", label, remaining));
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        spinner.finish_and_clear();
        Ok(())
    }

    async fn confirm(&self, message: &str) -> io::Result<()> {
        print!("{} ", message.yellow().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed before confirmation",
            ));
        }
        Ok(())
    }
}
