//! Proc Action Executor
//!
//! Lists or drives the procs of a selection of swarms, optionally restricted
//! to one host.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use vr_client::{ClientError, FleetClient};
use vr_core::domain::proc::{Proc, ProcAction};
use vr_core::domain::swarm::Swarm;
use vr_core::filter::ProcHostFilter;

use crate::error::{OrchestratorError, Result};

/// What to do with each matching proc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcCommand {
    List,
    Action(ProcAction),
}

impl FromStr for ProcCommand {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(ProcCommand::List),
            "start" => Ok(ProcCommand::Action(ProcAction::Start)),
            "stop" => Ok(ProcCommand::Action(ProcAction::Stop)),
            "restart" => Ok(ProcCommand::Action(ProcAction::Restart)),
            other => Err(OrchestratorError::Validation(format!(
                "unknown proc command '{}' (expected list, start, stop or restart)",
                other
            ))),
        }
    }
}

impl fmt::Display for ProcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcCommand::List => write!(f, "list"),
            ProcCommand::Action(action) => write!(f, "{}", action),
        }
    }
}

/// Apply `command` to the matching procs of each swarm, writing one line per
/// proc to `out`.
///
/// A swarm's header is written once, before its first matching proc; swarms
/// with no matching procs print nothing. Returns how many procs were handled.
pub async fn run<C, W>(
    client: &C,
    swarms: &[Swarm],
    hosts: &ProcHostFilter,
    command: ProcCommand,
    out: &mut W,
) -> Result<usize>
where
    C: FleetClient + ?Sized,
    W: Write,
{
    let total: usize = swarms.iter().map(|s| hosts.matches(&s.procs).count()).sum();
    let mut handled = 0;
    for swarm in swarms {
        let mut header_written = false;
        for proc in hosts.matches(&swarm.procs) {
            if !header_written {
                writeln!(out)?;
                writeln!(out, "{} [{}]", swarm.name(), swarm.version)?;
                header_written = true;
            }
            match command {
                ProcCommand::List => writeln!(out, "  {}", proc.summary())?,
                ProcCommand::Action(action) => {
                    writeln!(
                        out,
                        "{} {}",
                        action.to_string().to_uppercase(),
                        proc.summary()
                    )?;
                    if let Err(err) = act(client, proc, action).await {
                        let item = format!("{} {}:{}", action, proc.host, proc.group);
                        tracing::warn!("Stopped at {} after {} procs", item, handled);
                        return Err(OrchestratorError::aborted(item, handled, total, err));
                    }
                }
            }
            handled += 1;
        }
    }
    Ok(handled)
}

/// Look the proc up on its host by group, then send it the action.
async fn act<C>(client: &C, snapshot: &Proc, action: ProcAction) -> Result<()>
where
    C: FleetClient + ?Sized,
{
    let live = client
        .list_procs_for_host(&snapshot.host)
        .await?
        .into_iter()
        .find(|p| p.group == snapshot.group)
        .ok_or_else(|| {
            ClientError::NotFound(format!("proc {} on {}", snapshot.group, snapshot.host))
        })?;

    match action {
        ProcAction::Start => client.start_proc(&live).await?,
        ProcAction::Stop => client.stop_proc(&live).await?,
        ProcAction::Restart => client.restart_proc(&live).await?,
    }
    Ok(())
}
