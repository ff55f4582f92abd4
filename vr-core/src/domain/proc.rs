//! Proc domain model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of one running process belonging to a swarm
///
/// Procs are addressed on the server by `(host, group)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proc {
    pub host: String,
    pub port: u16,
    /// Supervisor group name, unique per host
    pub group: String,
    #[serde(default)]
    pub statename: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub config_name: String,
    #[serde(default)]
    pub proc_name: String,
    #[serde(default)]
    pub version: String,
}

impl Proc {
    /// One-line listing used by the proc commands
    pub fn summary(&self) -> String {
        format!(
            "{:<22}  {:<5}  {:<9}  {}",
            self.host, self.port, self.statename, self.description
        )
    }
}

/// Lifecycle action that can be sent to a proc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcAction {
    Start,
    Stop,
    Restart,
}

impl fmt::Display for ProcAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcAction::Start => write!(f, "start"),
            ProcAction::Stop => write!(f, "stop"),
            ProcAction::Restart => write!(f, "restart"),
        }
    }
}
