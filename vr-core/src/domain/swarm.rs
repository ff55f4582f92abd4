//! Swarm domain model
//!
//! A swarm is a named, versioned group of procs (app + config + proc role)
//! managed as one deployable unit.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::proc::Proc;
use crate::dto::swarm::SwarmChanges;

/// A swarm as reported by the fleet API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swarm {
    /// Server-assigned numeric id
    #[serde(default)]
    pub id: Option<u64>,

    /// Name of the application the swarm runs
    pub app_name: String,

    /// Name of the config (recipe) applied to the swarm
    pub config_name: String,

    /// Proc role inside the app (e.g. `web`, `worker`)
    pub proc_name: String,

    /// Currently deployed build tag
    #[serde(default)]
    pub version: String,

    /// Squad (API path grouping) the swarm is assigned to
    #[serde(default)]
    pub squad: Option<String>,

    /// Ordered ingredient resource URIs
    #[serde(default)]
    pub config_ingredients: Vec<String>,

    /// Release currently assigned to the swarm
    #[serde(default)]
    pub release: Option<String>,

    /// Opaque handle used to address the swarm on the server
    pub resource_uri: String,

    /// Procs currently running for this swarm
    #[serde(default)]
    pub procs: Vec<Proc>,
}

impl Swarm {
    /// The swarm's display name, `app-config-proc`
    pub fn name(&self) -> String {
        format!("{}-{}-{}", self.app_name, self.config_name, self.proc_name)
    }

    /// Apply a confirmed change set to the local copy.
    pub fn apply(&mut self, changes: &SwarmChanges) {
        if let Some(version) = &changes.version {
            self.version = version.clone();
        }
        if let Some(squad) = &changes.squad {
            self.squad = Some(squad.clone());
        }
        if let Some(ingredients) = &changes.config_ingredients {
            self.config_ingredients = ingredients.clone();
        }
        if let Some(release) = &changes.release {
            self.release = Some(release.clone());
        }
    }
}

impl fmt::Display for Swarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Swarm {
    /// Ordering and equality key. Identity by URI alone is tracked separately
    /// where snapshots of one swarm have to be merged.
    fn key(&self) -> (String, &str) {
        (self.name(), &self.resource_uri)
    }
}

impl PartialEq for Swarm {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Swarm {}

impl PartialOrd for Swarm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Swarm {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
pub(crate) fn swarm(name: &str, version: &str) -> Swarm {
    let mut parts = name.splitn(3, '-');
    let app_name = parts.next().unwrap_or_default().to_string();
    let config_name = parts.next().unwrap_or_default().to_string();
    let proc_name = parts.next().unwrap_or_default().to_string();
    Swarm {
        id: None,
        app_name,
        config_name,
        proc_name,
        version: version.to_string(),
        squad: None,
        config_ingredients: Vec::new(),
        release: None,
        resource_uri: format!("/api/v1/swarms/{}/", name),
        procs: Vec::new(),
    }
}
