//! Deploy and release DTOs

use serde::{Deserialize, Serialize};

/// Where a release should be deployed by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployTarget {
    pub host: String,
    pub port: u16,
    pub proc: String,
    pub config_name: String,
}

impl DeployTarget {
    pub const DEFAULT_CONFIG_NAME: &'static str = "prod";
}

/// Request to cut a release from a build and a swarm's config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRelease {
    /// Resource URI of the build
    pub build: String,
    pub config_name: String,
    #[serde(default)]
    pub config_ingredients: Vec<String>,
}
