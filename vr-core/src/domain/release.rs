//! Release domain model
//!
//! A release is a deployable combination of a build and a config. Releases
//! carry their config as YAML; `parsed_config` turns it into a key/value tree
//! that can be diffed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub resource_uri: String,
    /// Resource URI of the build this release was cut from
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub config_yaml: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("release {id} has an unreadable config: {source}")]
    InvalidConfig {
        id: u64,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Release {
    /// Parse the release config. A release without config yields an empty map.
    pub fn parsed_config(&self) -> Result<Value, ReleaseError> {
        match self.config_yaml.as_deref() {
            None => Ok(Value::Object(Map::new())),
            Some(yaml) if yaml.trim().is_empty() => Ok(Value::Object(Map::new())),
            Some(yaml) => serde_yaml::from_str(yaml).map_err(|source| {
                ReleaseError::InvalidConfig {
                    id: self.id,
                    source,
                }
            }),
        }
    }
}

/// One difference between two configs, addressed by a dotted path
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigChange {
    Added { path: String, value: Value },
    Removed { path: String, value: Value },
    Changed { path: String, from: Value, to: Value },
}

impl fmt::Display for ConfigChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigChange::Added { path, value } => write!(f, "+ {}: {}", path, value),
            ConfigChange::Removed { path, value } => write!(f, "- {}: {}", path, value),
            ConfigChange::Changed { path, from, to } => {
                write!(f, "- {}: {}\n+ {}: {}", path, from, path, to)
            }
        }
    }
}

/// Structural diff of two configs. Keys are visited in sorted order so the
/// output is stable.
pub fn diff_configs(orig: &Value, changed: &Value) -> Vec<ConfigChange> {
    let mut changes = Vec::new();
    diff_into(String::new(), orig, changed, &mut changes);
    changes
}

fn diff_into(path: String, orig: &Value, changed: &Value, out: &mut Vec<ConfigChange>) {
    match (orig, changed) {
        (Value::Object(a), Value::Object(b)) => {
            let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                match (a.get(key), b.get(key)) {
                    (Some(x), Some(y)) => diff_into(child, x, y, out),
                    (Some(x), None) => out.push(ConfigChange::Removed {
                        path: child,
                        value: x.clone(),
                    }),
                    (None, Some(y)) => out.push(ConfigChange::Added {
                        path: child,
                        value: y.clone(),
                    }),
                    (None, None) => {}
                }
            }
        }
        (a, b) if a != b => out.push(ConfigChange::Changed {
            path: if path.is_empty() { ".".to_string() } else { path },
            from: a.clone(),
            to: b.clone(),
        }),
        _ => {}
    }
}
