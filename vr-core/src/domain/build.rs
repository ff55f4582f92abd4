//! Build domain model
//!
//! A build is a compiled artifact request keyed by `(app, tag)`. It must be
//! created on the server before it can be triggered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Build lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStatus {
    /// Known locally only, no server id yet
    Uncreated,
    /// Exists on the server
    Created,
    /// Build action has been fired
    Assembling,
    /// Operator confirmed the build finished
    Assembled,
    /// The build action could not be fired
    Failed,
}

/// Canonical identity of a build
///
/// Field order is fixed here, so equality and hashing never depend on how the
/// surrounding `Build` was put together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildKey {
    pub app: String,
    pub tag: String,
}

/// Server handle returned when a build is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildHandle {
    pub id: u64,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("build {0} has already been created")]
    AlreadyCreated(BuildKey),

    #[error("build {key} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        key: BuildKey,
        from: BuildStatus,
        to: BuildStatus,
    },
}

/// A build request plus whatever the server has told us about it
///
/// Two builds are equal when their `(app, tag)` pair is equal; the id, URI and
/// status are transient and take no part in `Eq`/`Hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub app: String,
    pub tag: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub resource_uri: Option<String>,
    #[serde(skip, default = "uncreated")]
    status: BuildStatus,
}

fn uncreated() -> BuildStatus {
    BuildStatus::Uncreated
}

impl Build {
    pub fn new(app: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            tag: tag.into(),
            id: None,
            resource_uri: None,
            status: BuildStatus::Uncreated,
        }
    }

    pub fn key(&self) -> BuildKey {
        BuildKey {
            app: self.app.clone(),
            tag: self.tag.clone(),
        }
    }

    pub fn status(&self) -> BuildStatus {
        self.status
    }

    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }

    /// Fails when the build already has a server identity, so callers can
    /// refuse a second creation before anything is sent.
    pub fn ensure_uncreated(&self) -> Result<(), BuildError> {
        if self.is_created() {
            return Err(BuildError::AlreadyCreated(self.key()));
        }
        Ok(())
    }

    /// Record the server identity of a freshly created build.
    pub fn mark_created(&mut self, handle: BuildHandle) -> Result<(), BuildError> {
        self.ensure_uncreated()?;
        self.id = Some(handle.id);
        self.resource_uri = Some(handle.resource_uri);
        self.status = BuildStatus::Created;
        Ok(())
    }

    pub fn mark_assembling(&mut self) -> Result<(), BuildError> {
        self.transition(BuildStatus::Created, BuildStatus::Assembling)
    }

    pub fn mark_assembled(&mut self) -> Result<(), BuildError> {
        self.transition(BuildStatus::Assembling, BuildStatus::Assembled)
    }

    pub fn mark_failed(&mut self) {
        self.status = BuildStatus::Failed;
    }

    fn transition(&mut self, from: BuildStatus, to: BuildStatus) -> Result<(), BuildError> {
        if self.status != from {
            return Err(BuildError::InvalidTransition {
                key: self.key(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl PartialEq for Build {
    fn eq(&self, other: &Self) -> bool {
        self.app == other.app && self.tag == other.tag
    }
}

impl Eq for Build {}

impl Hash for Build {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for BuildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.app, self.tag)
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.app, self.tag)
    }
}
