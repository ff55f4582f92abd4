//! Orchestrator error taxonomy

use std::fmt;
use std::io;
use thiserror::Error;
use vr_client::ClientError;
use vr_core::domain::build::BuildError;
use vr_core::domain::release::ReleaseError;
use vr_core::ingredients::IngredientError;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Steps of the rebuild-all pipeline, used to say where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildPhase {
    Selected,
    MetaLoaded,
    BuildsIdentified,
    BuildsAssembling,
    AwaitingConfirmation,
    Releasing,
    Dispatching,
    Done,
}

impl fmt::Display for RebuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RebuildPhase::Selected => "selecting swarms",
            RebuildPhase::MetaLoaded => "loading swarm metadata",
            RebuildPhase::BuildsIdentified => "identifying builds",
            RebuildPhase::BuildsAssembling => "assembling builds",
            RebuildPhase::AwaitingConfirmation => "awaiting confirmation",
            RebuildPhase::Releasing => "cutting releases",
            RebuildPhase::Dispatching => "dispatching swarms",
            RebuildPhase::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("no swarms matched '{0}'")]
    SelectionEmpty(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Remote(ClientError),

    #[error("build {app}-{tag} has already been created")]
    DuplicateCreation { app: String, tag: String },

    #[error("not supported: {0}")]
    Unsupported(String),

    #[error("terminal interaction failed: {0}")]
    Prompt(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ReleaseError),

    /// A batch stopped at `item`; `completed` items before it went through.
    #[error("{item} failed after {completed} of {total} succeeded: {source}")]
    Aborted {
        item: String,
        completed: usize,
        total: usize,
        #[source]
        source: Box<OrchestratorError>,
    },

    #[error("rebuild stopped while {phase}: {source}")]
    Phase {
        phase: RebuildPhase,
        #[source]
        source: Box<OrchestratorError>,
    },
}

impl OrchestratorError {
    pub(crate) fn aborted(
        item: impl fmt::Display,
        completed: usize,
        total: usize,
        source: Self,
    ) -> Self {
        OrchestratorError::Aborted {
            item: item.to_string(),
            completed,
            total,
            source: Box::new(source),
        }
    }

    pub(crate) fn in_phase(phase: RebuildPhase) -> impl Fn(Self) -> Self + Copy {
        move |source| OrchestratorError::Phase {
            phase,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through batch and phase wrappers
    pub fn root(&self) -> &OrchestratorError {
        match self {
            OrchestratorError::Aborted { source, .. } | OrchestratorError::Phase { source, .. } => {
                source.root()
            }
            other => other,
        }
    }

    pub fn is_selection_empty(&self) -> bool {
        matches!(self.root(), OrchestratorError::SelectionEmpty(_))
    }
}

impl From<ClientError> for OrchestratorError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unsupported(op) => OrchestratorError::Unsupported(op),
            other => OrchestratorError::Remote(other),
        }
    }
}

impl From<IngredientError> for OrchestratorError {
    fn from(err: IngredientError) -> Self {
        OrchestratorError::Validation(err.to_string())
    }
}

impl From<BuildError> for OrchestratorError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::AlreadyCreated(key) => OrchestratorError::DuplicateCreation {
                app: key.app,
                tag: key.tag,
            },
            other => OrchestratorError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vr_core::domain::build::BuildKey;

    #[test]
    fn test_client_unsupported_maps_to_unsupported() {
        let err: OrchestratorError = ClientError::Unsupported("bulk deploy".into()).into();
        assert!(matches!(err, OrchestratorError::Unsupported(_)));

        let err: OrchestratorError = ClientError::api_error(500, "boom").into();
        assert!(matches!(err, OrchestratorError::Remote(_)));
    }

    #[test]
    fn test_already_created_is_duplicate_creation() {
        let err: OrchestratorError = BuildError::AlreadyCreated(BuildKey {
            app: "shop".into(),
            tag: "1.2".into(),
        })
        .into();
        assert_eq!(err.to_string(), "build shop-1.2 has already been created");
    }

    #[test]
    fn test_root_looks_through_wrappers() {
        let err = OrchestratorError::in_phase(RebuildPhase::Selected)(OrchestratorError::aborted(
            "shop-prod-web",
            2,
            5,
            OrchestratorError::SelectionEmpty("shop".into()),
        ));
        assert!(err.is_selection_empty());
        assert!(err.to_string().starts_with("rebuild stopped while selecting swarms"));
    }
}
