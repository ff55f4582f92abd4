//! VR Orchestrator
//!
//! The fleet dispatch pipelines behind the `vr` commands. Every pipeline talks
//! to the fleet through [`vr_client::FleetClient`] and to the operator through
//! [`OperatorPrompt`], so both can be swapped out in tests.

pub mod error;
pub mod prompt;
pub mod service;

#[cfg(test)]
mod fake;

pub use error::{OrchestratorError, RebuildPhase, Result};
pub use prompt::{AutoConfirm, OperatorPrompt};

use std::time::Duration;

/// Countdown given before dispatching when the operator asks for one
pub const DEFAULT_COUNTDOWN: Duration = Duration::from_secs(5);
