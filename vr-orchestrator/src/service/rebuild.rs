//! Rebuild-all pipeline
//!
//! Rebuilds every distinct `(app, version)` behind a selection of swarms, waits
//! for the operator to confirm the builds finished, then cuts a release per
//! swarm and dispatches it. Each step consumes the pipeline and returns it in
//! the next state, so steps cannot be skipped or reordered.
//!
//! ```text
//! select -> load_meta -> identify_builds -> assemble_builds
//!        -> confirm -> cut_releases -> dispatch
//! ```

use std::io::Write;
use std::marker::PhantomData;
use std::time::Duration;
use vr_client::FleetClient;
use vr_core::builds;
use vr_core::domain::build::Build;
use vr_core::domain::release::Release;
use vr_core::domain::swarm::Swarm;
use vr_core::dto::swarm::SwarmChanges;
use vr_core::filter::SwarmFilter;

use crate::error::{OrchestratorError, RebuildPhase, Result};
use crate::prompt::OperatorPrompt;
use crate::service::build::assemble;
use crate::service::swarms;

pub const CONFIRM_MESSAGE: &str = "Hit enter to continue once builds are done...";

/// Pipeline states
pub mod state {
    /// Swarms selected by the filter
    #[derive(Debug)]
    pub struct Selected;

    /// Swarm metadata refreshed from the server
    #[derive(Debug)]
    pub struct MetaLoaded;

    /// Distinct builds computed
    #[derive(Debug)]
    pub struct BuildsIdentified;

    /// Build actions fired, operator not yet consulted
    #[derive(Debug)]
    pub struct BuildsAssembling;

    /// Operator confirmed the builds; releases can be cut
    #[derive(Debug)]
    pub struct Releasing;

    /// One release per swarm cut
    #[derive(Debug)]
    pub struct Dispatching;

    /// Every swarm dispatched
    #[derive(Debug)]
    pub struct Done;
}

use state::*;

#[derive(Debug)]
pub struct Rebuild<S> {
    swarms: Vec<Swarm>,
    builds: Vec<Build>,
    releases: Vec<Release>,
    _state: PhantomData<S>,
}

impl<S> Rebuild<S> {
    fn transition<T>(self) -> Rebuild<T> {
        Rebuild {
            swarms: self.swarms,
            builds: self.builds,
            releases: self.releases,
            _state: PhantomData,
        }
    }

    pub fn swarms(&self) -> &[Swarm] {
        &self.swarms
    }

    pub fn builds(&self) -> &[Build] {
        &self.builds
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }
}

// =============================================================================
// Selected
// =============================================================================

impl Rebuild<Selected> {
    /// Select the swarms to rebuild. An empty selection is an error.
    pub async fn select<C>(client: &C, filter: &SwarmFilter) -> Result<Self>
    where
        C: FleetClient + ?Sized,
    {
        let swarms = swarms::select(client, filter)
            .await
            .map_err(OrchestratorError::in_phase(RebuildPhase::Selected))?;
        if swarms.is_empty() {
            return Err(OrchestratorError::SelectionEmpty(filter.pattern().to_string()));
        }
        tracing::info!("Matched {} swarms", swarms.len());

        Ok(Rebuild {
            swarms,
            builds: Vec::new(),
            releases: Vec::new(),
            _state: PhantomData,
        })
    }

    pub async fn load_meta<C>(mut self, client: &C) -> Result<Rebuild<MetaLoaded>>
    where
        C: FleetClient + ?Sized,
    {
        let total = self.swarms.len();
        for (index, swarm) in self.swarms.iter_mut().enumerate() {
            if let Err(err) = client.load_swarm_meta(swarm).await {
                let err = OrchestratorError::aborted(&*swarm, index, total, err.into());
                return Err(OrchestratorError::in_phase(RebuildPhase::MetaLoaded)(err));
            }
        }
        Ok(self.transition())
    }
}

// =============================================================================
// MetaLoaded -> BuildsIdentified -> BuildsAssembling
// =============================================================================

impl Rebuild<MetaLoaded> {
    /// Give the operator a chance to back out, then compute the distinct builds.
    pub async fn identify_builds<P>(
        mut self,
        prompt: &P,
        countdown: Option<Duration>,
    ) -> Result<Rebuild<BuildsIdentified>>
    where
        P: OperatorPrompt + ?Sized,
    {
        if let Some(duration) = countdown {
            prompt
                .countdown("Rebuilding", duration)
                .await
                .map_err(|e| OrchestratorError::in_phase(RebuildPhase::BuildsIdentified)(e.into()))?;
        }
        self.builds = builds::sorted(builds::unique(builds::requests_for(&self.swarms)));
        tracing::info!(
            "{} swarms need {} distinct builds",
            self.swarms.len(),
            self.builds.len()
        );
        Ok(self.transition())
    }
}

impl Rebuild<BuildsIdentified> {
    /// Create and trigger every build, stopping at the first failure.
    pub async fn assemble_builds<C>(mut self, client: &C) -> Result<Rebuild<BuildsAssembling>>
    where
        C: FleetClient + ?Sized,
    {
        let total = self.builds.len();
        for (index, build) in self.builds.iter_mut().enumerate() {
            if let Err(err) = assemble(client, build).await {
                tracing::warn!("Rebuild aborted at build {} ({} of {} done)", build, index, total);
                let err = OrchestratorError::aborted(&*build, index, total, err);
                return Err(OrchestratorError::in_phase(RebuildPhase::BuildsAssembling)(err));
            }
        }
        Ok(self.transition())
    }
}

// =============================================================================
// BuildsAssembling -> Releasing -> Dispatching -> Done
// =============================================================================

impl Rebuild<BuildsAssembling> {
    /// Wait for the operator to say the builds are done.
    pub async fn confirm<P>(mut self, prompt: &P) -> Result<Rebuild<Releasing>>
    where
        P: OperatorPrompt + ?Sized,
    {
        let phase = OrchestratorError::in_phase(RebuildPhase::AwaitingConfirmation);
        if let Err(err) = prompt.confirm(CONFIRM_MESSAGE).await {
            return Err(phase(err.into()));
        }
        for build in &mut self.builds {
            if let Err(err) = build.mark_assembled() {
                return Err(phase(err.into()));
            }
        }
        Ok(self.transition())
    }
}

impl Rebuild<Releasing> {
    pub async fn cut_releases<C>(mut self, client: &C) -> Result<Rebuild<Dispatching>>
    where
        C: FleetClient + ?Sized,
    {
        let total = self.swarms.len();
        for (index, swarm) in self.swarms.iter().enumerate() {
            match client.cut_release(swarm).await {
                Ok(release) => {
                    tracing::info!("Release {} cut for {}", release.id, swarm);
                    self.releases.push(release);
                }
                Err(err) => {
                    let err = OrchestratorError::aborted(swarm, index, total, err.into());
                    return Err(OrchestratorError::in_phase(RebuildPhase::Releasing)(err));
                }
            }
        }
        Ok(self.transition())
    }
}

impl Rebuild<Dispatching> {
    /// Point each swarm at its new release and dispatch it.
    pub async fn dispatch<C>(mut self, client: &C) -> Result<Rebuild<Done>>
    where
        C: FleetClient + ?Sized,
    {
        let total = self.swarms.len();
        for (index, (swarm, release)) in self.swarms.iter_mut().zip(&self.releases).enumerate() {
            let changes = SwarmChanges {
                release: Some(release.resource_uri.clone()),
                ..Default::default()
            };
            if let Err(err) = swarms::dispatch(client, swarm, &changes).await {
                tracing::warn!("Rebuild aborted at {} ({} of {} dispatched)", swarm, index, total);
                let err = OrchestratorError::aborted(&*swarm, index, total, err);
                return Err(OrchestratorError::in_phase(RebuildPhase::Dispatching)(err));
            }
        }
        Ok(self.transition())
    }
}

/// Run the whole pipeline, narrating progress to `out`.
pub async fn rebuild_all<C, P, W>(
    client: &C,
    prompt: &P,
    filter: &SwarmFilter,
    countdown: Option<Duration>,
    out: &mut W,
) -> Result<Rebuild<Done>>
where
    C: FleetClient + ?Sized,
    P: OperatorPrompt + ?Sized,
    W: Write,
{
    let selected = Rebuild::select(client, filter).await?;
    writeln!(out, "Matched {} apps", selected.swarms().len())?;
    for swarm in selected.swarms() {
        writeln!(out, "  {}", swarm)?;
    }

    writeln!(out, "loading swarm metadata...")?;
    let loaded = selected.load_meta(client).await?;
    let identified = loaded.identify_builds(prompt, countdown).await?;
    for build in identified.builds() {
        writeln!(out, "building {}", build)?;
    }
    let assembling = identified.assemble_builds(client).await?;
    let releasing = assembling.confirm(prompt).await?;
    let dispatching = releasing.cut_releases(client).await?;

    writeln!(out, "swarming new releases...")?;
    dispatching.dispatch(client).await
}
