//! The fleet operations the orchestrator depends on
//!
//! Pipelines are written against [`FleetClient`] so they can run against the
//! real server or an in-memory fake.

use async_trait::async_trait;
use vr_core::domain::build::{Build, BuildHandle};
use vr_core::domain::ingredient::{Ingredient, IngredientRef};
use vr_core::domain::proc::{Proc, ProcAction};
use vr_core::domain::release::Release;
use vr_core::domain::swarm::Swarm;
use vr_core::domain::testrun::TestRun;
use vr_core::dto::deploy::DeployTarget;
use vr_core::dto::swarm::{SwarmChanges, SwarmQuery};

use crate::VelociraptorClient;
use crate::error::Result;

#[async_trait]
pub trait FleetClient: Send + Sync {
    async fn load_swarms(&self, query: &SwarmQuery) -> Result<Vec<Swarm>>;

    async fn load_swarm(&self, resource_uri: &str) -> Result<Swarm>;

    async fn load_swarm_meta(&self, swarm: &mut Swarm) -> Result<()>;

    async fn patch_swarm(&self, swarm: &Swarm, changes: &SwarmChanges) -> Result<()>;

    async fn trigger_dispatch(&self, swarm: &Swarm) -> Result<()>;

    async fn create_build(&self, app: &str, tag: &str) -> Result<BuildHandle>;

    async fn trigger_build(&self, build: &Build) -> Result<()>;

    async fn cut_release(&self, swarm: &Swarm) -> Result<Release>;

    async fn resolve_ingredient(&self, reference: &IngredientRef) -> Result<Ingredient>;

    async fn list_procs_for_host(&self, host: &str) -> Result<Vec<Proc>>;

    async fn proc_action(&self, proc: &Proc, action: ProcAction) -> Result<()>;

    async fn start_proc(&self, proc: &Proc) -> Result<()> {
        self.proc_action(proc, ProcAction::Start).await
    }

    async fn stop_proc(&self, proc: &Proc) -> Result<()> {
        self.proc_action(proc, ProcAction::Stop).await
    }

    async fn restart_proc(&self, proc: &Proc) -> Result<()> {
        self.proc_action(proc, ProcAction::Restart).await
    }

    async fn load_release(&self, release_id: u64) -> Result<Release>;

    async fn deploy_release(&self, release: &Release, target: &DeployTarget) -> Result<()>;

    async fn latest_testrun(&self) -> Result<TestRun>;
}

#[async_trait]
impl FleetClient for VelociraptorClient {
    async fn load_swarms(&self, query: &SwarmQuery) -> Result<Vec<Swarm>> {
        VelociraptorClient::load_swarms(self, query).await
    }

    async fn load_swarm(&self, resource_uri: &str) -> Result<Swarm> {
        VelociraptorClient::load_swarm(self, resource_uri).await
    }

    async fn load_swarm_meta(&self, swarm: &mut Swarm) -> Result<()> {
        VelociraptorClient::load_swarm_meta(self, swarm).await
    }

    async fn patch_swarm(&self, swarm: &Swarm, changes: &SwarmChanges) -> Result<()> {
        VelociraptorClient::patch_swarm(self, swarm, changes).await
    }

    async fn trigger_dispatch(&self, swarm: &Swarm) -> Result<()> {
        VelociraptorClient::trigger_dispatch(self, swarm).await
    }

    async fn create_build(&self, app: &str, tag: &str) -> Result<BuildHandle> {
        VelociraptorClient::create_build(self, app, tag).await
    }

    async fn trigger_build(&self, build: &Build) -> Result<()> {
        VelociraptorClient::trigger_build(self, build).await
    }

    async fn cut_release(&self, swarm: &Swarm) -> Result<Release> {
        VelociraptorClient::cut_release(self, swarm).await
    }

    async fn resolve_ingredient(&self, reference: &IngredientRef) -> Result<Ingredient> {
        VelociraptorClient::resolve_ingredient(self, reference).await
    }

    async fn list_procs_for_host(&self, host: &str) -> Result<Vec<Proc>> {
        VelociraptorClient::list_procs_for_host(self, host).await
    }

    async fn proc_action(&self, proc: &Proc, action: ProcAction) -> Result<()> {
        VelociraptorClient::proc_action(self, proc, action).await
    }

    async fn load_release(&self, release_id: u64) -> Result<Release> {
        VelociraptorClient::load_release(self, release_id).await
    }

    async fn deploy_release(&self, release: &Release, target: &DeployTarget) -> Result<()> {
        VelociraptorClient::deploy_release(self, release, target).await
    }

    async fn latest_testrun(&self) -> Result<TestRun> {
        VelociraptorClient::latest_testrun(self).await
    }
}
