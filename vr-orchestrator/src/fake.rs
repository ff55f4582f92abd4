//! In-memory fleet that records every call

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use vr_client::{ClientError, FleetClient, Result};
use vr_core::domain::build::{Build, BuildHandle};
use vr_core::domain::ingredient::{Ingredient, IngredientRef};
use vr_core::domain::proc::{Proc, ProcAction};
use vr_core::domain::release::Release;
use vr_core::domain::swarm::Swarm;
use vr_core::domain::testrun::TestRun;
use vr_core::dto::deploy::DeployTarget;
use vr_core::dto::swarm::{SwarmChanges, SwarmQuery};

#[derive(Default)]
struct State {
    calls: Vec<String>,
    patches: Vec<(String, SwarmChanges)>,
    swarms: Vec<Swarm>,
    ingredients: Vec<Ingredient>,
    procs: HashMap<String, Vec<Proc>>,
    releases: HashMap<u64, Release>,
    testrun: Option<TestRun>,
    failures: Vec<(String, String)>,
    next_id: u64,
}

#[derive(Default)]
pub struct FakeFleet {
    state: Mutex<State>,
}

pub fn swarm(app: &str, config: &str, proc_name: &str, version: &str) -> Swarm {
    Swarm {
        id: None,
        app_name: app.to_string(),
        config_name: config.to_string(),
        proc_name: proc_name.to_string(),
        version: version.to_string(),
        squad: None,
        config_ingredients: Vec::new(),
        release: None,
        resource_uri: format!("/api/v1/swarms/{}-{}-{}/", app, config, proc_name),
        procs: Vec::new(),
    }
}

pub fn proc(host: &str, port: u16, group: &str) -> Proc {
    Proc {
        host: host.to_string(),
        port,
        group: group.to_string(),
        statename: "RUNNING".to_string(),
        description: "pid 1".to_string(),
        app_name: String::new(),
        config_name: String::new(),
        proc_name: String::new(),
        version: String::new(),
    }
}

pub fn ingredient(id: u64, name: &str, swarms: &[&str]) -> Ingredient {
    Ingredient {
        id: Some(id),
        name: name.to_string(),
        resource_uri: format!("/api/v1/ingredients/{}/", id),
        swarms: swarms.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn release(id: u64, config_yaml: &str) -> Release {
    Release {
        id,
        resource_uri: format!("/api/v1/releases/{}/", id),
        build: None,
        config_yaml: Some(config_yaml.to_string()),
        hash: None,
    }
}

impl FakeFleet {
    pub fn with_swarms(swarms: Vec<Swarm>) -> Self {
        let fake = Self::default();
        fake.lock().swarms = swarms;
        fake
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_ingredient(&self, ingredient: Ingredient) {
        self.lock().ingredients.push(ingredient);
    }

    pub fn add_host_procs(&self, host: &str, procs: Vec<Proc>) {
        self.lock().procs.insert(host.to_string(), procs);
    }

    pub fn add_release(&self, release: Release) {
        self.lock().releases.insert(release.id, release);
    }

    pub fn set_testrun(&self, run: TestRun) {
        self.lock().testrun = Some(run);
    }

    /// Make `op` fail whenever it is called for `target`.
    pub fn fail(&self, op: &str, target: &str) {
        self.lock()
            .failures
            .push((op.to_string(), target.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn calls_to(&self, op: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.split(' ').next() == Some(op))
            .collect()
    }

    pub fn patches(&self) -> Vec<(String, SwarmChanges)> {
        self.lock().patches.clone()
    }

    fn record(&self, op: &str, target: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(format!("{} {}", op, target));
        if state.failures.iter().any(|(o, t)| o == op && t == target) {
            return Err(ClientError::api_error(500, format!("{} {} failed", op, target)));
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        let mut state = self.lock();
        state.next_id += 1;
        state.next_id
    }
}

#[async_trait]
impl FleetClient for FakeFleet {
    async fn load_swarms(&self, query: &SwarmQuery) -> Result<Vec<Swarm>> {
        self.record("load_swarms", query.app_name.as_deref().unwrap_or(""))?;
        Ok(self.lock().swarms.clone())
    }

    async fn load_swarm(&self, resource_uri: &str) -> Result<Swarm> {
        self.record("load_swarm", resource_uri)?;
        self.lock()
            .swarms
            .iter()
            .find(|s| s.resource_uri == resource_uri)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(resource_uri.to_string()))
    }

    async fn load_swarm_meta(&self, swarm: &mut Swarm) -> Result<()> {
        self.record("load_swarm_meta", &swarm.name())?;
        Ok(())
    }

    async fn patch_swarm(&self, swarm: &Swarm, changes: &SwarmChanges) -> Result<()> {
        self.record("patch_swarm", &swarm.name())?;
        self.lock().patches.push((swarm.name(), changes.clone()));
        Ok(())
    }

    async fn trigger_dispatch(&self, swarm: &Swarm) -> Result<()> {
        self.record("trigger_dispatch", &swarm.name())
    }

    async fn create_build(&self, app: &str, tag: &str) -> Result<BuildHandle> {
        self.record("create_build", &format!("{}-{}", app, tag))?;
        let id = self.next_id();
        Ok(BuildHandle {
            id,
            resource_uri: format!("/api/v1/builds/{}/", id),
        })
    }

    async fn trigger_build(&self, build: &Build) -> Result<()> {
        self.record("trigger_build", &build.to_string())
    }

    async fn cut_release(&self, swarm: &Swarm) -> Result<Release> {
        self.record("cut_release", &swarm.name())?;
        let id = self.next_id();
        Ok(Release {
            id,
            resource_uri: format!("/api/v1/releases/{}/", id),
            build: None,
            config_yaml: None,
            hash: None,
        })
    }

    async fn resolve_ingredient(&self, reference: &IngredientRef) -> Result<Ingredient> {
        self.record("resolve_ingredient", &reference.to_string())?;
        self.lock()
            .ingredients
            .iter()
            .find(|i| match reference {
                IngredientRef::Id(id) => i.id == Some(*id),
                IngredientRef::Name(name) => &i.name == name,
            })
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("ingredient {}", reference)))
    }

    async fn list_procs_for_host(&self, host: &str) -> Result<Vec<Proc>> {
        self.record("list_procs_for_host", host)?;
        Ok(self.lock().procs.get(host).cloned().unwrap_or_default())
    }

    async fn proc_action(&self, proc: &Proc, action: ProcAction) -> Result<()> {
        self.record(&format!("{}_proc", action), &format!("{}:{}", proc.host, proc.group))
    }

    async fn load_release(&self, release_id: u64) -> Result<Release> {
        self.record("load_release", &release_id.to_string())?;
        self.lock()
            .releases
            .get(&release_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("release {}", release_id)))
    }

    async fn deploy_release(&self, release: &Release, target: &DeployTarget) -> Result<()> {
        self.record(
            "deploy_release",
            &format!("{} {}:{} {}", release.id, target.host, target.port, target.proc),
        )
    }

    async fn latest_testrun(&self) -> Result<TestRun> {
        self.record("latest_testrun", "")?;
        self.lock()
            .testrun
            .clone()
            .ok_or_else(|| ClientError::NotFound("testrun".to_string()))
    }
}
