//! Swarm Service
//!
//! Selection and dispatch shared by the swarm pipelines, plus the swarm
//! listing.

use std::time::{Duration, Instant};
use vr_client::FleetClient;
use vr_core::domain::swarm::Swarm;
use vr_core::dto::swarm::SwarmChanges;
use vr_core::filter::SwarmFilter;

use crate::error::Result;

/// Load the swarms the filter can match and keep those it does, in server order.
pub async fn select<C>(client: &C, filter: &SwarmFilter) -> Result<Vec<Swarm>>
where
    C: FleetClient + ?Sized,
{
    let query = filter.query();
    tracing::info!("Searching for swarms: {:?}", query);
    let swarms = client.load_swarms(&query).await?;
    Ok(filter.matches(swarms))
}

/// Persist `changes`, apply them to the local copy, then fire the swarm action.
///
/// An empty change set skips the PATCH. When the trigger fails the local copy
/// still reflects what was persisted.
pub async fn dispatch<C>(client: &C, swarm: &mut Swarm, changes: &SwarmChanges) -> Result<()>
where
    C: FleetClient + ?Sized,
{
    if !changes.is_empty() {
        client.patch_swarm(swarm, changes).await?;
        swarm.apply(changes);
    }
    client.trigger_dispatch(swarm).await?;
    tracing::info!("Dispatched {}", swarm);
    Ok(())
}

/// Result of the swarm listing
#[derive(Debug)]
pub struct SwarmListing {
    /// Swarms returned by the server before local filtering
    pub loaded: usize,
    pub elapsed: Duration,
    /// Sorted names of the matching swarms
    pub names: Vec<String>,
}

pub async fn list_swarms<C>(client: &C, filter: &SwarmFilter) -> Result<SwarmListing>
where
    C: FleetClient + ?Sized,
{
    let started = Instant::now();
    let swarms = client.load_swarms(&filter.query()).await?;
    let elapsed = started.elapsed();
    let loaded = swarms.len();

    let mut matched = filter.matches(swarms);
    matched.sort();
    Ok(SwarmListing {
        loaded,
        elapsed,
        names: matched.iter().map(Swarm::name).collect(),
    })
}
