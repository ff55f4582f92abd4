//! Build deduplication
//!
//! Many swarms usually run the same `(app, tag)`; each distinct pair only has
//! to be built once.

use std::collections::HashSet;

use crate::domain::build::Build;
use crate::domain::swarm::Swarm;

/// Collapse build requests with equal `(app, tag)` pairs.
pub fn unique<I>(requests: I) -> HashSet<Build>
where
    I: IntoIterator<Item = Build>,
{
    requests.into_iter().collect()
}

/// The build each swarm needs: its app at its deployed version.
pub fn requests_for(swarms: &[Swarm]) -> Vec<Build> {
    swarms
        .iter()
        .map(|swarm| Build::new(swarm.app_name.clone(), swarm.version.clone()))
        .collect()
}

/// Order a build set by `(app, tag)`.
pub fn sorted(builds: HashSet<Build>) -> Vec<Build> {
    let mut builds: Vec<Build> = builds.into_iter().collect();
    builds.sort_by_key(Build::key);
    builds
}
