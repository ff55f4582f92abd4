//! Uptest results

use vr_client::FleetClient;
use vr_core::domain::testrun::TestResult;

use crate::error::Result;

/// Failed results of the latest uptest run
pub async fn failures<C>(client: &C) -> Result<Vec<TestResult>>
where
    C: FleetClient + ?Sized,
{
    let run = client.latest_testrun().await?;
    Ok(run.failures().cloned().collect())
}
