//! Build Service

use vr_client::FleetClient;
use vr_core::domain::build::Build;

use crate::error::Result;

/// Create `build` on the server. A build that already has an id is refused
/// before any request goes out.
pub(crate) async fn create<C>(client: &C, build: &mut Build) -> Result<()>
where
    C: FleetClient + ?Sized,
{
    build.ensure_uncreated()?;
    let handle = client.create_build(&build.app, &build.tag).await?;
    build.mark_created(handle)?;
    tracing::info!("Build {} created", build);
    Ok(())
}

/// Create `build` on the server if needed, then fire its build action.
pub(crate) async fn assemble<C>(client: &C, build: &mut Build) -> Result<()>
where
    C: FleetClient + ?Sized,
{
    if !build.is_created() {
        create(client, build).await?;
    }
    if let Err(err) = client.trigger_build(build).await {
        build.mark_failed();
        return Err(err.into());
    }
    build.mark_assembling()?;
    tracing::info!("Build {} started", build);
    Ok(())
}

/// Build one `(app, tag)` pair
pub async fn build<C>(client: &C, app: &str, tag: &str) -> Result<Build>
where
    C: FleetClient + ?Sized,
{
    let mut build = Build::new(app, tag);
    assemble(client, &mut build).await?;
    Ok(build)
}
