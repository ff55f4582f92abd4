//! Release Service
//!
//! Deploying a release by hand and comparing release configs.

use vr_client::FleetClient;
use vr_core::domain::release::{ConfigChange, Release, diff_configs};
use vr_core::dto::deploy::DeployTarget;

use crate::error::{OrchestratorError, Result};

/// Turn a release argument into a release id. Only numeric ids are supported.
pub fn parse_release_spec(spec: &str) -> Result<u64> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(OrchestratorError::Validation(
            "release spec is empty".to_string(),
        ));
    }
    if !spec.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OrchestratorError::Unsupported(
            "Release spec must be a release ID".to_string(),
        ));
    }
    spec.parse()
        .map_err(|_| OrchestratorError::Validation(format!("release id {} is out of range", spec)))
}

pub async fn deploy<C>(client: &C, spec: &str, target: &DeployTarget) -> Result<Release>
where
    C: FleetClient + ?Sized,
{
    let release = client.load_release(parse_release_spec(spec)?).await?;
    client.deploy_release(&release, target).await?;
    tracing::info!(
        "Release {} deployed to {}:{} as {}",
        release.id,
        target.host,
        target.port,
        target.proc
    );
    Ok(release)
}

/// Differences between the configs of two releases
pub async fn compare<C>(client: &C, orig: &str, changed: &str) -> Result<Vec<ConfigChange>>
where
    C: FleetClient + ?Sized,
{
    let orig = parse_release_spec(orig)?;
    let changed = parse_release_spec(changed)?;

    let orig = client.load_release(orig).await?.parsed_config()?;
    let changed = client.load_release(changed).await?.parsed_config()?;
    Ok(diff_configs(&orig, &changed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeFleet, release};

    fn target() -> DeployTarget {
        DeployTarget {
            host: "web1".into(),
            port: 5001,
            proc: "web".into(),
            config_name: DeployTarget::DEFAULT_CONFIG_NAME.into(),
        }
    }

    #[test]
    fn test_release_spec() {
        assert_eq!(parse_release_spec("42").unwrap(), 42);
        assert!(matches!(
            parse_release_spec("shop-1.2"),
            Err(OrchestratorError::Unsupported(_))
        ));
        assert!(matches!(
            parse_release_spec(""),
            Err(OrchestratorError::Validation(_))
        ));
        assert!(matches!(
            parse_release_spec("99999999999999999999999"),
            Err(OrchestratorError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_non_numeric_spec_makes_no_calls() {
        let fake = FakeFleet::default();
        assert!(deploy(&fake, "latest", &target()).await.is_err());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_deploy() {
        let fake = FakeFleet::default();
        fake.add_release(release(30, "workers: 2\n"));
        let deployed = deploy(&fake, "30", &target()).await.unwrap();
        assert_eq!(deployed.id, 30);
        assert_eq!(
            fake.calls(),
            vec!["load_release 30", "deploy_release 30 web1:5001 web"]
        );
    }

    #[tokio::test]
    async fn test_compare() {
        let fake = FakeFleet::default();
        fake.add_release(release(1, "workers: 2\ndb:\n  host: a\n"));
        fake.add_release(release(2, "workers: 4\ndb:\n  host: a\n  pool: 5\n"));

        let changes = compare(&fake, "1", "2").await.unwrap();
        let lines: Vec<_> = changes.iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["+ db.pool: 5", "- workers: 2\n+ workers: 4"]);
    }
}
