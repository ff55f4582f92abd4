//! Release, deploy and uptest endpoints

use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;
use vr_core::domain::release::Release;
use vr_core::domain::swarm::Swarm;
use vr_core::domain::testrun::TestRun;
use vr_core::dto::deploy::{CreateRelease, DeployTarget};

use crate::VelociraptorClient;
use crate::error::{ClientError, Result};

#[derive(Debug, Serialize)]
struct DeployRequest<'a> {
    release_id: u64,
    #[serde(flatten)]
    target: &'a DeployTarget,
}

impl VelociraptorClient {
    // =============================================================================
    // Releases
    // =============================================================================

    /// Cut a release from the swarm's current build and config
    ///
    /// The build is looked up by the swarm's app and version, so it must
    /// exist (and should have finished) before this is called. Servers
    /// without a release endpoint answer 404 or 405, which is reported as
    /// [`ClientError::Unsupported`].
    pub async fn cut_release(&self, swarm: &Swarm) -> Result<Release> {
        let build = self.find_build(&swarm.app_name, &swarm.version).await?;

        let url = self.url("/api/v1/releases/");
        debug!("POST {} for {}", url, swarm);
        let response = self
            .client
            .post(&url)
            .json(&CreateRelease {
                build: build.resource_uri,
                config_name: swarm.config_name.clone(),
                config_ingredients: swarm.config_ingredients.clone(),
            })
            .send()
            .await?;
        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
        ) {
            return Err(ClientError::Unsupported("cutting releases".to_string()));
        }

        let resource_uri = self.handle_created(response).await?;
        self.get_resource(&resource_uri).await
    }

    /// Get a release by id
    pub async fn load_release(&self, release_id: u64) -> Result<Release> {
        self.get_resource(&format!("/api/v1/releases/{}/", release_id))
            .await
    }

    /// Deploy a release by hand to one host/port
    pub async fn deploy_release(&self, release: &Release, target: &DeployTarget) -> Result<()> {
        let url = self.url("/api/v1/deploys/");
        debug!("POST {} release={}", url, release.id);
        let response = self
            .client
            .post(&url)
            .json(&DeployRequest {
                release_id: release.id,
                target,
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Uptests
    // =============================================================================

    /// Get the most recent uptest run
    pub async fn latest_testrun(&self) -> Result<TestRun> {
        self.get_resource("/api/v1/testruns/latest/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_cut_release() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/builds/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("app__name".into(), "shop".into()),
                Matcher::UrlEncoded("tag".into(), "1.2".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({"objects": [{"id": 7, "resource_uri": "/api/v1/builds/7/"}]}).to_string(),
            )
            .create_async()
            .await;
        let create = server
            .mock("POST", "/api/v1/releases/")
            .match_body(Matcher::PartialJson(json!({
                "build": "/api/v1/builds/7/",
                "config_name": "prod"
            })))
            .with_status(201)
            .with_header("location", "/api/v1/releases/30/")
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/releases/30/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "id": 30,
                    "resource_uri": "/api/v1/releases/30/",
                    "build": "/api/v1/builds/7/",
                    "config_yaml": "workers: 2\n"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let swarm: Swarm = serde_json::from_value(json!({
            "app_name": "shop",
            "config_name": "prod",
            "proc_name": "web",
            "version": "1.2",
            "resource_uri": "/api/v1/swarms/1/"
        }))
        .unwrap();

        let release = client.cut_release(&swarm).await.unwrap();
        create.assert_async().await;
        assert_eq!(release.id, 30);
        assert_eq!(release.build.as_deref(), Some("/api/v1/builds/7/"));
    }

    #[tokio::test]
    async fn test_cut_release_without_endpoint_is_unsupported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/builds/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"objects": [{"id": 7, "resource_uri": "/api/v1/builds/7/"}]}).to_string(),
            )
            .create_async()
            .await;
        server
            .mock("POST", "/api/v1/releases/")
            .with_status(405)
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let swarm: Swarm = serde_json::from_value(json!({
            "app_name": "shop",
            "config_name": "prod",
            "proc_name": "web",
            "version": "1.2",
            "resource_uri": "/api/v1/swarms/1/"
        }))
        .unwrap();

        let err = client.cut_release(&swarm).await.unwrap_err();
        assert!(matches!(err, ClientError::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_deploy_release() {
        let mut server = mockito::Server::new_async().await;
        let deploy = server
            .mock("POST", "/api/v1/deploys/")
            .match_body(Matcher::Json(json!({
                "release_id": 30,
                "host": "web1",
                "port": 5001,
                "proc": "web",
                "config_name": "prod"
            })))
            .with_status(202)
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let release = Release {
            id: 30,
            resource_uri: "/api/v1/releases/30/".to_string(),
            build: None,
            config_yaml: None,
            hash: None,
        };
        let target = DeployTarget {
            host: "web1".to_string(),
            port: 5001,
            proc: "web".to_string(),
            config_name: "prod".to_string(),
        };
        client.deploy_release(&release, &target).await.unwrap();
        deploy.assert_async().await;
    }

    #[tokio::test]
    async fn test_latest_testrun() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/testruns/latest/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"testresults": [{"procname": "p1", "passed": false, "results": "boom"}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let run = client.latest_testrun().await.unwrap();
        assert_eq!(run.failures().count(), 1);
    }
}
