//! Swarm-related API endpoints

use tracing::debug;
use vr_core::domain::swarm::Swarm;
use vr_core::dto::swarm::{SwarmChanges, SwarmQuery};

use crate::error::Result;
use crate::{LIST_PARAMS, Page, VelociraptorClient};

impl VelociraptorClient {
    // =============================================================================
    // Swarm Query
    // =============================================================================

    /// List swarms, narrowed on the server by `query`
    ///
    /// # Returns
    /// The swarms in the order the server lists them
    pub async fn load_swarms(&self, query: &SwarmQuery) -> Result<Vec<Swarm>> {
        let url = self.url("/api/v1/swarms/");
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(&LIST_PARAMS)
            .query(query)
            .send()
            .await?;

        let page: Page<Swarm> = self.handle_response(response).await?;
        Ok(page.objects)
    }

    /// Load a single swarm by resource URI
    pub async fn load_swarm(&self, resource_uri: &str) -> Result<Swarm> {
        self.get_resource(resource_uri).await
    }

    /// Refresh a swarm in place with the server's current view of it
    pub async fn load_swarm_meta(&self, swarm: &mut Swarm) -> Result<()> {
        *swarm = self.load_swarm(&swarm.resource_uri).await?;
        Ok(())
    }

    // =============================================================================
    // Swarm Dispatch
    // =============================================================================

    /// Persist changed fields on a swarm
    ///
    /// # Arguments
    /// * `swarm` - The swarm to patch
    /// * `changes` - Only the fields set here are sent
    pub async fn patch_swarm(&self, swarm: &Swarm, changes: &SwarmChanges) -> Result<()> {
        let url = self.url(&swarm.resource_uri);
        debug!("PATCH {} {:?}", url, changes);
        let response = self.client.patch(&url).json(changes).send().await?;

        self.handle_empty_response(response).await
    }

    /// Fire the swarm action, making the fleet converge on the swarm's settings
    pub async fn trigger_dispatch(&self, swarm: &Swarm) -> Result<()> {
        let url = self.url(&format!("{}swarm/", swarm.resource_uri));
        debug!("POST {}", url);
        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use mockito::Matcher;
    use serde_json::json;

    fn swarm_json(id: u64, app: &str, proc_name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "app_name": app,
            "config_name": "prod",
            "proc_name": proc_name,
            "version": "1.0",
            "config_ingredients": [],
            "resource_uri": format!("/api/v1/swarms/{}/", id),
        })
    }

    #[tokio::test]
    async fn test_load_swarms_sends_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/swarms/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("limit".into(), "9999".into()),
                Matcher::UrlEncoded("app__name".into(), "shop".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"objects": [swarm_json(1, "shop", "web"), swarm_json(2, "shop", "worker")]})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let swarms = client
            .load_swarms(&SwarmQuery::from_pattern("shop"))
            .await
            .unwrap();

        mock.assert_async().await;
        let names: Vec<_> = swarms.iter().map(Swarm::name).collect();
        assert_eq!(names, vec!["shop-prod-web", "shop-prod-worker"]);
    }

    #[tokio::test]
    async fn test_patch_then_trigger() {
        let mut server = mockito::Server::new_async().await;
        let patch = server
            .mock("PATCH", "/api/v1/swarms/1/")
            .match_body(Matcher::Json(json!({"version": "2.0"})))
            .with_status(202)
            .create_async()
            .await;
        let trigger = server
            .mock("POST", "/api/v1/swarms/1/swarm/")
            .with_status(202)
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let swarm: Swarm = serde_json::from_value(swarm_json(1, "shop", "web")).unwrap();
        let changes = SwarmChanges {
            version: Some("2.0".to_string()),
            ..Default::default()
        };
        client.patch_swarm(&swarm, &changes).await.unwrap();
        client.trigger_dispatch(&swarm).await.unwrap();

        patch.assert_async().await;
        trigger.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/api/v1/swarms/1/")
            .with_status(401)
            .with_body("not logged in")
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let swarm: Swarm = serde_json::from_value(swarm_json(1, "shop", "web")).unwrap();
        let err = client
            .patch_swarm(&swarm, &SwarmChanges::default())
            .await
            .unwrap_err();

        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "not logged in");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/swarms/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let err = client
            .load_swarms(&SwarmQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_load_swarm_meta_refreshes() {
        let mut server = mockito::Server::new_async().await;
        let mut fresh = swarm_json(1, "shop", "web");
        fresh["version"] = json!("3.1");
        server
            .mock("GET", "/api/v1/swarms/1/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(fresh.to_string())
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let mut swarm: Swarm = serde_json::from_value(swarm_json(1, "shop", "web")).unwrap();
        client.load_swarm_meta(&mut swarm).await.unwrap();
        assert_eq!(swarm.version, "3.1");
    }
}
