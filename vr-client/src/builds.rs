//! Build-related API endpoints

use serde::Serialize;
use tracing::debug;
use vr_core::domain::build::{Build, BuildHandle};

use crate::error::{ClientError, Result};
use crate::{LIST_PARAMS, Page, VelociraptorClient, resource_id};

#[derive(Debug, Serialize)]
struct CreateBuild<'a> {
    /// Resource URI of the app
    app: String,
    tag: &'a str,
}

impl VelociraptorClient {
    // =============================================================================
    // Build Lifecycle
    // =============================================================================

    /// Create a build record for `app` at `tag`
    ///
    /// This does not start the build; see [`VelociraptorClient::trigger_build`].
    ///
    /// # Returns
    /// The id and resource URI assigned by the server
    pub async fn create_build(&self, app: &str, tag: &str) -> Result<BuildHandle> {
        let url = self.url("/api/v1/builds/");
        debug!("POST {} app={} tag={}", url, app, tag);
        let response = self
            .client
            .post(&url)
            .json(&CreateBuild {
                app: format!("/api/v1/apps/{}/", app),
                tag,
            })
            .send()
            .await?;

        let resource_uri = self.handle_created(response).await?;
        let id = resource_id(&resource_uri).ok_or_else(|| {
            ClientError::ParseError(format!("no build id in {}", resource_uri))
        })?;
        Ok(BuildHandle { id, resource_uri })
    }

    /// Fire the build action of a created build
    pub async fn trigger_build(&self, build: &Build) -> Result<()> {
        let resource_uri = build.resource_uri.as_deref().ok_or_else(|| {
            ClientError::InvalidRequest(format!("build {} has not been created", build))
        })?;
        let url = self.url(&format!("{}build/", resource_uri));
        debug!("POST {}", url);
        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Find the most recent build of `app` at `tag`
    pub async fn find_build(&self, app: &str, tag: &str) -> Result<BuildHandle> {
        let url = self.url("/api/v1/builds/");
        debug!("GET {} app={} tag={}", url, app, tag);
        let response = self
            .client
            .get(&url)
            .query(&LIST_PARAMS)
            .query(&[("app__name", app), ("tag", tag), ("order_by", "-id")])
            .send()
            .await?;

        let page: Page<BuildHandle> = self.handle_response(response).await?;
        page.objects
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound(format!("build {}-{}", app, tag)))
    }
}
