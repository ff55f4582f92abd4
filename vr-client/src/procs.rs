//! Host and proc endpoints

use serde::Serialize;
use tracing::debug;
use vr_core::domain::proc::{Proc, ProcAction};

use crate::error::Result;
use crate::{LIST_PARAMS, Page, VelociraptorClient};

#[derive(Debug, Serialize)]
struct ProcActionRequest {
    action: ProcAction,
}

impl VelociraptorClient {
    /// List the procs running on one host
    pub async fn list_procs_for_host(&self, host: &str) -> Result<Vec<Proc>> {
        let url = self.url(&format!("/api/v1/hosts/{}/procs/", host));
        debug!("GET {}", url);
        let response = self.client.get(&url).query(&LIST_PARAMS).send().await?;

        let page: Page<Proc> = self.handle_response(response).await?;
        Ok(page.objects)
    }

    /// Send a lifecycle action to the proc addressed by `(host, group)`
    pub async fn proc_action(&self, proc: &Proc, action: ProcAction) -> Result<()> {
        let url = self.url(&format!("/api/v1/hosts/{}/procs/{}/", proc.host, proc.group));
        debug!("POST {} action={}", url, action);
        let response = self
            .client
            .post(&url)
            .json(&ProcActionRequest { action })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
