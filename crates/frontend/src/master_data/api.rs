use async_trait::async_trait;
use contracts::master::record::MasterRecord;
use contracts::shared::api::ListPayload;
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, master_item_path, master_scoped_path};
use crate::shared::error::{CoreError, CoreResult};
use crate::shared::http_client::HttpClient;

/// REST collaborator for `/api/master/{endpoint}/`.
#[async_trait(?Send)]
pub trait MasterApi {
    /// List records; `scope` becomes the query string (`?program_id=3`).
    async fn list(&self, endpoint: &str, scope: &[(String, String)]) -> CoreResult<Vec<MasterRecord>>;

    async fn create(&self, endpoint: &str, record: &MasterRecord) -> CoreResult<()>;

    async fn update(&self, endpoint: &str, id: &str, record: &MasterRecord) -> CoreResult<()>;

    async fn delete(&self, endpoint: &str, id: &str) -> CoreResult<()>;
}

#[async_trait(?Send)]
impl MasterApi for HttpClient {
    async fn list(&self, endpoint: &str, scope: &[(String, String)]) -> CoreResult<Vec<MasterRecord>> {
        let url = api_url(&master_scoped_path(endpoint, scope));
        let request = self.authorize(Request::get(&url))?;
        let response = HttpClient::send_builder(request).await?;
        let payload: ListPayload<MasterRecord> = HttpClient::read_json(response).await?;
        Ok(payload.into_items())
    }

    async fn create(&self, endpoint: &str, record: &MasterRecord) -> CoreResult<()> {
        let url = api_url(&master_scoped_path(endpoint, &[]));
        let request = self
            .authorize(Request::post(&url))?
            .json(record)
            .map_err(|e| CoreError::ValidationShapeMismatch(e.to_string()))?;
        HttpClient::send(request).await?;
        Ok(())
    }

    async fn update(&self, endpoint: &str, id: &str, record: &MasterRecord) -> CoreResult<()> {
        let url = api_url(&master_item_path(endpoint, id));
        let request = self
            .authorize(Request::put(&url))?
            .json(record)
            .map_err(|e| CoreError::ValidationShapeMismatch(e.to_string()))?;
        HttpClient::send(request).await?;
        Ok(())
    }

    async fn delete(&self, endpoint: &str, id: &str) -> CoreResult<()> {
        let url = api_url(&master_item_path(endpoint, id));
        let request = self.authorize(Request::delete(&url))?;
        HttpClient::send_builder(request).await?;
        Ok(())
    }
}
