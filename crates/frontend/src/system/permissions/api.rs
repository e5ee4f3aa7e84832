use async_trait::async_trait;
use contracts::system::permissions::{PagePermission, PermissionsResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, PERMISSIONS_PATH};
use crate::shared::error::CoreResult;
use crate::shared::http_client::HttpClient;

/// Source of the current user's per-page capability rows.
#[async_trait(?Send)]
pub trait PermissionApi {
    async fn my_permissions(&self) -> CoreResult<Vec<PagePermission>>;
}

#[async_trait(?Send)]
impl PermissionApi for HttpClient {
    async fn my_permissions(&self) -> CoreResult<Vec<PagePermission>> {
        let request = self.authorize(Request::get(&api_url(PERMISSIONS_PATH)))?;
        let response = HttpClient::send_builder(request).await?;
        let body: PermissionsResponse = HttpClient::read_json(response).await?;
        Ok(body.data)
    }
}
