//! Authenticated HTTP collaborator.
//!
//! One `HttpClient` is built from the current session and handed to the
//! engine; it implements `PermissionApi` and `MasterApi`.

use contracts::system::auth::Session;
use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::error::{CoreError, CoreResult};

#[derive(Clone, Debug, Default)]
pub struct HttpClient {
    session: Option<Session>,
}

impl HttpClient {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    fn auth_header(&self) -> CoreResult<String> {
        self.session
            .as_ref()
            .filter(|s| s.has_token())
            .map(Session::bearer)
            .ok_or(CoreError::AuthMissing)
    }

    /// Adds the bearer header, or fails with `AuthMissing` before any request.
    pub fn authorize(&self, request: RequestBuilder) -> CoreResult<RequestBuilder> {
        Ok(request.header("Authorization", &self.auth_header()?))
    }

    pub async fn send(request: gloo_net::http::Request) -> CoreResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        Self::check_status(response).await
    }

    pub async fn send_builder(request: RequestBuilder) -> CoreResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> CoreResult<Response> {
        let status = response.status();
        if status == 401 {
            return Err(CoreError::Unauthorized);
        }
        if !response.ok() {
            let message = response.text().await.unwrap_or_default();
            return Err(CoreError::Server { status, message });
        }
        Ok(response)
    }

    pub async fn read_json<T: DeserializeOwned>(response: Response) -> CoreResult<T> {
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| CoreError::ValidationShapeMismatch(e.to_string()))
    }
}
