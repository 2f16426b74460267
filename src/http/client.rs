//! HTTP client for the directory backend.
//!
//! Every request goes through [`ApiClient::execute`], which attaches the
//! bearer token, logs the exchange and maps non-success statuses onto
//! [`ApiError`]. A 401/403 on a [`AuthScope::Protected`] call ends the
//! session.

use std::time::Instant;

use medadmin_auth::SessionHandle;
use medadmin_config::ApiConfig;
use medadmin_core::{ApiError, PageEnvelope, PageRequest, PageResult};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::http::multipart::MultipartPayload;

/// How a request relates to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScope {
    /// No bearer token is attached (login).
    Public,
    /// Bearer attached; a rejection is reported but does not end the session.
    Verify,
    /// Bearer attached; a 401/403 forces a logout.
    Protected,
}

impl AuthScope {
    fn sends_bearer(self) -> bool {
        !matches!(self, AuthScope::Public)
    }
}

/// `endpoint/{id}` with `id` percent-encoded as a single path segment.
pub fn resource_path(endpoint: &str, id: &str) -> String {
    let Ok(mut url) = Url::parse("http://medadmin.local/") else {
        return format!("{}/{}", endpoint, id);
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(endpoint.split('/').filter(|s| !s.is_empty()))
            .push(id);
    }
    url.path().trim_start_matches('/').to_string()
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionHandle) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Absolute URL for an endpoint path relative to the API base.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, scope: AuthScope) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if scope.sends_bearer() {
            if let Some(token) = self.session.access_token() {
                builder = builder.bearer_auth(token);
            }
        }
        builder
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
        scope: AuthScope,
    ) -> Result<Response, ApiError> {
        let start = Instant::now();
        let request_id = uuid::Uuid::new_v4().to_string();

        let response = match builder.header("x-request-id", &request_id).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    latency_ms = %start.elapsed().as_millis(),
                    error = %e,
                    "Request failed"
                );
                return Err(ApiError::from(e));
            }
        };

        let latency = start.elapsed();
        let status = response.status();

        match status.as_u16() {
            400..=499 => {
                warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    latency_ms = %latency.as_millis(),
                    "Client error"
                );
            }
            500..=599 => {
                error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    latency_ms = %latency.as_millis(),
                    "Server error"
                );
            }
            _ => {
                info!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    latency_ms = %latency.as_millis(),
                    "Request completed"
                );
            }
        }

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let api_error = ApiError::from_response(status.as_u16(), &body);
        if scope == AuthScope::Protected && api_error.is_auth() {
            self.session.expire();
        }
        Err(api_error)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        scope: AuthScope,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method.clone(), path, scope);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.execute(builder, &method, path, scope).await?;
        Self::decode(response).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_scope(path, AuthScope::Protected).await
    }

    pub async fn get_with_scope<T: DeserializeOwned>(
        &self,
        path: &str,
        scope: AuthScope,
    ) -> Result<T, ApiError> {
        self.send_json::<(), T>(Method::GET, path, None, scope).await
    }

    /// `GET` that resolves a 404 to `None`.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        match self.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_with_scope(path, body, AuthScope::Protected).await
    }

    pub async fn post_with_scope<B, T>(
        &self,
        path: &str,
        body: &B,
        scope: AuthScope,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, Some(body), scope).await
    }

    /// `POST` without a body whose response is ignored.
    pub async fn post_empty(&self, path: &str, scope: AuthScope) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, path, scope);
        self.execute(builder, &Method::POST, path, scope).await?;
        Ok(())
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, Some(body), AuthScope::Protected)
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path, AuthScope::Protected);
        self.execute(builder, &Method::DELETE, path, AuthScope::Protected)
            .await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: MultipartPayload,
    ) -> Result<T, ApiError> {
        self.send_multipart(Method::POST, path, payload).await
    }

    pub async fn patch_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: MultipartPayload,
    ) -> Result<T, ApiError> {
        self.send_multipart(Method::PATCH, path, payload).await
    }

    async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: MultipartPayload,
    ) -> Result<T, ApiError> {
        let form = payload.into_form()?;
        let builder = self
            .request(method.clone(), path, AuthScope::Protected)
            .multipart(form);
        let response = self
            .execute(builder, &method, path, AuthScope::Protected)
            .await?;
        Self::decode(response).await
    }

    /// Fetches one page of `endpoint`.
    ///
    /// Blank filters never reach the query string.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: &PageRequest,
    ) -> Result<PageResult<T>, ApiError> {
        let builder = self
            .request(Method::GET, endpoint, AuthScope::Protected)
            .query(&request.query_pairs());
        let response = self
            .execute(builder, &Method::GET, endpoint, AuthScope::Protected)
            .await?;
        let envelope: PageEnvelope<T> = Self::decode(response).await?;
        Ok(envelope.into_page(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medadmin_auth::MemoryTokenStore;
    use std::sync::Arc;

    fn client(base_url: &str) -> ApiClient {
        let session = SessionHandle::new(Arc::new(MemoryTokenStore::new()));
        ApiClient::new(&ApiConfig::default().with_base_url(base_url), session).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = client("http://localhost:3000/api/");
        assert_eq!(client.url("/doctors"), "http://localhost:3000/api/doctors");
        assert_eq!(
            client.url("doctors/categories"),
            "http://localhost:3000/api/doctors/categories"
        );
    }

    #[test]
    fn test_resource_path_escapes_id() {
        assert_eq!(resource_path("doctors", "doctor-7"), "doctors/doctor-7");
        assert_eq!(
            resource_path("doctors/categories", "a/b?c#d"),
            "doctors/categories/a%2Fb%3Fc%23d"
        );
        assert_eq!(resource_path("users", "x y"), "users/x%20y");
    }

    #[test]
    fn test_public_scope_sends_no_bearer() {
        assert!(!AuthScope::Public.sends_bearer());
        assert!(AuthScope::Verify.sends_bearer());
        assert!(AuthScope::Protected.sends_bearer());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = client("http://127.0.0.1:1");
        let err = client.get::<serde_json::Value>("auth/me").await.unwrap_err();
        assert!(err.is_network());
    }
}
