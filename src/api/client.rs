//! REST client for the ClientDesk backend
//!
//! Thin wrapper over `reqwest` that attaches the bearer token, logs each call,
//! and turns non-2xx responses into [`ApiError`]s carrying the backend message.

use super::error::ApiError;
use super::traits::FormsApi;
use super::types::{
    CreateFormRequest, FormRecord, LoginRequest, TokenResponse, UpdateFormRequest, VerifyResponse,
};
use crate::auth::AuthSession;
use crate::logging;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Default request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the backend REST API
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach a bearer token to subsequent requests
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    #[cfg(test)]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Issue a request and decode the JSON response
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        logging::api_call(method.as_str(), &url);

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let result = Self::execute::<T>(builder).await;

        match result {
            Ok((status, value)) => {
                logging::api_response(method.as_str(), &url, status);
                Ok(value)
            }
            Err(err) => {
                logging::api_error(method.as_str(), &url, &err);
                Err(err)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(builder: RequestBuilder) -> Result<(u16, T), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &bytes));
        }
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        let value = serde_json::from_slice::<T>(body)?;
        Ok((status.as_u16(), value))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None).await
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: Value) -> Result<T, ApiError> {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    async fn put<T: DeserializeOwned>(&self, endpoint: &str, body: Value) -> Result<T, ApiError> {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, endpoint, None).await
    }

    /// Exchange credentials for a session and start using its token
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let body = serde_json::to_value(LoginRequest { email, password })?;
        let response: TokenResponse = self.post("/api/auth/login", body).await?;
        let session = AuthSession::from(response);
        self.set_token(session.token.clone());
        Ok(session)
    }

    /// Check that the current token is still accepted
    pub async fn verify_token(&self) -> bool {
        match self.get::<VerifyResponse>("/api/auth/verify").await {
            Ok(response) => response.valid,
            Err(_) => false,
        }
    }
}

#[async_trait]
impl FormsApi for ApiClient {
    async fn list_client_forms(&mut self, client_id: i64) -> Result<Vec<FormRecord>, ApiError> {
        self.get(&format!("/api/forms/client/{client_id}")).await
    }

    async fn list_published_forms(&mut self, client_id: i64) -> Result<Vec<FormRecord>, ApiError> {
        self.get(&format!("/api/forms/published/{client_id}")).await
    }

    async fn create_form(&mut self, request: &CreateFormRequest) -> Result<FormRecord, ApiError> {
        self.post("/api/forms", serde_json::to_value(request)?).await
    }

    async fn update_form(
        &mut self,
        form_id: &str,
        request: &UpdateFormRequest,
    ) -> Result<FormRecord, ApiError> {
        self.put(&format!("/api/forms/{form_id}"), serde_json::to_value(request)?)
            .await
    }

    async fn delete_form(&mut self, form_id: &str) -> Result<(), ApiError> {
        self.delete::<Value>(&format!("/api/forms/{form_id}"))
            .await
            .map(|_| ())
    }

    async fn publish_form(&mut self, form_id: &str) -> Result<FormRecord, ApiError> {
        self.request(Method::POST, &format!("/api/forms/{form_id}/publish"), None)
            .await
    }

    async fn unpublish_form(&mut self, form_id: &str) -> Result<FormRecord, ApiError> {
        self.request(Method::POST, &format!("/api/forms/{form_id}/unpublish"), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url("/api/forms"),
            "http://localhost:8000/api/forms"
        );
    }

    #[test]
    fn test_token_lifecycle() {
        let mut client = ApiClient::new("http://localhost:8000").unwrap();
        assert!(!client.has_token());
        client.set_token("abc");
        assert!(client.has_token());
        client.clear_token();
        assert!(!client.has_token());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let mut client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.list_client_forms(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_) | ApiError::Timeout));
        assert!(!client.verify_token().await);
    }
}
