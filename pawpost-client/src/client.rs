use crate::{
    token::{TokenStore, TokenStoreError},
    wire::ErrorBody,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("Request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error("Response did not contain the expected {0}")]
    MissingPayload(&'static str),
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Builds the error for a rejected response from its raw body.
    ///
    /// The backend's `message` wins, then the canonical status text, then a
    /// generic line carrying the numeric status.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

        ApiError::Status { status, message }
    }
}

/// Typed client for the pet network's REST backend.
///
/// Cloning is cheap; clones share the connection pool and the token store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: Url, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pawpost/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http_client(http, base_url, tokens))
    }

    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: Url,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn has_token(&self) -> Result<bool> {
        Ok(self.tokens.load()?.is_some())
    }

    /// Appends `path` to the base url verbatim, so a base of
    /// `https://host/api` keeps its `/api` prefix.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!(%method, path, "Sending request");

        let mut request = self.http.request(method, url);
        if let Some(token) = self.tokens.load()? {
            request = request.bearer_auth(token.as_str());
        }

        Ok(request)
    }

    async fn execute(request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_owned();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            let error = ApiError::from_response(status, &body);
            warn!(%status, path = %url, error = %error, "Request rejected");
            return Err(error);
        }

        Ok(body)
    }

    pub(crate) async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let body = Self::execute(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// For endpoints whose body, if any, carries nothing the caller needs.
    pub(crate) async fn fetch_unit(request: RequestBuilder) -> Result<()> {
        Self::execute(request).await.map(drop)
    }
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{ApiClient, ApiError};
    use crate::token::MemoryTokenStore;
    use reqwest::StatusCode;
    use std::sync::Arc;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base.parse().unwrap(), Arc::new(MemoryTokenStore::default())).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = client("http://localhost:3000/api/");
        assert_eq!(
            client.endpoint("/posts/feed").unwrap().as_str(),
            "http://localhost:3000/api/posts/feed"
        );
    }

    #[test]
    fn error_message_prefers_body() {
        let error = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            br#"{"statusCode":400,"message":"Content is required","error":"Bad Request"}"#,
        );
        assert_eq!(error.to_string(), "Content is required");
        assert_eq!(error.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn error_message_joins_validation_lists() {
        let error = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            br#"{"statusCode":400,"message":["content should not be empty","category must be a string"]}"#,
        );
        assert_eq!(
            error.to_string(),
            "content should not be empty; category must be a string"
        );
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status_text() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, b"<html>upstream</html>");
        assert_eq!(error.to_string(), "Bad Gateway");

        let unknown = StatusCode::from_u16(599).unwrap();
        let error = ApiError::from_response(unknown, b"");
        assert_eq!(error.to_string(), "HTTP error! status: 599");
    }
}
