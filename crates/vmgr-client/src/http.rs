//! HTTP client for the management API

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use vmgr_api::ApiErrorBody;

use crate::account::HttpHostAccountManager;
use crate::error::{ClientError, Result};
use crate::vstorage::HttpVStorageManager;

/// HTTP client for communicating with the management API
///
/// Managers handed out by [`HttpClient::vstorage_manager`] and
/// [`HttpClient::host_account_manager`] share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    ///
    /// # Example
    /// ```no_run
    /// use vmgr_client::HttpClient;
    ///
    /// let client = HttpClient::new("http://localhost:8080/api")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new HTTP client whose requests give up after `timeout`
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    /// Create a new HTTP client with custom `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Base URL all endpoints are resolved against
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Virtual storage object manager scoped to `datastore`
    #[must_use]
    pub fn vstorage_manager(&self, datastore: impl Into<String>) -> HttpVStorageManager {
        HttpVStorageManager::new(self.clone(), datastore)
    }

    /// Account manager for `host`, or for the directly connected host when `None`
    #[must_use]
    pub fn host_account_manager(&self, host: Option<String>) -> HttpHostAccountManager {
        HttpHostAccountManager::new(self.clone(), host)
    }

    /// Build a full URL from path segments, percent-encoding each one
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Perform a GET request and deserialize the response
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let response = Self::check(response).await?;

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Perform a POST request without a body, discarding the response body
    pub(crate) async fn post_empty(&self, url: Url) -> Result<()> {
        tracing::debug!(%url, "POST");
        let response = self.client.post(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Perform a DELETE request
    pub(crate) async fn delete(&self, url: Url) -> Result<()> {
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Turn non-success statuses into typed errors
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => body.message,
            Err(_) if text.trim().is_empty() => path,
            Err(_) => text.trim().to_string(),
        };

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(message));
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
