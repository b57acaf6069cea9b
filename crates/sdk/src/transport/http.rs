//! HTTP transport layer for the Eka SDK.

use crate::config::ClientConfig;
use crate::error::{EkaError, EkaResult};
use bytes::Bytes;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Client carrying the credential headers, used for API endpoints.
    api: Client,
    /// Bare client for fetching guideline documents; those live on a CDN
    /// and must not receive our credentials.
    plain: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> EkaResult<Self> {
        let mut headers = header::HeaderMap::new();

        let mut bearer =
            header::HeaderValue::from_str(&format!("Bearer {}", config.client_secret))
                .map_err(|_| EkaError::Config("invalid client secret format".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, bearer);

        headers.insert(
            header::HeaderName::from_static("client-id"),
            header::HeaderValue::from_str(&config.client_id)
                .map_err(|_| EkaError::Config("invalid client ID format".to_string()))?,
        );

        let api = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let plain = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { api, plain, config })
    }

    /// Build a URL for the given path.
    fn build_url(&self, path: &str) -> EkaResult<url::Url> {
        self.config.api_host.join(path).map_err(EkaError::InvalidUrl)
    }

    /// Execute a request, retrying per the configured policy.
    ///
    /// With the default `RetryConfig` this is a single attempt; failures
    /// surface to the caller immediately.
    async fn execute_with_retry(&self, request_builder: RequestBuilder) -> EkaResult<Response> {
        let retry_config = &self.config.retry_config;
        let mut attempts = 0;

        loop {
            let request = request_builder
                .try_clone()
                .ok_or_else(|| EkaError::Config("request cannot be cloned".to_string()))?;

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if response.status().is_success() {
                        return Ok(response);
                    }

                    if attempts < retry_config.max_retries
                        && retry_config.should_retry_status(status)
                    {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            status = status,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(EkaError::from_response(status, &body));
                }
                Err(e) => {
                    if attempts < retry_config.max_retries && e.is_timeout() {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "request timed out, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }
                    if e.is_timeout() {
                        return Err(EkaError::Timeout);
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> EkaResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");

        let response = self.execute_with_retry(self.api.get(url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> EkaResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request with query");

        let response = self
            .execute_with_retry(self.api.get(url).query(query))
            .await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> EkaResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        let response = self
            .execute_with_retry(self.api.post(url).json(body))
            .await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Fetch a raw document by absolute URL, without credentials.
    pub async fn download(&self, url: &str) -> EkaResult<Bytes> {
        let url = url::Url::parse(url)?;
        debug!(url = %url, "document download");

        let response = self.execute_with_retry(self.plain.get(url)).await?;
        Ok(response.bytes().await?)
    }
}
