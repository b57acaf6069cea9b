//! Main client for the Eka SDK.

use crate::api::{MedicationsApi, ProtocolsApi};
use crate::config::{ClientConfig, RetryConfig};
use crate::error::{EkaError, EkaResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main client for interacting with the Eka API.
#[derive(Clone, Debug)]
pub struct EkaClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl EkaClient {
    /// Create a new client builder.
    pub fn builder() -> EkaClientBuilder {
        EkaClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> EkaResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Get the medications API.
    pub fn medications(&self) -> MedicationsApi<'_> {
        MedicationsApi::new(self)
    }

    /// Get the protocols API.
    pub fn protocols(&self) -> ProtocolsApi<'_> {
        ProtocolsApi::new(self)
    }

    /// The configured API host.
    pub fn api_host(&self) -> &Url {
        &self.config.api_host
    }
}

/// Builder for creating an EkaClient.
pub struct EkaClientBuilder {
    api_host: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl EkaClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            api_host: None,
            client_id: None,
            client_secret: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the base URL of the Eka API host.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    /// Set the client ID.
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Set the client secret (or token).
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> EkaResult<EkaClient> {
        let api_host_str = self
            .api_host
            .ok_or_else(|| EkaError::Config("api_host is required".to_string()))?;
        let client_id = self
            .client_id
            .ok_or_else(|| EkaError::Config("client_id is required".to_string()))?;
        let client_secret = self
            .client_secret
            .ok_or_else(|| EkaError::Config("client_secret is required".to_string()))?;

        let api_host = Url::parse(&api_host_str)?;

        let config = ClientConfig {
            api_host,
            client_id,
            client_secret,
            timeout: self.timeout,
            retry_config: self.retry_config,
        };

        EkaClient::from_config(config)
    }
}

impl Default for EkaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_all_credentials() {
        let err = EkaClient::builder()
            .api_host("https://api.eka.care")
            .client_id("id")
            .build()
            .unwrap_err();
        assert!(matches!(err, EkaError::Config(_)));

        let err = EkaClient::builder()
            .client_id("id")
            .client_secret("secret")
            .build()
            .unwrap_err();
        assert!(matches!(err, EkaError::Config(_)));
    }

    #[test]
    fn build_rejects_malformed_host() {
        let err = EkaClient::builder()
            .api_host("not a url")
            .client_id("id")
            .client_secret("secret")
            .build()
            .unwrap_err();
        assert!(matches!(err, EkaError::InvalidUrl(_)));
    }

    #[test]
    fn build_succeeds_with_full_config() {
        let client = EkaClient::builder()
            .api_host("https://api.eka.care")
            .client_id("id")
            .client_secret("secret")
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        assert_eq!(client.api_host().as_str(), "https://api.eka.care/");
    }
}
