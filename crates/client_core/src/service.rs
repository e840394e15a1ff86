//! Remote conversion service seam and its HTTP implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{ConversionResponse, QUERY_PARAM, ROMAN_NUMERAL_PATH};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceFailure {
    /// The service answered, but not with a usable conversion. `body` is the raw response text.
    #[error("conversion service responded with status {status}: {body}")]
    Response { status: u16, body: String },
    /// No response was received.
    #[error("conversion service unreachable: {0}")]
    Transport(String),
}

impl ServiceFailure {
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Response { body, .. } => Some(body),
            Self::Transport(_) => None,
        }
    }
}

#[async_trait]
pub trait ConversionService: Send + Sync {
    /// Converts an accepted input string into its Roman-numeral form.
    async fn convert(&self, query: &str) -> Result<String, ServiceFailure>;
}

/// `GET <server>/romannumeral?query=<n>` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpConversionService {
    http: Client,
    endpoint: Url,
}

impl HttpConversionService {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Self::with_client(http, server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self> {
        let endpoint = format!("{}{ROMAN_NUMERAL_PATH}", server_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint)
            .with_context(|| format!("invalid conversion server url '{server_url}'"))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(QUERY_PARAM, query);
        url
    }
}

#[async_trait]
impl ConversionService for HttpConversionService {
    async fn convert(&self, query: &str) -> Result<String, ServiceFailure> {
        let response = self
            .http
            .get(self.request_url(query))
            .send()
            .await
            .map_err(|err| ServiceFailure::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ServiceFailure::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(ServiceFailure::Response {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<ConversionResponse>(&body) {
            Ok(decoded) => Ok(decoded.output),
            Err(_) => Err(ServiceFailure::Response {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
