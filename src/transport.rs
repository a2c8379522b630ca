//! Outbound delivery of serialized payloads

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::Result;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status and body returned by the webhook endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON POST. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse> {
        debug!("POST {} ({} bytes)", url, body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        // Body is only used for error reporting
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Could not read response body (status {}): {}", status, e);
                String::new()
            }
        };
        Ok(TransportResponse { status, body })
    }
}
