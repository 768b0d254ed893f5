//! Easy Diffusion render service transport
//!
//! Implements the RenderTransport port: a POST to `/render` and GETs against the
//! stream path it hands back. Requests carry Cloudflare Access service-token
//! headers when credentials are configured.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

use crate::infrastructure::ports::{RawResponse, RenderRequest, RenderTransport, TransportError};

/// Default render service base URL.
pub const DEFAULT_RENDER_BASE_URL: &str = "https://sd.aicyoa.com";

/// Cloudflare Access service token sent with every render request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl AccessCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() || !self.client_secret.is_empty()
    }
}

/// HTTP transport for the Easy Diffusion API
#[derive(Clone)]
pub struct EasyDiffusionTransport {
    client: Client,
    base_url: String,
    access: AccessCredentials,
}

impl EasyDiffusionTransport {
    pub fn new(base_url: &str, access: AccessCredentials) -> Self {
        // Per-request bound only; the job itself is bounded by the poll policy
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access,
        }
    }

    fn render_url(&self) -> String {
        format!("{}/render", self.base_url)
    }

    fn stream_url(&self, stream: &str) -> String {
        if stream.starts_with('/') {
            format!("{}{}", self.base_url, stream)
        } else {
            format!("{}/{}", self.base_url, stream)
        }
    }

    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if self.access.is_configured() {
            builder
                .header("CF-Access-Client-Id", &self.access.client_id)
                .header("CF-Access-Client-Secret", &self.access.client_secret)
        } else {
            builder
        }
    }
}

/// A status line arrived, so this is a response even if the body is cut short.
async fn into_raw(response: Response) -> RawResponse {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(status, error = %e, "Render response body unreadable");
            String::new()
        }
    };
    RawResponse { status, body }
}

#[async_trait]
impl RenderTransport for EasyDiffusionTransport {
    async fn submit(&self, request: &RenderRequest) -> Result<RawResponse, TransportError> {
        let response = self
            .with_headers(self.client.post(self.render_url()))
            .json(request)
            .send()
            .await
            .map_err(TransportError::new)?;
        Ok(into_raw(response).await)
    }

    async fn poll(&self, stream: &str) -> Result<RawResponse, TransportError> {
        let url = self.stream_url(stream);
        tracing::debug!(url = %url, "Getting image from stream");
        let response = self
            .with_headers(self.client.get(url))
            .send()
            .await
            .map_err(TransportError::new)?;
        Ok(into_raw(response).await)
    }
}
