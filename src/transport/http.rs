use super::{Transport, TransportError, TransportResponse};
use crate::config::Config;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Proxy;
use std::env;
use std::time::Duration;
use tracing::warn;

/// `reqwest`-backed transport posting to the configured endpoint.
///
/// Environment knobs:
/// - `YM_HTTP_TIMEOUT_SECS` (default 30)
/// - `YM_PROXY_URL`
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = config.endpoint()?.to_string();

        let timeout_secs = env::var("YM_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs));

        if let Ok(proxy_url) = env::var("YM_PROXY_URL") {
            match Proxy::all(&proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => warn!(error = %e, "ignoring invalid YM_PROXY_URL"),
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Communication(TransportError::Other(e.to_string())))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: String) -> Result<TransportResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Communication(TransportError::Http(e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Communication(TransportError::Http(e)))?;

        Ok(TransportResponse {
            status,
            body: if text.is_empty() { None } else { Some(text) },
        })
    }
}
