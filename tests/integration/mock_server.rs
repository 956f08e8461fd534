//! Mock HTTP server setup for integration tests

use crate::scripted::{envelope, init_tracing, test_config};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use ym_lib_rust::{CallCounter, YmClient};

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        init_tracing();
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Create a client over the real HTTP transport pointed at the mock server
    pub fn create_test_client(&self) -> ym_lib_rust::Result<YmClient> {
        YmClient::builder()
            .config(test_config())
            .base_uri_override(&self.base_url)
            .generic_counter(Arc::new(CallCounter::generic()))
            .build()
    }

    /// Respond to the call of `method` with a successful envelope containing `inner`
    pub async fn mock_envelope(&mut self, method: &str, inner: &str) -> Mock {
        self.server
            .mock("POST", "/")
            .match_header("content-type", "text/xml; charset=utf-8")
            .match_body(Matcher::Regex(format!("<Call Method=\"{}\"", regex_escape(method))))
            .with_status(200)
            .with_header("content-type", "text/xml; charset=utf-8")
            .with_body(envelope(inner))
            .create_async()
            .await
    }

    /// Create a mock for an HTTP error response
    pub async fn mock_http_error(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", "/")
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }
}

fn regex_escape(method: &str) -> String {
    method.replace('.', "\\.")
}
