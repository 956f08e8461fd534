use crate::client::core::YmClient;
use crate::config::Config;
use crate::request::CallCounter;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Generic call counter shared by every client that is not given its own.
static PROCESS_CALL_COUNTER: Lazy<Arc<CallCounter>> =
    Lazy::new(|| Arc::new(CallCounter::generic()));

/// Builder for [`YmClient`].
///
/// Keep this surface area small and predictable.
#[derive(Default)]
pub struct YmClientBuilder {
    config: Option<Config>,
    transport: Option<Arc<dyn Transport>>,
    generic_calls: Option<Arc<CallCounter>>,
    /// Override base URI (primarily for testing with mock servers)
    base_uri_override: Option<String>,
}

impl YmClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config`. Without one, configuration is read from the environment
    /// (see [`Config::from_env`]).
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject a transport. Default is [`HttpTransport`] on the configured endpoint.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Inject the counter for session-less calls.
    ///
    /// Defaults to a single process-wide counter seeded at 10000.
    pub fn generic_counter(mut self, counter: Arc<CallCounter>) -> Self {
        self.generic_calls = Some(counter);
        self
    }

    /// Override the configured base URI.
    ///
    /// This is primarily for testing with mock servers.
    pub fn base_uri_override(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri_override = Some(base_uri.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<YmClient> {
        let mut config = self.config.unwrap_or_else(Config::from_env);
        if let Some(base_uri) = self.base_uri_override {
            config.base_uri = base_uri;
        }
        config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&config)?),
        };
        let generic_calls = self
            .generic_calls
            .unwrap_or_else(|| Arc::clone(&PROCESS_CALL_COUNTER));

        Ok(YmClient {
            config,
            transport,
            generic_calls,
        })
    }
}
