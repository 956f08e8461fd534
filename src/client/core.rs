use crate::admin::Admin;
use crate::client::builder::YmClientBuilder;
use crate::client::validation;
use crate::config::Config;
use crate::people::Community;
use crate::request::{CallCounter, Identity, Params, RequestBuilder};
use crate::response::ResponseEnvelope;
use crate::session::Session;
use crate::transport::Transport;
use crate::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Entry point for calls against one YourMembership endpoint.
///
/// Each call is a single request/response exchange; the client holds no per-call state
/// besides the shared generic call counter, so it can be shared behind an `Arc`.
pub struct YmClient {
    pub(crate) config: Config,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) generic_calls: Arc<CallCounter>,
}

impl fmt::Debug for YmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YmClient")
            .field("config", &self.config)
            .field("next_generic_call_id", &self.generic_calls.peek())
            .finish_non_exhaustive()
    }
}

impl YmClient {
    /// Client over the default HTTP transport.
    pub fn new(config: Config) -> Result<Self> {
        YmClientBuilder::new().config(config).build()
    }

    pub fn builder() -> YmClientBuilder {
        YmClientBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Counter used for requests without a session.
    pub fn generic_counter(&self) -> &Arc<CallCounter> {
        &self.generic_calls
    }

    /// Build the request document for `method` without sending it.
    ///
    /// Consumes one call id.
    pub fn build_request(
        &self,
        method: &str,
        identity: Identity<'_>,
        params: &Params,
    ) -> Result<String> {
        RequestBuilder::new(&self.config, &self.generic_calls).build(method, identity, params)
    }

    /// Send `method` and parse the response, without checking its status code.
    pub async fn call_raw(
        &self,
        method: &str,
        identity: Identity<'_>,
        params: &Params,
    ) -> Result<ResponseEnvelope> {
        let body = self.build_request(method, identity, params)?;
        let response = self.transport.post(body).await.map_err(|e| {
            warn!(method, error = %e, "request to YourMembership API failed");
            e
        })?;
        let envelope = validation::decode(response)?;
        debug!(method, code = %envelope.err_code, "received response envelope");
        Ok(envelope)
    }

    /// Send `method`, failing on any non-zero status code.
    pub async fn call(
        &self,
        method: &str,
        identity: Identity<'_>,
        params: &Params,
    ) -> Result<ResponseEnvelope> {
        let envelope = self.call_raw(method, identity, params).await?;
        validation::validate_envelope(method, &envelope)?;
        Ok(envelope)
    }

    /// Session-scoped community calls (people, events, conversions).
    pub fn community<'a>(&'a self, session: &'a Session) -> Community<'a> {
        Community::new(self, session)
    }

    /// Administrative (`sa.`) calls.
    pub fn admin(&self) -> Admin<'_> {
        Admin::new(self)
    }
}
