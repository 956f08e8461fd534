//! API sessions.
//!
//! A session is created by the server (`Session.Create`), may have a member bound to it
//! by authentication, and ends with `Session.Abandon`. Every request carrying the session
//! also carries the next value of its call counter.

use crate::client::validation::validate_envelope;
use crate::client::YmClient;
use crate::error_code::ApiErrorCode;
use crate::request::{CallCounter, Identity, Params};
use crate::response::normalize::scalar_text;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info};

pub const SESSION_CREATE: &str = "Session.Create";
pub const SESSION_PING: &str = "Session.Ping";
pub const SESSION_ABANDON: &str = "Session.Abandon";
pub const AUTH_AUTHENTICATE: &str = "Auth.Authenticate";
pub const AUTH_CREATE_TOKEN: &str = "Auth.CreateToken";
pub const MEMBER_IS_AUTHENTICATED: &str = "Member.IsAuthenticated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no member bound.
    Created,
    /// A member id is bound.
    Authenticated,
    /// Abandoned; no further requests can be built with it.
    Abandoned,
}

/// A server-side session and its call counter.
///
/// A session is meant to have one owner. The counter is atomic, so sharing a `&Session`
/// across tasks still yields unique call ids, but request order is then up to the caller.
#[derive(Debug)]
pub struct Session {
    session_id: String,
    calls: CallCounter,
    user_id: Option<String>,
    abandoned: bool,
}

impl Session {
    /// Session with a known id, counter at its baseline and no member bound.
    pub fn from_id(session_id: impl Into<String>) -> Self {
        Self::resume(session_id, crate::request::SESSION_CALL_ID_SEED)
    }

    /// Session with a known id whose next call id is `next_call_id`.
    pub fn resume(session_id: impl Into<String>, next_call_id: u64) -> Self {
        Self {
            session_id: session_id.into(),
            calls: CallCounter::starting_at(next_call_id),
            user_id: None,
            abandoned: false,
        }
    }

    /// Open a new session.
    pub async fn create(client: &YmClient) -> Result<Self> {
        let envelope = client
            .call(SESSION_CREATE, Identity::Generic, &Params::new())
            .await?;
        let session_id = envelope
            .result_for(SESSION_CREATE)
            .and_then(|body| body.get("SessionID"))
            .and_then(scalar_text)
            .ok_or_else(|| Error::missing_path(format!("{}/SessionID", SESSION_CREATE)))?;
        info!(session_id = %session_id, "session created");
        Ok(Self::from_id(session_id))
    }

    /// Open a new session and authenticate it.
    pub async fn create_authenticated(
        client: &YmClient,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let mut session = Self::create(client).await?;
        session.authenticate(client, username, password).await?;
        Ok(session)
    }

    /// Next call id. Every read consumes one.
    pub fn call_id(&self) -> u64 {
        self.calls.next_id()
    }

    /// The call id the next request will carry.
    pub fn next_call_id(&self) -> u64 {
        self.calls.peek()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Member bound by the last authentication check, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    pub(crate) fn mark_abandoned(&mut self) {
        self.abandoned = true;
    }

    pub fn state(&self) -> SessionState {
        if self.abandoned {
            SessionState::Abandoned
        } else if self.user_id.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Created
        }
    }

    /// Bind a member by username and password.
    ///
    /// Returns the bound member id, or `None` when the server accepted the call but
    /// returned no authentication payload.
    pub async fn authenticate(
        &mut self,
        client: &YmClient,
        username: &str,
        password: &str,
    ) -> Result<Option<String>> {
        let params = Params::new()
            .with("Username", username)
            .with("Password", password);
        let envelope = client
            .call(AUTH_AUTHENTICATE, Identity::Session(&*self), &params)
            .await?;
        if envelope.result_for(AUTH_AUTHENTICATE).is_none() {
            debug!(session_id = %self.session_id, "authentication returned no payload");
            return Ok(None);
        }
        let user_id = self.refresh_user(client).await?;
        info!(
            session_id = %self.session_id,
            authenticated = user_id.is_some(),
            "session authenticated"
        );
        Ok(user_id)
    }

    /// Ask the server which member is bound to this session.
    ///
    /// An expired session (202) and "method requires authentication" (403) both mean no
    /// member is bound; any other error code fails.
    pub async fn is_authenticated(&self, client: &YmClient) -> Result<Option<String>> {
        let envelope = client
            .call_raw(MEMBER_IS_AUTHENTICATED, Identity::Session(&*self), &Params::new())
            .await?;
        if let Some(code) = ApiErrorCode::from_code(&envelope.err_code) {
            if code.recoverable_in_probe() {
                debug!(session_id = %self.session_id, code = %code, "no member bound to session");
                return Ok(None);
            }
        }
        validate_envelope(MEMBER_IS_AUTHENTICATED, &envelope)?;
        Ok(envelope
            .result_for(MEMBER_IS_AUTHENTICATED)
            .and_then(|body| body.get("ID"))
            .and_then(scalar_text))
    }

    /// Re-run the authentication check and store the result.
    pub async fn refresh_user(&mut self, client: &YmClient) -> Result<Option<String>> {
        self.user_id = self.is_authenticated(client).await?;
        Ok(self.user_id.clone())
    }

    /// Keep-alive. True only when the server reports the session alive.
    pub async fn ping(&self, client: &YmClient) -> Result<bool> {
        let envelope = client
            .call(SESSION_PING, Identity::Session(&*self), &Params::new())
            .await?;
        Ok(envelope
            .result_for(SESSION_PING)
            .and_then(scalar_text)
            .map_or(false, |alive| alive == "1"))
    }

    /// Alias of [`ping`](Self::ping).
    pub async fn valid(&self, client: &YmClient) -> Result<bool> {
        self.ping(client).await
    }

    /// Whether the session is alive and has a member bound. Refreshes the bound member.
    pub async fn authenticated(&mut self, client: &YmClient) -> Result<bool> {
        if !self.ping(client).await? {
            return Ok(false);
        }
        Ok(self.refresh_user(client).await?.is_some())
    }

    /// End the session. Requests built with it afterwards fail with
    /// [`Error::SessionAbandoned`].
    pub async fn abandon(&mut self, client: &YmClient) -> Result<bool> {
        client
            .call(SESSION_ABANDON, Identity::Session(&*self), &Params::new())
            .await?;
        self.mark_abandoned();
        info!(session_id = %self.session_id, "session abandoned");
        Ok(true)
    }

    /// Create a single sign-on token (`Auth.CreateToken`).
    ///
    /// The result carries the token and its `GoToUrl`.
    pub async fn create_token(
        &self,
        client: &YmClient,
        options: &Params,
    ) -> Result<Map<String, Value>> {
        let envelope = client
            .call(AUTH_CREATE_TOKEN, Identity::Session(&*self), options)
            .await?;
        Ok(envelope.result_object(AUTH_CREATE_TOKEN))
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.session_id)
    }
}
