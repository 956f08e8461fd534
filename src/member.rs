//! Member façade.
//!
//! A [`Member`] is an authenticated session plus the member's identity. Its methods are
//! the member-scoped API calls, each issued with the member's session. Establishing the
//! session is only possible through the constructors.

use crate::client::YmClient;
use crate::profile::Profile;
use crate::request::{Identity, Params};
use crate::response::normalize::{scalar_text, to_list, to_scalar_list};
use crate::response::ResponseEnvelope;
use crate::session::Session;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Store order status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Cancelled,
    Open,
    Processed,
    /// Also reported as "closed".
    Shipped,
}

impl OrderStatus {
    /// Numeric code sent as the `Status` parameter.
    pub fn code(&self) -> i32 {
        match self {
            OrderStatus::Cancelled => -1,
            OrderStatus::Open => 0,
            OrderStatus::Processed => 1,
            OrderStatus::Shipped => 2,
        }
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cancelled" => Ok(OrderStatus::Cancelled),
            "open" => Ok(OrderStatus::Open),
            "processed" => Ok(OrderStatus::Processed),
            "shipped" | "closed" => Ok(OrderStatus::Shipped),
            other => Err(Error::validation_with_context(
                format!("unknown order status: {}", other),
                crate::ErrorContext::new()
                    .with_field_path("Status")
                    .with_source("order_status"),
            )),
        }
    }
}

/// Add `Status` to `options` when a filter is given.
pub(crate) fn with_order_status(mut options: Params, status: Option<OrderStatus>) -> Params {
    if let Some(status) = status {
        options.insert("Status", status.code());
    }
    options
}

/// Invoice ids of an order-id result, in server order.
pub(crate) fn invoice_ids(body: Option<&Value>) -> Result<Vec<String>> {
    let orders = body.and_then(|b| b.get("Orders"));
    Ok(to_scalar_list(orders, &["Order"], "InvoiceID")?
        .iter()
        .filter_map(scalar_text)
        .collect())
}

/// A call that binds a member to a caller-supplied session failed.
///
/// Carries the session back so the caller can keep using it.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct SessionBindError {
    #[source]
    pub error: Error,
    pub session: Session,
}

impl SessionBindError {
    pub fn new(error: Error, session: Session) -> Self {
        Self { error, session }
    }

    pub fn into_parts(self) -> (Error, Session) {
        (self.error, self.session)
    }
}

impl From<SessionBindError> for Error {
    fn from(e: SessionBindError) -> Self {
        e.error
    }
}

pub struct Member {
    client: Arc<YmClient>,
    session: Session,
    id: String,
    website_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile: Option<Profile>,
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("website_id", &self.website_id)
            .field("session", &self.session.session_id())
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Member {
    /// Open a session, authenticate it, and load the member bound to it.
    pub async fn create_by_authentication(
        client: Arc<YmClient>,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let session = Session::create_authenticated(&client, username, password).await?;
        Ok(Self::create_from_session(client, session).await?)
    }

    /// Load the member bound to an authenticated `session`.
    ///
    /// On failure the session comes back inside the error, so its call counter survives.
    pub async fn create_from_session(
        client: Arc<YmClient>,
        session: Session,
    ) -> std::result::Result<Self, SessionBindError> {
        let mini = match profile_get_mini(&client, &session).await {
            Ok(mini) => mini,
            Err(error) => return Err(SessionBindError::new(error, session)),
        };
        let field = |key: &str| mini.get(key).and_then(scalar_text);
        let Some(id) = field("ID") else {
            return Err(SessionBindError::new(
                Error::missing_path("Member.Profile.GetMini/ID"),
                session,
            ));
        };
        let member = Self {
            website_id: field("WebsiteID").unwrap_or_default(),
            first_name: field("FirstName").unwrap_or_default(),
            last_name: field("LastName").unwrap_or_default(),
            email: field("EmailAddr").unwrap_or_default(),
            id,
            client,
            session,
            profile: None,
        };
        info!(member_id = %member.id, session_id = %member.session, "member loaded");
        Ok(member)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn website_id(&self) -> &str {
        &self.website_id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    async fn call(&self, method: &str, params: &Params) -> Result<ResponseEnvelope> {
        self.client
            .call(method, Identity::Session(&self.session), params)
            .await
    }

    async fn call_list(&self, method: &str, params: &Params, path: &[&str]) -> Result<Vec<Value>> {
        let envelope = self.call(method, params).await?;
        to_list(envelope.result_for(method), path)
    }

    pub async fn certifications_get(&self, options: &Params) -> Result<Vec<Value>> {
        self.call_list("Member.Certifications.Get", options, &["Certification"])
            .await
    }

    pub async fn certifications_journal_get(&self, options: &Params) -> Result<Vec<Value>> {
        self.call_list("Member.Certifications.Journal.Get", options, &["Entry"])
            .await
    }

    /// Invoice ids of the member's store orders.
    pub async fn commerce_store_get_order_ids(
        &self,
        status: Option<OrderStatus>,
        options: Params,
    ) -> Result<Vec<String>> {
        const METHOD: &str = "Member.Commerce.Store.GetOrderIDs";
        let params = with_order_status(options, status);
        let envelope = self.call(METHOD, &params).await?;
        invoice_ids(envelope.result_for(METHOD))
    }

    pub async fn commerce_store_order_get(&self, invoice_id: &str) -> Result<Vec<Value>> {
        let params = Params::new().with("InvoiceID", invoice_id);
        self.call_list("Member.Commerce.Store.Order.Get", &params, &["Order"])
            .await
    }

    pub async fn connection_approve(&self, id: &str, approve: bool) -> Result<()> {
        let params = Params::new().with("ID", id).with("Approve", u8::from(approve));
        self.call("Member.Connection.Approve", &params).await?;
        Ok(())
    }

    /// Request document for a media upload.
    ///
    /// Uploads are posted by the caller together with the file, so only the document is
    /// built. It consumes one call id of the session.
    pub fn media_gallery_upload(&self, options: &Params) -> Result<String> {
        self.client.build_request(
            "Member.MediaGallery.Upload",
            Identity::Session(&self.session),
            options,
        )
    }

    pub async fn messages_get_inbox(&self, options: &Params) -> Result<Vec<Value>> {
        self.call_list("Member.Messages.GetInbox", options, &["Message"])
            .await
    }

    pub async fn messages_get_sent(&self, options: &Params) -> Result<Vec<Value>> {
        self.call_list("Member.Messages.GetSent", options, &["Message"])
            .await
    }

    pub async fn messages_message_read(&self, message_id: &str) -> Result<Option<Value>> {
        const METHOD: &str = "Member.Messages.Message.Read";
        let params = Params::new().with("MessageID", message_id);
        let envelope = self.call(METHOD, &params).await?;
        Ok(envelope
            .result_for(METHOD)
            .and_then(|body| body.get("Message"))
            .filter(|message| !message.is_null())
            .cloned())
    }

    pub async fn messages_message_send(
        &self,
        member_id: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        let params = Params::new()
            .with("ID", member_id)
            .with("Subject", subject)
            .with("Body", body);
        self.call("Member.Messages.Message.Send", &params).await?;
        Ok(())
    }

    pub async fn password_initialize_reset(&self, options: &Params) -> Result<()> {
        self.call("Member.Password.InitializeReset", options).await?;
        Ok(())
    }

    pub async fn password_update(&self, new_password: &str, options: Params) -> Result<()> {
        let params = options.with("NewPassword", new_password);
        self.call("Member.Password.Update", &params).await?;
        Ok(())
    }

    /// Full profile of the member.
    pub async fn profile_get(&self) -> Result<Profile> {
        const METHOD: &str = "Member.Profile.Get";
        let envelope = self.call(METHOD, &Params::new()).await?;
        match envelope.result_for(METHOD) {
            Some(body) => Profile::from_envelope(body),
            None => Ok(Profile::new()),
        }
    }

    /// Fetch the full profile and keep it on the member.
    pub async fn load_profile(&mut self) -> Result<&Profile> {
        let profile = self.profile_get().await?;
        Ok(self.profile.insert(profile))
    }

    pub async fn profile_get_mini(&self) -> Result<Map<String, Value>> {
        profile_get_mini(&self.client, &self.session).await
    }

    /// Post to a wall; the member's own when `id` is `None`.
    pub async fn wall_post(&self, post_text: &str, id: Option<&str>) -> Result<()> {
        let params = Params::new()
            .with_opt("ID", id)
            .with("PostText", post_text);
        self.call("Member.Wall.Post", &params).await?;
        Ok(())
    }

    /// Id of the member bound to the session, if the session is still authenticated.
    pub async fn is_authenticated(&self) -> Result<Option<String>> {
        self.session.is_authenticated(&self.client).await
    }
}

async fn profile_get_mini(client: &YmClient, session: &Session) -> Result<Map<String, Value>> {
    const METHOD: &str = "Member.Profile.GetMini";
    let envelope = client
        .call(METHOD, Identity::Session(session), &Params::new())
        .await?;
    Ok(envelope.result_object(METHOD))
}
