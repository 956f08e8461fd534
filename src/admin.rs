//! Administrative calls.
//!
//! Every method here carries the `sa.` prefix, so requests are signed with the private key
//! and passcode. They are issued without a session and use the generic call counter.

use crate::client::YmClient;
use crate::member::{invoice_ids, with_order_status, Member, OrderStatus, SessionBindError};
use crate::profile::Profile;
use crate::request::{Identity, Params};
use crate::response::normalize::{scalar_text, to_list, to_string_list};
use crate::response::ResponseEnvelope;
use crate::session::Session;
use crate::Result;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct Admin<'a> {
    client: &'a YmClient,
}

impl<'a> Admin<'a> {
    pub fn new(client: &'a YmClient) -> Self {
        Self { client }
    }

    async fn call(&self, method: &str, params: &Params) -> Result<ResponseEnvelope> {
        self.client.call(method, Identity::Generic, params).await
    }

    /// Ids of all members matching `options`.
    pub async fn members_all_get_ids(&self, options: &Params) -> Result<Vec<String>> {
        const METHOD: &str = "Sa.Members.All.GetIDs";
        let envelope = self.call(METHOD, options).await?;
        to_string_list(envelope.result_for(METHOD), &["Members", "ID"])
    }

    pub async fn members_all_recent_activity(&self) -> Result<Map<String, Value>> {
        const METHOD: &str = "Sa.Members.All.RecentActivity";
        let envelope = self.call(METHOD, &Params::new()).await?;
        Ok(envelope.result_object(METHOD))
    }

    pub async fn members_commerce_store_get_order_ids(
        &self,
        member_id: &str,
        status: Option<OrderStatus>,
        options: Params,
    ) -> Result<Vec<String>> {
        const METHOD: &str = "Sa.Members.Commerce.Store.GetOrderIDs";
        let params = with_order_status(options.with("ID", member_id), status);
        let envelope = self.call(METHOD, &params).await?;
        invoice_ids(envelope.result_for(METHOD))
    }

    pub async fn member_certifications_get(
        &self,
        member_id: &str,
        options: Params,
    ) -> Result<Vec<Value>> {
        const METHOD: &str = "Sa.Member.Certifications.Get";
        let envelope = self.call(METHOD, &options.with("ID", member_id)).await?;
        to_list(envelope.result_for(METHOD), &["Certification"])
    }

    pub async fn people_all_get_ids(&self, options: &Params) -> Result<Vec<String>> {
        const METHOD: &str = "Sa.People.All.GetIDs";
        let envelope = self.call(METHOD, options).await?;
        to_string_list(envelope.result_for(METHOD), &["People", "ID"])
    }

    /// Id of the single person matching `options`.
    ///
    /// The server answers 406 when no record or more than one record matches.
    pub async fn people_profile_find_id(&self, options: &Params) -> Result<Option<String>> {
        const METHOD: &str = "Sa.People.Profile.FindID";
        let envelope = self.call(METHOD, options).await?;
        Ok(envelope
            .result_for(METHOD)
            .and_then(|body| body.get("ID"))
            .and_then(scalar_text))
    }

    pub async fn people_profile_get(&self, id: &str) -> Result<Profile> {
        const METHOD: &str = "Sa.People.Profile.Get";
        let envelope = self.call(METHOD, &Params::new().with("ID", id)).await?;
        match envelope.result_for(METHOD) {
            Some(body) => Profile::from_envelope(body),
            None => Ok(Profile::new()),
        }
    }

    pub async fn people_profile_groups_get(&self, id: &str) -> Result<Map<String, Value>> {
        const METHOD: &str = "Sa.People.Profile.Groups.Get";
        let envelope = self.call(METHOD, &Params::new().with("ID", id)).await?;
        Ok(envelope.result_object(METHOD))
    }

    /// Overwrite the fields present in `profile`; fields not set are left unchanged.
    pub async fn people_profile_update(&self, id: &str, profile: Profile) -> Result<()> {
        let params = Params::new().with("ID", id).with("profile", profile);
        self.call("Sa.People.Profile.Update", &params).await?;
        Ok(())
    }
}

/// Outcome of [`auth_authenticate`].
#[derive(Debug)]
pub enum Authentication {
    Bound(Member),
    /// The server accepted the call but returned no authentication payload.
    Unbound(Session),
}

impl Authentication {
    pub fn is_bound(&self) -> bool {
        matches!(self, Authentication::Bound(_))
    }

    pub fn into_member(self) -> Option<Member> {
        match self {
            Authentication::Bound(member) => Some(member),
            Authentication::Unbound(_) => None,
        }
    }
}

/// Bind a member to `session` with administrative credentials and load that member.
///
/// Either `password` or `password_hash` identifies the member. The session is handed
/// back when nothing was bound and on every error.
pub async fn auth_authenticate(
    client: Arc<YmClient>,
    mut session: Session,
    username: &str,
    password: Option<&str>,
    password_hash: Option<&str>,
) -> std::result::Result<Authentication, SessionBindError> {
    const METHOD: &str = "Sa.Auth.Authenticate";
    let params = Params::new()
        .with("Username", username)
        .with_opt("Password", password)
        .with_opt("PasswordHash", password_hash);
    let envelope = match client
        .call(METHOD, Identity::Session(&session), &params)
        .await
    {
        Ok(envelope) => envelope,
        Err(error) => return Err(SessionBindError::new(error, session)),
    };
    if envelope.result_for(METHOD).is_none() {
        return Ok(Authentication::Unbound(session));
    }
    if let Err(error) = session.refresh_user(&client).await {
        return Err(SessionBindError::new(error, session));
    }
    info!(session_id = %session, user_id = ?session.user_id(), "session bound by administrator");
    Member::create_from_session(client, session)
        .await
        .map(Authentication::Bound)
}
