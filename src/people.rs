//! Session-scoped community calls: people and events directories, time conversion.

use crate::client::YmClient;
use crate::profile::Profile;
use crate::request::{Identity, Params};
use crate::response::normalize::to_list;
use crate::response::ResponseEnvelope;
use crate::session::Session;
use crate::Result;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// Community calls issued with one session.
#[derive(Debug, Clone, Copy)]
pub struct Community<'a> {
    client: &'a YmClient,
    session: &'a Session,
}

impl<'a> Community<'a> {
    pub fn new(client: &'a YmClient, session: &'a Session) -> Self {
        Self { client, session }
    }

    async fn call(&self, method: &str, params: &Params) -> Result<ResponseEnvelope> {
        self.client
            .call(method, Identity::Session(self.session), params)
            .await
    }

    async fn search(&self, method: &str, options: &Params) -> Result<Vec<Value>> {
        let envelope = self.call(method, options).await?;
        to_list(envelope.result_for(method), &["Results", "Item"])
    }

    /// Directory search; one entry per matching person.
    pub async fn people_all_search(&self, options: &Params) -> Result<Vec<Value>> {
        self.search("People.All.Search", options).await
    }

    pub async fn people_profile_get(&self, id: &str) -> Result<Profile> {
        const METHOD: &str = "People.Profile.Get";
        let envelope = self.call(METHOD, &Params::new().with("ID", id)).await?;
        match envelope.result_for(METHOD) {
            Some(body) => Profile::from_envelope(body),
            None => Ok(Profile::new()),
        }
    }

    pub async fn events_all_search(&self, options: &Params) -> Result<Vec<Value>> {
        self.search("Events.All.Search", options).await
    }

    pub async fn events_event_get(&self, event_id: &str) -> Result<Map<String, Value>> {
        const METHOD: &str = "Events.Event.Get";
        let envelope = self
            .call(METHOD, &Params::new().with("EventID", event_id))
            .await?;
        Ok(envelope.result_object(METHOD))
    }

    pub async fn events_event_attendees_get(&self, event_id: &str) -> Result<Vec<Value>> {
        const METHOD: &str = "Events.Event.Attendees.Get";
        let envelope = self
            .call(METHOD, &Params::new().with("EventID", event_id))
            .await?;
        to_list(envelope.result_for(METHOD), &["Attendees", "Attendee"])
    }

    /// Convert a local time with the given GMT bias (in hours) to US Eastern time.
    pub async fn convert_to_eastern_time(
        &self,
        local_time: NaiveDateTime,
        local_gmt_bias: i32,
    ) -> Result<Option<Value>> {
        const METHOD: &str = "Convert.ToEasternTime";
        let params = Params::new()
            .with("LocalTime", local_time)
            .with("LocalGmtBias", local_gmt_bias);
        let envelope = self.call(METHOD, &params).await?;
        Ok(envelope.result_for(METHOD).cloned())
    }
}
