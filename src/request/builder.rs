//! Request envelope builder.
//!
//! Every call is one XML document:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <YourMembership>
//!   <Version>2.00</Version>
//!   <ApiKey>...</ApiKey>
//!   <SaPasscode>...</SaPasscode>   <!-- admin methods only -->
//!   <SessionID>...</SessionID>     <!-- session-bound calls only -->
//!   <CallID>...</CallID>
//!   <Call Method="Member.Profile.Get">...</Call>
//! </YourMembership>
//! ```

use super::call_id::CallCounter;
use super::value::{format_temporal, ParamValue, Params};
use crate::config::Config;
use crate::profile::{CustomValue, Profile, CUSTOM_FIELDS_KEY};
use crate::session::Session;
use crate::xml::XmlError;
use crate::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;
use tracing::debug;

pub const REQUEST_ROOT: &str = "YourMembership";

/// Method-name prefix of administrative calls (matched case-insensitively).
pub const ADMIN_METHOD_PREFIX: &str = "sa.";

/// Whether `method` requires the administrative credential block.
pub fn is_admin_method(method: &str) -> bool {
    method
        .get(..ADMIN_METHOD_PREFIX.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(ADMIN_METHOD_PREFIX))
}

/// Who a request is issued as.
#[derive(Debug, Clone, Copy)]
pub enum Identity<'a> {
    /// No session: the process-wide generic call id is used.
    Generic,
    /// A session object; its own counter supplies the call id.
    Session(&'a Session),
    /// A bare session id with a caller-owned counter.
    SessionId {
        session_id: &'a str,
        counter: &'a CallCounter,
    },
}

impl<'a> From<&'a Session> for Identity<'a> {
    fn from(session: &'a Session) -> Self {
        Identity::Session(session)
    }
}

/// Composes request envelopes from configuration, identity and parameters.
pub struct RequestBuilder<'a> {
    config: &'a Config,
    generic_calls: &'a CallCounter,
}

type XmlWriter = Writer<Vec<u8>>;

fn emit(w: &mut XmlWriter, event: Event<'_>) -> std::result::Result<(), XmlError> {
    w.write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

fn open(w: &mut XmlWriter, name: &str) -> std::result::Result<(), XmlError> {
    emit(w, Event::Start(BytesStart::new(name)))
}

fn close(w: &mut XmlWriter, name: &str) -> std::result::Result<(), XmlError> {
    emit(w, Event::End(BytesEnd::new(name)))
}

fn text_element(w: &mut XmlWriter, name: &str, text: &str) -> std::result::Result<(), XmlError> {
    if text.is_empty() {
        return emit(w, Event::Empty(BytesStart::new(name)));
    }
    open(w, name)?;
    emit(w, Event::Text(BytesText::new(text)))?;
    close(w, name)
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a Config, generic_calls: &'a CallCounter) -> Self {
        Self {
            config,
            generic_calls,
        }
    }

    /// Build the envelope for `method`.
    ///
    /// Consumes exactly one call id from whichever counter the identity selects.
    pub fn build(&self, method: &str, identity: Identity<'_>, params: &Params) -> Result<String> {
        let (session_id, call_id) = match identity {
            Identity::Generic => (None, self.generic_calls.next_id()),
            Identity::Session(session) => {
                if session.is_abandoned() {
                    return Err(Error::SessionAbandoned {
                        session_id: session.session_id().to_string(),
                    });
                }
                (Some(session.session_id()), session.call_id())
            }
            Identity::SessionId {
                session_id,
                counter,
            } => (Some(session_id), counter.next_id()),
        };
        let admin = is_admin_method(method);
        debug!(
            method,
            call_id,
            admin,
            with_session = session_id.is_some(),
            "building request envelope"
        );

        let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
        emit(
            &mut w,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        open(&mut w, REQUEST_ROOT)?;
        text_element(&mut w, "Version", &self.config.version)?;
        if admin {
            text_element(&mut w, "ApiKey", &self.config.private_key)?;
            text_element(&mut w, "SaPasscode", &self.config.sa_passcode)?;
        } else {
            text_element(&mut w, "ApiKey", &self.config.public_key)?;
        }
        if let Some(id) = session_id {
            text_element(&mut w, "SessionID", id)?;
        }
        text_element(&mut w, "CallID", &call_id.to_string())?;

        let mut call = BytesStart::new("Call");
        call.push_attribute(("Method", method));
        if params.is_empty() {
            emit(&mut w, Event::Empty(call))?;
        } else {
            emit(&mut w, Event::Start(call))?;
            write_params(&mut w, params)?;
            close(&mut w, "Call")?;
        }
        close(&mut w, REQUEST_ROOT)?;

        let xml = String::from_utf8(w.into_inner()).map_err(|e| XmlError::Write(e.to_string()))?;
        Ok(xml)
    }
}

fn write_params(w: &mut XmlWriter, params: &Params) -> std::result::Result<(), XmlError> {
    for (key, value) in params.iter() {
        write_param(w, key, value)?;
    }
    Ok(())
}

fn write_param(w: &mut XmlWriter, key: &str, value: &ParamValue) -> std::result::Result<(), XmlError> {
    match value {
        ParamValue::Scalar(text) => text_element(w, key, text),
        ParamValue::Pairs(pairs) => write_pairs(w, key, pairs),
        ParamValue::Map(nested) => {
            open(w, key)?;
            write_params(w, nested)?;
            close(w, key)
        }
        // The parameter key is not used: profile fields sit directly inside <Call>.
        ParamValue::Profile(profile) => write_profile(w, profile),
        ParamValue::Temporal(dt) => text_element(w, key, &format_temporal(dt)),
    }
}

fn write_pairs(
    w: &mut XmlWriter,
    key: &str,
    pairs: &[(String, String)],
) -> std::result::Result<(), XmlError> {
    open(w, key)?;
    for (tag, value) in pairs {
        text_element(w, tag, value)?;
    }
    close(w, key)
}

fn write_profile(w: &mut XmlWriter, profile: &Profile) -> std::result::Result<(), XmlError> {
    for (key, value) in profile.core_fields() {
        write_json(w, key, value)?;
    }
    open(w, CUSTOM_FIELDS_KEY)?;
    for (code, value) in profile.custom_fields() {
        write_custom_field(w, code, value)?;
    }
    close(w, CUSTOM_FIELDS_KEY)
}

fn write_custom_field(
    w: &mut XmlWriter,
    code: &str,
    value: Option<&CustomValue>,
) -> std::result::Result<(), XmlError> {
    let mut response = BytesStart::new("CustomFieldResponse");
    response.push_attribute(("FieldCode", code));
    emit(w, Event::Start(response))?;
    open(w, "Values")?;
    match value {
        Some(CustomValue::Single(v)) => text_element(w, "Value", v)?,
        Some(CustomValue::Multiple(items)) => {
            for item in items {
                text_element(w, "Value", item)?;
            }
        }
        None => text_element(w, "Value", "")?,
    }
    close(w, "Values")?;
    close(w, "CustomFieldResponse")
}

fn write_json(w: &mut XmlWriter, key: &str, value: &Value) -> std::result::Result<(), XmlError> {
    match value {
        Value::Null => text_element(w, key, ""),
        Value::String(s) => text_element(w, key, s),
        Value::Bool(b) => text_element(w, key, &b.to_string()),
        Value::Number(n) => text_element(w, key, &n.to_string()),
        Value::Array(items) => {
            for item in items {
                write_json(w, key, item)?;
            }
            Ok(())
        }
        Value::Object(fields) => {
            open(w, key)?;
            for (k, v) in fields {
                write_json(w, k, v)?;
            }
            close(w, key)
        }
    }
}
