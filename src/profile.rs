//! Person records.
//!
//! A profile is a fixed set of core fields defined by the service plus any number of
//! custom fields configured per community. The server nests custom fields in a
//! `CustomFieldResponses` container whose shape varies with the number of entries and
//! values; [`Profile`] flattens that into a code → value map.

use crate::response::normalize::{scalar_text, to_list};
use crate::{Error, ErrorContext, Result};
use serde_json::{Map, Value};

/// Name of the custom-field container, both in responses and in request documents.
pub const CUSTOM_FIELDS_KEY: &str = "CustomFieldResponses";

const CUSTOM_FIELD_ENTRY: &str = "CustomFieldResponse";

/// Value of one custom field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomValue {
    Single(String),
    Multiple(Vec<String>),
}

impl CustomValue {
    pub fn to_value(&self) -> Value {
        match self {
            CustomValue::Single(v) => Value::String(v.clone()),
            CustomValue::Multiple(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Interpret a parsed `Values/Value` node. An empty node has no value; empty items
    /// of a multi-valued node stay in place as empty strings.
    fn from_node(node: &Value) -> Option<Self> {
        match node {
            Value::Null => None,
            Value::Array(items) => Some(CustomValue::Multiple(
                items
                    .iter()
                    .map(|item| scalar_text(item).unwrap_or_default())
                    .collect(),
            )),
            other => scalar_text(other).map(CustomValue::Single),
        }
    }
}

impl From<&str> for CustomValue {
    fn from(v: &str) -> Self {
        CustomValue::Single(v.to_string())
    }
}

impl From<String> for CustomValue {
    fn from(v: String) -> Self {
        CustomValue::Single(v)
    }
}

impl From<Vec<String>> for CustomValue {
    fn from(v: Vec<String>) -> Self {
        CustomValue::Multiple(v)
    }
}

impl From<Vec<&str>> for CustomValue {
    fn from(v: Vec<&str>) -> Self {
        CustomValue::Multiple(v.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    data: Map<String, Value>,
    /// Custom fields in server order.
    custom_data: Vec<(String, Option<CustomValue>)>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from a result body such as `Member.Profile.Get`.
    pub fn from_envelope(raw: &Value) -> Result<Self> {
        match raw {
            Value::Object(fields) => Self::from_map(fields.clone()),
            Value::Null => Ok(Self::new()),
            _ => Err(Error::validation_with_context(
                "profile body is not an object",
                ErrorContext::new().with_source("profile"),
            )),
        }
    }

    /// Split `fields` into core fields and the parsed custom-field container.
    pub fn from_map(fields: Map<String, Value>) -> Result<Self> {
        let mut profile = Self::new();
        for (key, value) in fields {
            profile.set(key, value)?;
        }
        Ok(profile)
    }

    /// Profile for a record-creation call.
    ///
    /// `extra` may carry further core fields and a custom-field container; the six
    /// required fields always take the given values.
    pub fn create_new(
        first_name: &str,
        last_name: &str,
        member_type_code: &str,
        email: &str,
        username: &str,
        password: Option<&str>,
        extra: Map<String, Value>,
    ) -> Result<Self> {
        let mut profile = Self::from_map(extra)?;
        profile.set("FirstName", first_name)?;
        profile.set("LastName", last_name)?;
        profile.set("MemberTypeCode", member_type_code)?;
        profile.set("EmailAddr", email)?;
        profile.set("Username", username)?;
        profile.set("Password", password.map_or(Value::Null, Value::from))?;
        Ok(profile)
    }

    /// Core field `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Set a core field. Setting the custom-field container replaces the custom fields
    /// with the parsed container instead.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        if key == CUSTOM_FIELDS_KEY {
            self.custom_data = parse_custom_fields(&value)?;
        } else {
            self.data.insert(key, value);
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Core fields in insertion order, nulls included.
    pub fn core_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Custom fields in insertion order. `None` marks a field without a value.
    pub fn custom_fields(&self) -> impl Iterator<Item = (&str, Option<&CustomValue>)> {
        self.custom_data
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn custom_field(&self, code: &str) -> Option<&CustomValue> {
        self.custom_data
            .iter()
            .find(|(k, _)| k == code)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn set_custom(&mut self, code: impl Into<String>, value: impl Into<CustomValue>) {
        upsert(&mut self.custom_data, code.into(), Some(value.into()));
    }

    /// Keep `code` but without a value. It is still sent, as an empty `<Value/>`.
    pub fn clear_custom(&mut self, code: impl Into<String>) {
        upsert(&mut self.custom_data, code.into(), None);
    }

    pub fn remove_custom(&mut self, code: &str) -> Option<CustomValue> {
        let index = self.custom_data.iter().position(|(k, _)| k == code)?;
        self.custom_data.remove(index).1
    }

    /// Flat view: non-null core fields plus a `CustomFieldResponses` object keyed by
    /// field code, without the empty custom fields.
    pub fn to_flat(&self) -> Map<String, Value> {
        let mut flat: Map<String, Value> = self
            .data
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let custom: Map<String, Value> = self
            .custom_data
            .iter()
            .filter_map(|(code, value)| value.as_ref().map(|v| (code.clone(), v.to_value())))
            .collect();
        flat.insert(CUSTOM_FIELDS_KEY.to_string(), Value::Object(custom));
        flat
    }
}

/// Parse a `CustomFieldResponses` container.
///
/// The entry may be one object or a list of them. Entries without `Values` are skipped;
/// entries with an empty `Values/Value` are kept without a value.
fn parse_custom_fields(container: &Value) -> Result<Vec<(String, Option<CustomValue>)>> {
    let mut fields = Vec::new();
    for entry in to_list(Some(container), &[CUSTOM_FIELD_ENTRY])? {
        let Some(code) = entry.get("FieldCode").and_then(scalar_text) else {
            continue;
        };
        let Some(values) = entry.get("Values").filter(|v| !v.is_null()) else {
            continue;
        };
        let value = values.get("Value").and_then(CustomValue::from_node);
        upsert(&mut fields, code, value);
    }
    Ok(fields)
}

/// Replace the value of `code` in place, or append it.
fn upsert(
    fields: &mut Vec<(String, Option<CustomValue>)>,
    code: String,
    value: Option<CustomValue>,
) {
    match fields.iter_mut().find(|(k, _)| *k == code) {
        Some((_, slot)) => *slot = value,
        None => fields.push((code, value)),
    }
}
