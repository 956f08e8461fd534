//! Request parameter values.
//!
//! Parameters form a tree over a closed set of variants; the builder has exactly one
//! serializer per variant.

use crate::profile::Profile;
use chrono::NaiveDateTime;

/// Wire format for temporal parameters (no zone suffix).
pub const TEMPORAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way the API expects it.
///
/// The API works in the community's server zone; converting beforehand is the caller's job.
pub fn format_temporal(value: &NaiveDateTime) -> String {
    value.format(TEMPORAL_FORMAT).to_string()
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String, number or boolean, emitted as element text.
    Scalar(String),
    /// Explicitly tagged siblings: each `(tag, value)` becomes `<tag>value</tag>`.
    Pairs(Vec<(String, String)>),
    /// Nested parameters wrapped in an element named after the parent key.
    Map(Params),
    /// A person record: core fields inline, then a `CustomFieldResponses` block.
    Profile(Profile),
    /// A timestamp, formatted as `YYYY-MM-DD HH:MM:SS`.
    Temporal(NaiveDateTime),
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Scalar(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Scalar(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Scalar(v.clone())
    }
}

macro_rules! scalar_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    ParamValue::Scalar(v.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl From<NaiveDateTime> for ParamValue {
    fn from(v: NaiveDateTime) -> Self {
        ParamValue::Temporal(v)
    }
}

impl From<Profile> for ParamValue {
    fn from(v: Profile) -> Self {
        ParamValue::Profile(v)
    }
}

impl From<Params> for ParamValue {
    fn from(v: Params) -> Self {
        ParamValue::Map(v)
    }
}

impl From<Vec<(String, String)>> for ParamValue {
    fn from(v: Vec<(String, String)>) -> Self {
        ParamValue::Pairs(v)
    }
}

impl From<Vec<(&str, &str)>> for ParamValue {
    fn from(v: Vec<(&str, &str)>) -> Self {
        ParamValue::Pairs(
            v.into_iter()
                .map(|(tag, value)| (tag.to_string(), value.to_string()))
                .collect(),
        )
    }
}

/// Ordered parameter set. Keys are unique; re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert that skips `None`.
    pub fn with_opt<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
