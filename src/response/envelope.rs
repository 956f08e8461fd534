use super::normalize::scalar_text;
use super::tags::result_tag;
use crate::error_code::SUCCESS_CODE;
use crate::xml::{parse_document, XmlError};
use serde_json::{Map, Value};

pub const RESPONSE_ROOT: &str = "YourMembership_Response";

/// Parsed `<YourMembership_Response>` document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub err_code: String,
    pub err_desc: Option<String>,
    pub extended_error_info: Option<String>,
    root: Map<String, Value>,
}

impl ResponseEnvelope {
    /// Parse an already-repaired response body.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let (name, root) = parse_document(xml)?;
        if name != RESPONSE_ROOT {
            return Err(XmlError::UnexpectedRoot {
                expected: RESPONSE_ROOT.to_string(),
                found: name,
            });
        }
        let root = match root {
            Value::Object(fields) => fields,
            _ => {
                return Err(XmlError::MalformedEnvelope(
                    "response root has no children".to_string(),
                ))
            }
        };
        Self::from_root(root)
    }

    /// Build an envelope from an already-parsed root object.
    pub fn from_root(root: Map<String, Value>) -> Result<Self, XmlError> {
        let err_code = root
            .get("ErrCode")
            .and_then(scalar_text)
            .ok_or_else(|| XmlError::MalformedEnvelope("missing ErrCode".to_string()))?;
        let err_desc = root.get("ErrDesc").and_then(scalar_text);
        let extended_error_info = root.get("ExtendedErrorInfo").and_then(scalar_text);
        Ok(Self {
            err_code: err_code.trim().to_string(),
            err_desc,
            extended_error_info,
            root,
        })
    }

    pub fn is_success(&self) -> bool {
        self.err_code == SUCCESS_CODE
    }

    /// The body stored under `tag`. Absent and empty (`null`) bodies both yield `None`.
    pub fn result(&self, tag: &str) -> Option<&Value> {
        self.root.get(tag).filter(|v| !v.is_null())
    }

    /// The body of `method`'s result, resolving known tag divergences.
    pub fn result_for(&self, method: &str) -> Option<&Value> {
        self.result(result_tag(method))
    }

    /// The result body as an object; anything else yields an empty map.
    pub fn result_object(&self, method: &str) -> Map<String, Value> {
        match self.result_for(method) {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Map::new(),
        }
    }

    /// The whole root element.
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }
}
