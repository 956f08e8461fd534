//! Result shape normalization.
//!
//! For list-returning methods the API answers with nothing when there are no records,
//! a single object for one record, and an array for several. These helpers collapse all
//! three into a `Vec`.

use crate::{Error, Result};
use serde_json::Value;

/// Descend `body` along `path` and return the result as a list.
///
/// - absent (or `null`) body, or a `null` anywhere on the way: empty list
/// - missing final key: empty list
/// - missing intermediate key, or a non-object where a key is needed: [`Error::MissingPath`]
/// - array: returned unchanged, same order
/// - any other single value: one-element list
pub fn to_list(body: Option<&Value>, path: &[&str]) -> Result<Vec<Value>> {
    let Some(mut current) = body else {
        return Ok(Vec::new());
    };

    for (depth, key) in path.iter().enumerate() {
        match current {
            Value::Null => return Ok(Vec::new()),
            Value::Object(fields) => match fields.get(*key) {
                Some(next) => current = next,
                None if depth + 1 == path.len() => return Ok(Vec::new()),
                None => return Err(Error::missing_path(path[..=depth].join("/"))),
            },
            _ => return Err(Error::missing_path(path[..=depth].join("/"))),
        }
    }

    Ok(match current {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        single => vec![single.clone()],
    })
}

/// [`to_list`] followed by projecting `field` out of every item.
///
/// Order and duplicates are preserved; items without the field contribute `null`.
pub fn to_scalar_list(body: Option<&Value>, path: &[&str], field: &str) -> Result<Vec<Value>> {
    Ok(to_list(body, path)?
        .into_iter()
        .map(|item| item.get(field).cloned().unwrap_or(Value::Null))
        .collect())
}

/// [`to_list`] for lists of plain values (ids, codes), rendered as strings.
///
/// `null` items are skipped.
pub fn to_string_list(body: Option<&Value>, path: &[&str]) -> Result<Vec<String>> {
    Ok(to_list(body, path)?.iter().filter_map(scalar_text).collect())
}

/// Text of a scalar node. Objects yield their element text, if any.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(fields) => fields
            .get(crate::xml::CONTENT_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string),
        Value::Null | Value::Array(_) => None,
    }
}
