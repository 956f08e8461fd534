//! CDATA repair.
//!
//! The API sometimes HTML-escapes the delimiters of embedded CDATA sections, so the body
//! contains `&lt;![CDATA[ ... ]]&gt;` where a real `<![CDATA[ ... ]]>` was meant. Left
//! alone, the enclosed markup breaks parsing. The repair only runs when the escaped
//! opening marker is present, so documents that legitimately escape `<`/`>` elsewhere
//! pass through untouched.

use std::borrow::Cow;
use tracing::debug;

pub const ESCAPED_CDATA_OPEN: &str = "&lt;![CDATA[";
pub const ESCAPED_CDATA_CLOSE: &str = "]]&gt;";
/// Closing marker with the trailing semicolon missing, also seen in the wild.
pub const TRUNCATED_CDATA_CLOSE: &str = "]]&gt";

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Repair an optional response body. `None` passes through.
pub fn repair(body: Option<String>) -> Option<String> {
    body.map(|b| match repair_str(&b) {
        Cow::Borrowed(_) => b,
        Cow::Owned(fixed) => fixed,
    })
}

/// Repair a body, borrowing when nothing needs to change.
pub fn repair_str(body: &str) -> Cow<'_, str> {
    if !body.contains(ESCAPED_CDATA_OPEN) {
        return Cow::Borrowed(body);
    }
    debug!("repairing double-escaped CDATA delimiters in response body");
    // Full closing marker first so the truncated pattern never leaves a stray ';'.
    let fixed = body
        .replace(ESCAPED_CDATA_OPEN, CDATA_OPEN)
        .replace(ESCAPED_CDATA_CLOSE, CDATA_CLOSE)
        .replace(TRUNCATED_CDATA_CLOSE, CDATA_CLOSE);
    Cow::Owned(fixed)
}
