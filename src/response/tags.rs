//! Result-tag lookup.
//!
//! The response body is nested under an element named after the called method, except
//! for a few methods where the server uses a different name. These are fixed exceptions,
//! not a renaming rule, so they live in a table.

/// `(request method, response tag)` for every known divergence.
pub const RESULT_TAG_EXCEPTIONS: &[(&str, &str)] = &[
    ("Member.Messages.GetInbox", "Members.Messages.Get.Inbox"),
    ("Member.Messages.GetSent", "Members.Messages.Get.Sent"),
    ("Member.Messages.Message.Read", "Members.Messages.Message.Read"),
];

/// The element name holding `method`'s result.
pub fn result_tag(method: &str) -> &str {
    for (request, tag) in RESULT_TAG_EXCEPTIONS {
        if *request == method {
            return *tag;
        }
    }
    method
}
