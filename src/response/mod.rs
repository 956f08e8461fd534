//! Inbound side: the parsed envelope, result-tag lookup and shape normalization.

pub mod envelope;
pub mod normalize;
pub mod tags;

pub use envelope::{ResponseEnvelope, RESPONSE_ROOT};
pub use normalize::{scalar_text, to_list, to_scalar_list, to_string_list};
pub use tags::{result_tag, RESULT_TAG_EXCEPTIONS};
