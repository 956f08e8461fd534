//! XML plumbing shared by the request and response sides.
//!
//! - [`cdata`]: pre-parse repair of the server's double-escaped CDATA delimiters
//! - [`reader`]: converts a response document into a `serde_json::Value` tree

pub mod cdata;
pub mod reader;

pub use cdata::repair;
pub use reader::{parse_document, CONTENT_KEY};

/// XML codec errors
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("Malformed XML at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("Empty XML document")]
    EmptyDocument,

    #[error("Unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("Malformed response envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Failed to write XML: {0}")]
    Write(String),
}
