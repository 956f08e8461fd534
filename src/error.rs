use crate::error_code::ApiErrorCode;
use crate::transport::TransportError;
use crate::xml::XmlError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "baseUri", "Session.Create/SessionID")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config", "profile")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the SDK.
///
/// Two tiers matter to callers: [`Error::Communication`] (the HTTP exchange itself failed)
/// and [`Error::Api`] (the envelope parsed but carried a non-zero status code). The rest
/// are local failures: bad XML, unexpected response shapes, bad configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Connection to YourMembership API failed: {0}")]
    Communication(#[from] TransportError),

    #[error("YourMembership returned error code {code} with message: {}", .description.as_deref().unwrap_or(""))]
    Api {
        code: String,
        description: Option<String>,
    },

    #[error("Response path not found: {path}")]
    MissingPath { path: String },

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    #[error("Session {session_id} has been abandoned and cannot issue further calls")]
    SessionAbandoned { session_id: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Domain failure carrying the server's code and description verbatim.
    pub fn api(code: impl Into<String>, description: Option<String>) -> Self {
        Error::Api {
            code: code.into(),
            description,
        }
    }

    pub fn missing_path(path: impl Into<String>) -> Self {
        Error::MissingPath { path: path.into() }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// The raw status code of a domain failure.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Api { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// The server's description of a domain failure.
    pub fn description(&self) -> Option<&str> {
        match self {
            Error::Api { description, .. } => description.as_deref(),
            _ => None,
        }
    }

    /// Classified status code, when the code is one the SDK knows.
    pub fn api_code(&self) -> Option<ApiErrorCode> {
        self.code().and_then(ApiErrorCode::from_code)
    }

    pub fn is_communication(&self) -> bool {
        matches!(self, Error::Communication(_))
    }

    /// "Not authorized": the session expired or the method requires authentication.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self.api_code(),
            Some(ApiErrorCode::SessionExpired | ApiErrorCode::AuthenticationRequired)
        )
    }

    /// "Not found / ambiguous".
    pub fn is_not_found(&self) -> bool {
        matches!(self.api_code(), Some(ApiErrorCode::NotUnique))
    }
}
