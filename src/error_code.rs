//! YourMembership API status codes.
//!
//! Every response envelope carries an `ErrCode`. `"0"` is success; everything else is a
//! domain failure. Only a handful of codes carry meaning the SDK acts on, so this module
//! classifies them into categories callers can branch on without memorising numbers.
//!
//! | Code | Variant                   | Category        |
//! |------|---------------------------|-----------------|
//! | 202  | `SessionExpired`          | session         |
//! | 403  | `AuthenticationRequired`  | authorization   |
//! | 406  | `NotUnique`               | not_found       |
//!
//! ## Example
//!
//! ```rust
//! use ym_lib_rust::error_code::ApiErrorCode;
//!
//! let code = ApiErrorCode::from_code("403").unwrap();
//! assert_eq!(code.category(), "authorization");
//! assert!(code.recoverable_in_probe());
//! assert!(ApiErrorCode::from_code("999").is_none());
//! ```

use std::fmt;

/// Status code reported for a successful call.
pub const SUCCESS_CODE: &str = "0";

/// Known non-zero status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// 202: the API session has expired or does not exist
    SessionExpired,
    /// 403: the method requires an authenticated session
    AuthenticationRequired,
    /// 406: no single record could be identified from the supplied criteria
    NotUnique,
}

impl ApiErrorCode {
    /// Returns the wire code string (e.g. `"403"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionExpired => "202",
            Self::AuthenticationRequired => "403",
            Self::NotUnique => "406",
        }
    }

    /// Returns the category: `"session"`, `"authorization"` or `"not_found"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::SessionExpired => "session",
            Self::AuthenticationRequired => "authorization",
            Self::NotUnique => "not_found",
        }
    }

    /// Whether the authentication probe treats this code as "no bound identity"
    /// instead of an error.
    #[inline]
    pub fn recoverable_in_probe(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::AuthenticationRequired)
    }

    /// Maps a wire code to a known variant. Unknown codes (and `"0"`) return `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "202" => Some(Self::SessionExpired),
            "403" => Some(Self::AuthenticationRequired),
            "406" => Some(Self::NotUnique),
            _ => None,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.category())
    }
}
