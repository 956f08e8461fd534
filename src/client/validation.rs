//! Response classification.
//!
//! Two tiers: a failed exchange is a communication error and is never recovered here; a
//! parsed envelope with a non-zero `ErrCode` is an API error carrying the server's code
//! and description verbatim. Callers that treat some codes as recoverable inspect the
//! envelope before calling [`validate_envelope`].

use crate::response::ResponseEnvelope;
use crate::transport::{TransportError, TransportResponse};
use crate::xml::{self, XmlError};
use crate::{Error, Result};
use tracing::warn;

/// Fail with [`Error::Communication`] unless the exchange returned a 2xx status.
pub fn check_transport(response: &TransportResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "YourMembership API returned HTTP error status");
    Err(Error::Communication(TransportError::Status {
        status: response.status,
        body: response.body.clone(),
    }))
}

/// Transport check, CDATA repair and parse. The status code is not inspected.
pub fn decode(response: TransportResponse) -> Result<ResponseEnvelope> {
    check_transport(&response)?;
    let body = xml::repair(response.body).ok_or(XmlError::EmptyDocument)?;
    Ok(ResponseEnvelope::parse(&body)?)
}

/// Fail with [`Error::Api`] unless the envelope reports success.
pub fn validate_envelope(method: &str, envelope: &ResponseEnvelope) -> Result<()> {
    if envelope.is_success() {
        return Ok(());
    }
    warn!(
        method,
        code = %envelope.err_code,
        description = envelope.err_desc.as_deref().unwrap_or(""),
        "YourMembership API reported an error"
    );
    Err(Error::api(
        envelope.err_code.clone(),
        envelope.err_desc.clone(),
    ))
}

/// Full classification of one exchange.
pub fn validate(method: &str, response: TransportResponse) -> Result<ResponseEnvelope> {
    let envelope = decode(response)?;
    validate_envelope(method, &envelope)?;
    Ok(envelope)
}
