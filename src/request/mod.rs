//! Outbound side: parameter values, call id counters and the envelope builder.

pub mod builder;
pub mod call_id;
pub mod value;

pub use builder::{is_admin_method, Identity, RequestBuilder, ADMIN_METHOD_PREFIX};
pub use call_id::{CallCounter, GENERIC_CALL_ID_SEED, SESSION_CALL_ID_SEED};
pub use value::{format_temporal, ParamValue, Params};
