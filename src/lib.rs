//! # ym-lib-rust
//!
//! Client SDK for the YourMembership XML API.
//!
//! ## Overview
//!
//! The service exposes one HTTP endpoint. Every call POSTs an XML request document
//! (`<YourMembership>`) and receives an XML response document
//! (`<YourMembership_Response>`) carrying a status code and a result element named after
//! the called method. This crate implements that wire contract:
//!
//! - **Request documents**: credentials chosen by method prefix, session and call id,
//!   and a typed parameter tree ([`request`])
//! - **Responses**: repair of double-escaped CDATA, parsing into a `serde_json::Value`
//!   tree, and normalization of the API's nothing/one/many result shapes ([`response`])
//! - **Sessions**: creation, authentication, keep-alive and abandonment, with a
//!   per-session call counter ([`session`])
//! - **Profiles**: core fields and community-defined custom fields ([`profile`])
//! - **Errors**: transport failures vs. server error codes ([`Error`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ym_lib_rust::{Config, Member, Params, YmClient};
//!
//! #[tokio::main]
//! async fn main() -> ym_lib_rust::Result<()> {
//!     let config = Config::from_yaml_file("ym.yaml")?;
//!     let client = Arc::new(YmClient::new(config)?);
//!
//!     let member = Member::create_by_authentication(client.clone(), "jdoe", "secret").await?;
//!     let inbox = member.messages_get_inbox(&Params::new()).await?;
//!     println!("{} has {} messages", member.full_name(), inbox.len());
//!
//!     let ids = client.admin().members_all_get_ids(&Params::new()).await?;
//!     println!("{} members", ids.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder and response classification |
//! | [`request`] | Request documents, parameters and call ids |
//! | [`response`] | Response envelopes and result normalization |
//! | [`session`] | Session lifecycle |
//! | [`profile`] | Person records |
//! | [`member`], [`people`], [`admin`] | Endpoint façades |
//! | [`transport`] | Transport trait and the HTTP implementation |

pub mod admin;
pub mod client;
pub mod config;
pub mod error;
pub mod error_code;
pub mod member;
pub mod people;
pub mod profile;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;
pub mod xml;

pub use admin::{auth_authenticate, Admin, Authentication};
pub use client::{YmClient, YmClientBuilder};
pub use config::Config;
pub use error::{Error, ErrorContext};
pub use error_code::ApiErrorCode;
pub use member::{Member, OrderStatus, SessionBindError};
pub use people::Community;
pub use profile::{CustomValue, Profile};
pub use request::{CallCounter, Identity, ParamValue, Params};
pub use response::ResponseEnvelope;
pub use session::{Session, SessionState};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;
