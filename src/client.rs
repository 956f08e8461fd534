//! Client for the YourMembership API.
//!
//! [`YmClient`] ties configuration, transport and the generic call counter together.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod validation;

pub use builder::YmClientBuilder;
pub use core::YmClient;
