//! Client configuration.
//!
//! Supplied directly, from a YAML file, or from the environment:
//!
//! ```yaml
//! ---
//! publicKey: 45G2E6DC-98NA-45W7-8493-D97C4E2C156A
//! privateKey: D74H44B2-2348-4ACT-B531-45W385TGB966
//! saPasscode: WPIkriJtqS4m
//! baseUri: 'https://api.yourmembership.com'
//! version: '2.00'
//! ```
//!
//! `baseUri` and `version` default to the current production API.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use url::Url;

pub const DEFAULT_BASE_URI: &str = "https://api.yourmembership.com";
pub const DEFAULT_API_VERSION: &str = "2.00";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub public_key: String,
    pub private_key: String,
    pub sa_passcode: String,
    pub base_uri: String,
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            private_key: String::new(),
            sa_passcode: String::new(),
            base_uri: DEFAULT_BASE_URI.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

// Keys never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &str| if s.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Config")
            .field("public_key", &self.public_key)
            .field("private_key", &redact(&self.private_key))
            .field("sa_passcode", &redact(&self.sa_passcode))
            .field("base_uri", &self.base_uri)
            .field("version", &self.version)
            .finish()
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&raw)
    }

    /// Defaults overridden by `YM_PUBLIC_KEY`, `YM_PRIVATE_KEY`, `YM_SA_PASSCODE`,
    /// `YM_BASE_URI` and `YM_API_VERSION`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let apply = |name: &str, slot: &mut String| {
            if let Some(value) = lookup(name) {
                *slot = value;
            }
        };
        apply("YM_PUBLIC_KEY", &mut config.public_key);
        apply("YM_PRIVATE_KEY", &mut config.private_key);
        apply("YM_SA_PASSCODE", &mut config.sa_passcode);
        apply("YM_BASE_URI", &mut config.base_uri);
        apply("YM_API_VERSION", &mut config.version);
        config
    }

    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = key.into();
        self
    }

    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = key.into();
        self
    }

    pub fn with_sa_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.sa_passcode = passcode.into();
        self
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The URL every request is POSTed to: `base_uri` with a trailing `/`.
    pub fn endpoint(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_uri).map_err(|e| {
            Error::configuration_with_context(
                "invalid base URI",
                ErrorContext::new()
                    .with_field_path("baseUri")
                    .with_details(e.to_string())
                    .with_source("config"),
            )
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::configuration_with_context(
                "cannot derive API endpoint",
                ErrorContext::new()
                    .with_field_path("baseUri")
                    .with_details(format!("{} cannot carry a path", self.base_uri))
                    .with_source("config"),
            ));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoint()?;
        if self.version.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "API version must not be empty",
                ErrorContext::new()
                    .with_field_path("version")
                    .with_source("config"),
            ));
        }
        Ok(())
    }
}
