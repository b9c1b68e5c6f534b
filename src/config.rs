//! Configuration for keyport.
//!
//! Configuration is loaded from multiple sources with the following
//! precedence (later sources override earlier ones):
//! 1. Default values
//! 2. `keyport.toml` file (optional)
//! 3. `KEYPORT_*` environment variables
//! 4. Explicit command-line overrides
//!
//! The file holds one credential block per operating mode:
//!
//! ```toml
//! mode = "production"
//!
//! [portal.production]
//! hostname = "portal.example.com"
//! username = "svc-licenses"
//! password = "..."
//!
//! [portal.staging]
//! hostname = "portal-staging.example.com"
//! username = "svc-licenses"
//! password = "..."
//! insecure = true
//! ```
//!
//! # Environment Variables
//!
//! - `KEYPORT_MODE` - which credential block to use
//! - `KEYPORT_HOSTNAME` - portal hostname
//! - `KEYPORT_USERNAME` - portal account name
//! - `KEYPORT_PASSWORD` - portal account password
//! - `KEYPORT_INSECURE` - accept invalid TLS certificates (true/false)

use std::collections::HashMap;
use std::env;

use config::Config;
use serde::Deserialize;

use crate::errors::{PortalError, PortalResult};

/// Default operating mode when neither file nor environment names one.
const DEFAULT_MODE: &str = "production";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Which credential block under `[portal.*]` to use.
    pub mode: String,
    /// Credential blocks keyed by mode name.
    pub portal: HashMap<String, CredentialBlock>,
}

/// One mode's credential block. All fields optional; completeness is
/// checked only after overrides are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialBlock {
    /// Portal hostname (no scheme).
    pub hostname: Option<String>,
    /// Portal account name.
    pub username: Option<String>,
    /// Portal account password.
    pub password: Option<String>,
    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,
}

/// Explicit per-field overrides from the argument source. Highest
/// precedence; a `None` field leaves the underlying value alone.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub mode: Option<String>,
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: Option<bool>,
}

/// The fully resolved credential tuple consumed by `Session::open`.
#[derive(Debug, Clone)]
pub struct PortalCredentials {
    pub hostname: String,
    pub username: String,
    pub password: String,
    pub insecure: bool,
}

impl PortalConfig {
    /// Load configuration from file and environment.
    ///
    /// `path` names an explicit config file; when `None`, `keyport.toml`
    /// in the working directory is tried and its absence is not an error.
    pub fn load(path: Option<&str>) -> PortalResult<Self> {
        let file = match path {
            Some(p) => config::File::with_name(p).required(true),
            None => config::File::with_name("keyport").required(false),
        };

        let settings = Config::builder()
            .set_default("mode", DEFAULT_MODE)
            .map_err(|e| PortalError::Config(e.to_string()))?
            .add_source(file)
            .set_override_option("mode", env::var("KEYPORT_MODE").ok())
            .map_err(|e| PortalError::Config(e.to_string()))?
            .build()
            .map_err(|e| PortalError::Config(format!("failed to load config: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| PortalError::Config(format!("failed to deserialize config: {e}")))
    }

    /// Resolve the effective credential tuple.
    ///
    /// Selects the block named by the effective mode (override beats file
    /// and environment), then layers `KEYPORT_*` variables and finally the
    /// explicit overrides on top, field by field. Fails with
    /// `PortalError::Config` when hostname, username, or password is still
    /// missing after all sources are applied.
    pub fn resolve(&self, overrides: &CredentialOverrides) -> PortalResult<PortalCredentials> {
        let mode = overrides.mode.as_deref().unwrap_or(&self.mode);
        let block = self.portal.get(mode).cloned().unwrap_or_default();

        let hostname = overrides
            .hostname
            .clone()
            .or_else(|| env::var("KEYPORT_HOSTNAME").ok())
            .or(block.hostname);
        let username = overrides
            .username
            .clone()
            .or_else(|| env::var("KEYPORT_USERNAME").ok())
            .or(block.username);
        let password = overrides
            .password
            .clone()
            .or_else(|| env::var("KEYPORT_PASSWORD").ok())
            .or(block.password);
        let insecure = overrides
            .insecure
            .or_else(|| {
                env::var("KEYPORT_INSECURE")
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok())
            })
            .or(block.insecure)
            .unwrap_or(false);

        let hostname = require(hostname, mode, "hostname")?;
        let username = require(username, mode, "username")?;
        let password = require(password, mode, "password")?;

        Ok(PortalCredentials {
            hostname,
            username,
            password,
            insecure,
        })
    }
}

fn require(value: Option<String>, mode: &str, field: &str) -> PortalResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PortalError::Config(format!(
            "no {field} configured for mode '{mode}' (set it in keyport.toml, \
             KEYPORT_{}, or on the command line)",
            field.to_uppercase()
        ))),
    }
}
