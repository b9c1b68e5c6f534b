//! Command-line definition and caller-side argument validation.
//!
//! Scalar validation happens here, before a session is ever opened: the
//! executor assumes well-formed key numbers and message text and only
//! validates the structured criteria itself.

use clap::{Parser, Subcommand};

use keyport::config::CredentialOverrides;
use keyport::errors::{PortalError, PortalResult};

/// Command-line client for the license-administration portal.
#[derive(Debug, Parser)]
#[command(name = "keyport", version, about)]
pub struct Cli {
    /// Config file path (default: keyport.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Credential block to use (overrides the config file's mode)
    #[arg(long, global = true)]
    pub mode: Option<String>,

    /// Portal hostname (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Portal account name (overrides config)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Portal account password (overrides config)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up keys by IP and/or MAC address
    Lookup {
        /// Comma-separated IPv4 addresses
        #[arg(long, default_value = "")]
        ips: String,
        /// Comma-separated MAC addresses
        #[arg(long, default_value = "")]
        macs: String,
        /// Hide terminated keys
        #[arg(long)]
        active_only: bool,
    },
    /// Show full metadata for a key
    Metadata {
        /// Key number
        key: String,
    },
    /// Retrieve key material and write it to a file
    Retrieve {
        /// Key number
        key: String,
        /// Request a key compatible with the prior minor product version
        #[arg(long)]
        compatible: bool,
        /// Output path (default: <key>.lic)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Extend a key's validity
    Renew {
        /// Key number
        key: String,
    },
    /// Attach a free-text note to a key
    Annotate {
        /// Key number
        key: String,
        /// Note text
        #[arg(short, long)]
        message: String,
    },
    /// Have the portal e-mail key material to a recipient
    Email {
        /// Key number
        key: String,
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Send the material as a compressed attachment
        #[arg(long)]
        compress: bool,
    },
    /// Report usage for a key
    Usage {
        /// Key number
        key: String,
    },
}

impl Cli {
    /// Explicit credential overrides from the command line.
    pub fn overrides(&self) -> CredentialOverrides {
        CredentialOverrides {
            mode: self.mode.clone(),
            hostname: self.host.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
            // A flag can only assert, never unset.
            insecure: self.insecure.then_some(true),
        }
    }
}

/// Reject an empty or whitespace-only key number.
pub fn require_key(key: &str) -> PortalResult<()> {
    if key.trim().is_empty() {
        Err(PortalError::Validation("key number must not be empty".into()))
    } else {
        Ok(())
    }
}

/// Reject an empty or whitespace-only scalar argument.
pub fn require_non_empty(value: &str, what: &str) -> PortalResult<()> {
    if value.trim().is_empty() {
        Err(PortalError::Validation(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_key_rejects_blank_input() {
        assert!(require_key("K-100").is_ok());
        assert!(require_key("").is_err());
        assert!(require_key("   ").is_err());
    }

    #[test]
    fn require_non_empty_names_the_argument() {
        let err = require_non_empty("", "message").unwrap_err();
        assert!(err.to_string().contains("message"));
        assert!(matches!(err, PortalError::Validation(_)));
    }

    #[test]
    fn insecure_flag_only_asserts() {
        let cli = Cli::parse_from(["keyport", "renew", "K-1"]);
        assert_eq!(cli.overrides().insecure, None);

        let cli = Cli::parse_from(["keyport", "--insecure", "renew", "K-1"]);
        assert_eq!(cli.overrides().insecure, Some(true));
    }

    #[test]
    fn lookup_arguments_parse() {
        let cli = Cli::parse_from([
            "keyport",
            "lookup",
            "--ips",
            "10.0.0.1,10.0.0.2",
            "--active-only",
        ]);
        match cli.command {
            Command::Lookup {
                ips,
                macs,
                active_only,
            } => {
                assert_eq!(ips, "10.0.0.1,10.0.0.2");
                assert!(macs.is_empty());
                assert!(active_only);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
