//! keyport binary: argument parsing, session setup, dispatch, rendering,
//! and exit-code mapping.
//!
//! Exit codes: 0 success, 1 command-level failure, 2 invalid arguments or
//! configuration, 3 authentication failure. Authentication stays
//! distinguishable from an individual command failing.

mod cli;
mod render;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use keyport::config::PortalConfig;
use keyport::errors::{PortalError, PortalResult};
use keyport::portal::{Criteria, Session};

use cli::{require_key, require_non_empty, Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "keyport=debug"
    } else {
        "keyport=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e @ (PortalError::Validation(_) | PortalError::Config(_))) => {
            eprintln!("keyport: {e}");
            ExitCode::from(2)
        }
        Err(e @ PortalError::Authentication(_)) => {
            eprintln!("keyport: {e}");
            ExitCode::from(3)
        }
        Err(e) => {
            eprintln!("keyport: {e}");
            ExitCode::from(1)
        }
    }
}

/// Run one command. `Ok(false)` is a command-level failure already
/// reported to the user.
async fn run(cli: Cli) -> PortalResult<bool> {
    validate_arguments(&cli.command)?;

    let config = PortalConfig::load(cli.config.as_deref())?;
    let credentials = config.resolve(&cli.overrides())?;
    let host = credentials.hostname.clone();

    let mut session = Session::open(credentials)?;
    if !session.validate().await {
        return Err(PortalError::Authentication(format!(
            "portal login failed for {host}"
        )));
    }

    match cli.command {
        Command::Lookup {
            ips,
            macs,
            active_only,
        } => {
            let criteria = Criteria::from_raw(&ips, &macs);
            debug!(ips = criteria.ips().len(), macs = criteria.macs().len(), "criteria built");
            let records = session.lookup(&criteria, active_only).await?;
            render::key_records(&records);
            Ok(true)
        }
        Command::Metadata { key } => {
            let outcome = session.metadata(&key).await?;
            match outcome.metadata() {
                Some(meta) => {
                    render::metadata(&meta);
                    Ok(true)
                }
                None => {
                    eprintln!(
                        "No data for key {key}: {}",
                        outcome.message().unwrap_or("unknown key")
                    );
                    Ok(false)
                }
            }
        }
        Command::Retrieve {
            key,
            compatible,
            output,
        } => {
            let outcome = session.retrieve(&key, compatible).await?;
            match outcome.key_material() {
                Some(material) => {
                    let path = output.unwrap_or_else(|| format!("{}.lic", material.key_number));
                    // Key material is opaque; write it back byte for byte.
                    fs::write(&path, material.key_data.as_bytes())?;
                    println!("Wrote key {} to {path}", material.key_number);
                    Ok(true)
                }
                None => {
                    eprintln!(
                        "Retrieve failed for {key}: {}",
                        outcome.message().unwrap_or("no key material returned")
                    );
                    Ok(false)
                }
            }
        }
        Command::Renew { key } => {
            let outcome = session.renew(&key).await?;
            render::outcome(&format!("Renew {key}"), &outcome);
            Ok(outcome.successful())
        }
        Command::Annotate { key, message } => {
            let outcome = session.annotate(&key, &message).await?;
            render::outcome(&format!("Annotate {key}"), &outcome);
            Ok(outcome.successful())
        }
        Command::Email { key, to, compress } => {
            let outcome = session.send_by_email(&key, &to, compress).await?;
            render::outcome(&format!("Email {key} to {to}"), &outcome);
            Ok(outcome.successful())
        }
        Command::Usage { key } => {
            let outcome = session.usage(&key).await?;
            // A fault never reached the portal, so neither arm of the
            // inverted contract applies to it.
            if outcome.is_client_fault() {
                eprintln!(
                    "Usage query for {key} failed: {}",
                    outcome.message().unwrap_or("unknown error")
                );
                return Ok(false);
            }
            // Inverted contract: both flag states are renderable answers.
            render::usage(&key, &outcome);
            Ok(true)
        }
    }
}

/// Caller-side scalar validation, before any session or network work.
fn validate_arguments(command: &Command) -> PortalResult<()> {
    match command {
        Command::Lookup { ips, macs, .. } => {
            let criteria = Criteria::from_raw(ips, macs);
            if criteria.is_empty() {
                return Err(PortalError::Validation(
                    "no well-formed IP or MAC criteria given".into(),
                ));
            }
        }
        Command::Metadata { key } | Command::Renew { key } | Command::Usage { key } => {
            require_key(key)?;
        }
        Command::Retrieve { key, .. } => require_key(key)?,
        Command::Annotate { key, message } => {
            require_key(key)?;
            require_non_empty(message, "message")?;
        }
        Command::Email { key, to, .. } => {
            require_key(key)?;
            require_non_empty(to, "recipient")?;
        }
    }
    Ok(())
}
