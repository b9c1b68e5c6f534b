//! Error types for the keyport portal client.
//!
//! The split matters for exit-code mapping: `Authentication` is fatal for
//! the whole invocation and must stay distinguishable from an individual
//! command failing, which travels inside a [`CommandOutcome`] instead of
//! through this enum.
//!
//! [`CommandOutcome`]: crate::portal::outcome::CommandOutcome

use thiserror::Error;

/// Errors surfaced by the portal client core.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Configuration could not be loaded, or the resolved credential set
    /// is incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// A caller-supplied scalar argument is malformed or missing. Detected
    /// before any remote call is attempted.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Session validation failed, or an operation was invoked on a session
    /// that never validated. Halts all further command execution.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A remote fault on an operation whose return type carries no
    /// failure flag of its own (e.g. a typed record sequence).
    #[error("portal request failed: {0}")]
    Remote(String),

    /// Writing retrieved key material to local storage failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used across the portal client.
pub type PortalResult<T> = Result<T, PortalError>;
