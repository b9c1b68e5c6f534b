//! keyport - a command-line client for a remote license-administration
//! portal.
//!
//! The library half holds the portal client abstraction: an
//! authenticated [`Session`](portal::Session), validated lookup
//! [`Criteria`](portal::Criteria), the typed remote operations, and the
//! uniform [`CommandOutcome`](portal::CommandOutcome) result model. The
//! binary half (argument parsing, rendering, exit codes) lives in
//! `main.rs` and its support modules.
//!
//! # Example
//!
//! ```rust,no_run
//! use keyport::config::PortalCredentials;
//! use keyport::portal::{Criteria, Session};
//!
//! # async fn run() -> keyport::errors::PortalResult<()> {
//! let mut session = Session::open(PortalCredentials {
//!     hostname: "portal.example.com".into(),
//!     username: "svc-licenses".into(),
//!     password: "secret".into(),
//!     insecure: false,
//! })?;
//!
//! if !session.validate().await {
//!     // Fatal: no operation may be attempted on this session.
//!     return Ok(());
//! }
//!
//! let criteria = Criteria::from_raw("10.0.0.1, 10.0.0.2", "");
//! for key in session.lookup(&criteria, true).await? {
//!     println!("{} ({})", key.key_number, key.key_type.as_deref().unwrap_or("?"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod portal;
