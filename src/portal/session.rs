//! Portal session and authentication.
//!
//! A [`Session`] binds one host and one credential set for the lifetime
//! of one invocation. It starts unauthenticated; [`Session::validate`]
//! performs the login round trip and flips the flag. Every remote
//! operation checks the flag first and refuses to touch the network on
//! an unvalidated session. Sessions are not designed for concurrent use.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PortalCredentials;
use crate::errors::{PortalError, PortalResult};
use crate::portal::outcome::{CommandOutcome, PortalReply};

/// Per-request timeout for portal calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An authenticated connection context to the portal.
#[derive(Debug)]
pub struct Session {
    host: String,
    username: String,
    password: String,
    insecure: bool,
    authenticated: bool,
    http: Client,
}

/// Login check payload for `/portal/v1/login`.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl Session {
    /// Construct an unauthenticated session.
    ///
    /// Builds the HTTP client (TLS via rustls; invalid certificates are
    /// accepted only when `insecure` is set) but performs no network I/O.
    /// The only failure mode is a client-builder error.
    pub fn open(credentials: PortalCredentials) -> PortalResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(credentials.insecure)
            .build()
            .map_err(|e| PortalError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            host: credentials.hostname,
            username: credentials.username,
            password: credentials.password,
            insecure: credentials.insecure,
            authenticated: false,
            http,
        })
    }

    /// Perform the login check against the portal.
    ///
    /// On an accepted login sets `authenticated` and returns `true`. Bad
    /// credentials, certificate rejection, and network failures all
    /// return `false` and leave the session unauthenticated; the cause is
    /// logged, never raised. Callers must not invoke any operation after
    /// a `false` return.
    pub async fn validate(&mut self) -> bool {
        let payload = LoginRequest {
            username: &self.username,
            password: &self.password,
        };

        let resp = match self
            .http
            .post(self.endpoint("login"))
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(host = %self.host, error = %e, "portal unreachable during login");
                return false;
            }
        };

        if !resp.status().is_success() {
            warn!(host = %self.host, status = %resp.status(), "portal rejected login");
            return false;
        }

        match resp.json::<PortalReply>().await {
            Ok(reply) if reply.successful => {
                info!(host = %self.host, user = %self.username, "portal session validated");
                self.authenticated = true;
                true
            }
            Ok(reply) => {
                warn!(
                    host = %self.host,
                    message = reply.message.as_deref().unwrap_or("no diagnostic"),
                    "portal declined credentials"
                );
                false
            }
            Err(e) => {
                warn!(host = %self.host, error = %e, "unparseable login response");
                false
            }
        }
    }

    /// Whether `validate` has succeeded on this session.
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// The portal host this session is bound to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether invalid TLS certificates are accepted.
    pub fn insecure(&self) -> bool {
        self.insecure
    }

    /// Guard used by every operation: authentication error before any
    /// network call when the session never validated.
    pub(crate) fn require_auth(&self) -> PortalResult<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(PortalError::Authentication(format!(
                "session for {} is not validated",
                self.host
            )))
        }
    }

    /// Full URL for a portal operation.
    ///
    /// A bare host gets the `https://` scheme; a host that already
    /// carries one is used as-is (plain-HTTP deployments, in-process
    /// test servers).
    pub(crate) fn endpoint(&self, op: &str) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}/portal/v1/{}", self.host, op)
        } else {
            format!("https://{}/portal/v1/{}", self.host, op)
        }
    }

    /// One POST round trip, folded into the uniform outcome.
    ///
    /// Transport faults and unparseable bodies come back as a failed
    /// [`CommandOutcome`]; nothing escapes as an error.
    pub(crate) async fn post_operation<B: Serialize>(
        &self,
        op: &str,
        body: &B,
    ) -> CommandOutcome {
        debug!(host = %self.host, op, "portal request");

        let resp = match self
            .http
            .post(self.endpoint(op))
            .basic_auth(&self.username, Some(&self.password))
            .json(body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(host = %self.host, op, error = %e, "portal request failed");
                return CommandOutcome::fault(format!("portal unreachable: {e}"));
            }
        };

        let status = resp.status();
        match resp.json::<PortalReply>().await {
            Ok(reply) => reply.into(),
            Err(e) if status.is_success() => {
                CommandOutcome::fault(format!("unparseable portal response: {e}"))
            }
            Err(_) => CommandOutcome::fault(format!("portal returned HTTP {status}")),
        }
    }
}
