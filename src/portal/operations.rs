//! Remote operations on license keys.
//!
//! Every operation requires a validated [`Session`] and performs exactly
//! one round trip. The unauthenticated guard is the only error path;
//! transport and service-side faults come back inside a failed
//! [`CommandOutcome`]. Scalar arguments (key numbers, message text,
//! recipients) are assumed well-formed; the caller validates them
//! before invoking anything here. Only the structured [`Criteria`] type
//! is validated by this layer.

use serde::Serialize;

use crate::errors::{PortalError, PortalResult};
use crate::portal::criteria::Criteria;
use crate::portal::outcome::CommandOutcome;
use crate::portal::records::KeyRecord;
use crate::portal::session::Session;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    ips: &'a [String],
    macs: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyRequest<'a> {
    key_number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveRequest<'a> {
    key_number: &'a str,
    compatible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateRequest<'a> {
    key_number: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailRequest<'a> {
    key_number: &'a str,
    recipient: &'a str,
    compress: bool,
}

impl Session {
    /// Look up keys by IP/MAC criteria.
    ///
    /// With `active_only`, records marked terminated are filtered out
    /// locally after the response arrives; the query itself is not
    /// narrowed. A remote fault surfaces as `PortalError::Remote` since
    /// the typed sequence carries no failure flag of its own.
    pub async fn lookup(
        &self,
        criteria: &Criteria,
        active_only: bool,
    ) -> PortalResult<Vec<KeyRecord>> {
        self.require_auth()?;

        let request = LookupRequest {
            ips: criteria.ips(),
            macs: criteria.macs(),
        };
        let outcome = self.post_operation("keys/lookup", &request).await;
        if !outcome.successful() {
            return Err(PortalError::Remote(
                outcome.message().unwrap_or("lookup failed").to_string(),
            ));
        }

        Ok(filter_active(outcome.key_records(), active_only))
    }

    /// Fetch full metadata for a key. `successful` is false when the key
    /// number is unknown or carries no data; no metadata is populated in
    /// that case.
    pub async fn metadata(&self, key_number: &str) -> PortalResult<CommandOutcome> {
        self.require_auth()?;
        Ok(self
            .post_operation("keys/metadata", &KeyRequest { key_number })
            .await)
    }

    /// Retrieve key material. With `compatible`, the portal issues a key
    /// usable with the prior minor product version. The material in
    /// `keyData` is opaque and is written out verbatim by the caller.
    pub async fn retrieve(&self, key_number: &str, compatible: bool) -> PortalResult<CommandOutcome> {
        self.require_auth()?;
        Ok(self
            .post_operation(
                "keys/retrieve",
                &RetrieveRequest {
                    key_number,
                    compatible,
                },
            )
            .await)
    }

    /// Extend a key's validity by the fixed period its type allows.
    ///
    /// Not idempotent: the portal may extend further on each call or
    /// reject a repeat; no deduplication happens on this side.
    pub async fn renew(&self, key_number: &str) -> PortalResult<CommandOutcome> {
        self.require_auth()?;
        Ok(self
            .post_operation("keys/renew", &KeyRequest { key_number })
            .await)
    }

    /// Attach a free-text note to a key. A non-empty message is the
    /// caller's responsibility.
    pub async fn annotate(&self, key_number: &str, message: &str) -> PortalResult<CommandOutcome> {
        self.require_auth()?;
        Ok(self
            .post_operation(
                "keys/annotate",
                &AnnotateRequest {
                    key_number,
                    message,
                },
            )
            .await)
    }

    /// Ask the portal to e-mail key material to a recipient. The outcome
    /// is successful only if the dispatch request was accepted.
    pub async fn send_by_email(
        &self,
        key_number: &str,
        recipient: &str,
        compress: bool,
    ) -> PortalResult<CommandOutcome> {
        self.require_auth()?;
        Ok(self
            .post_operation(
                "keys/email",
                &EmailRequest {
                    key_number,
                    recipient,
                    compress,
                },
            )
            .await)
    }

    /// Report usage for a key.
    ///
    /// The portal's contract inverts the success flag here: `successful`
    /// true means "no usage data has been reported yet", and the actual
    /// usage report travels on a `false` outcome. Passed through
    /// untouched; see [`CommandOutcome`].
    pub async fn usage(&self, key_number: &str) -> PortalResult<CommandOutcome> {
        self.require_auth()?;
        Ok(self
            .post_operation("keys/usage", &KeyRequest { key_number })
            .await)
    }
}

/// Local post-filter for lookup: the terminated flag is evaluated here,
/// not pushed into the query.
fn filter_active(mut records: Vec<KeyRecord>, active_only: bool) -> Vec<KeyRecord> {
    if active_only {
        records.retain(|r| !r.terminated);
    }
    records
}
