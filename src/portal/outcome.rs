//! The uniform result model for portal operations.
//!
//! Every remote operation returns a [`CommandOutcome`]: the portal's
//! heterogeneous responses are normalized into one success flag, an
//! optional code and message, and a structured payload tree with
//! null-safe accessors. Absent fields read as `None`, never a panic.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

/// Wire envelope every portal endpoint answers with.
///
/// ```json
/// {
///   "successful": true,
///   "code": "RENEWED",
///   "message": "Key extended until 2027-01-31",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub(crate) struct PortalReply {
    #[serde(default)]
    pub successful: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Code marking an outcome that never reached the portal. Set only by
/// [`CommandOutcome::fault`]; the portal itself does not use it.
pub const CLIENT_FAULT: &str = "CLIENT_FAULT";

/// Outcome of one portal operation. Immutable.
///
/// The `successful` flag is passed through from the service verbatim.
/// For the `usage` operation the service's contract inverts it:
/// `true` means "no usage data has been reported yet" and the actual
/// usage report travels on a `false` outcome. Consumers must not read
/// `successful` as "the call worked" for that operation.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    successful: bool,
    code: Option<String>,
    message: Option<String>,
    payload: Value,
}

impl CommandOutcome {
    /// Assemble an outcome directly. Embedders and tests build fixtures
    /// with this; operations themselves parse the wire envelope.
    pub fn new(
        successful: bool,
        code: Option<String>,
        message: Option<String>,
        payload: Value,
    ) -> Self {
        Self {
            successful,
            code,
            message,
            payload,
        }
    }

    /// Outcome for a client-side fault (transport failure, unparseable
    /// response): not successful, diagnostic message, empty payload.
    ///
    /// Tagged with [`CLIENT_FAULT`] so consumers can tell a failure to
    /// reach the portal apart from a genuine unsuccessful reply. The
    /// distinction matters most for `usage`, whose inverted contract
    /// carries the real report on an unsuccessful outcome.
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            successful: false,
            code: Some(CLIENT_FAULT.to_string()),
            message: Some(message.into()),
            payload: Value::Null,
        }
    }

    /// Whether the service reported the operation as successful.
    pub fn successful(&self) -> bool {
        self.successful
    }

    /// Service-supplied status code, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Whether this outcome is a client-side fault rather than a reply
    /// from the portal.
    pub fn is_client_fault(&self) -> bool {
        self.code.as_deref() == Some(CLIENT_FAULT)
    }

    /// Service-supplied diagnostic or informational message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The raw payload tree. `Value::Null` when the service sent none.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// A named field of the payload, or `None` if absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// A named string field of the payload.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// A named boolean field of the payload.
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::as_bool)
    }

    /// A named date-like field of the payload, parsed leniently.
    pub fn date_field(&self, name: &str) -> Option<PortalDate> {
        self.str_field(name).and_then(PortalDate::parse)
    }

    /// A named sequence field of the payload, in service order.
    pub fn seq_field(&self, name: &str) -> &[Value] {
        self.field(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Decode the payload into a typed record.
    ///
    /// Returns `None` when the payload is absent or does not have the
    /// expected shape; never panics.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

impl From<PortalReply> for CommandOutcome {
    fn from(reply: PortalReply) -> Self {
        Self {
            successful: reply.successful,
            code: reply.code,
            message: reply.message,
            payload: reply.data.unwrap_or(Value::Null),
        }
    }
}

/// A normalized portal timestamp.
///
/// The service is not consistent about date representations, so parsing
/// is lenient: RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
/// and bare dates are all accepted. Displays as a calendar string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PortalDate(NaiveDateTime);

impl PortalDate {
    /// Parse a raw service date. `None` when no known form matches.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.naive_utc()));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(Self(dt));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Some(Self(dt));
        }
        if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(Self(d.and_hms_opt(0, 0, 0)?));
        }
        None
    }

    /// Format as `YYYY-MM-DD`.
    pub fn calendar(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// The underlying timestamp.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for PortalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.calendar())
    }
}

/// Deserialize an `Option<PortalDate>` field leniently: absent, null, or
/// unparseable raw values all read as `None` instead of failing the
/// surrounding record.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<PortalDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(PortalDate::parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome_from_json(json: &str) -> CommandOutcome {
        let reply: PortalReply = serde_json::from_str(json).unwrap();
        reply.into()
    }

    #[test]
    fn parse_full_envelope() {
        let outcome = outcome_from_json(
            r#"{
                "successful": true,
                "code": "OK",
                "message": "done",
                "data": {"keyNumber": "K-100", "terminated": false}
            }"#,
        );

        assert!(outcome.successful());
        assert_eq!(outcome.code(), Some("OK"));
        assert_eq!(outcome.message(), Some("done"));
        assert_eq!(outcome.str_field("keyNumber"), Some("K-100"));
        assert_eq!(outcome.bool_field("terminated"), Some(false));
    }

    #[test]
    fn absent_fields_read_as_none() {
        let outcome = outcome_from_json(r#"{"successful": false}"#);

        assert!(!outcome.successful());
        assert_eq!(outcome.code(), None);
        assert_eq!(outcome.message(), None);
        assert_eq!(outcome.field("anything"), None);
        assert_eq!(outcome.str_field("anything"), None);
        assert_eq!(outcome.bool_field("anything"), None);
        assert_eq!(outcome.date_field("anything"), None);
        assert!(outcome.seq_field("anything").is_empty());
    }

    #[test]
    fn sequence_fields_preserve_service_order() {
        let outcome = outcome_from_json(
            r#"{
                "successful": true,
                "data": {"features": [
                    {"name": "Relay"},
                    {"name": "Analytics"},
                    {"name": "Backup"}
                ]}
            }"#,
        );

        let names: Vec<_> = outcome
            .seq_field("features")
            .iter()
            .filter_map(|f| f.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["Relay", "Analytics", "Backup"]);
    }

    #[test]
    fn fault_outcome_carries_diagnostic_and_fault_code() {
        let outcome = CommandOutcome::fault("connection refused");
        assert!(!outcome.successful());
        assert_eq!(outcome.message(), Some("connection refused"));
        assert_eq!(outcome.code(), Some(CLIENT_FAULT));
        assert!(outcome.is_client_fault());
        assert!(outcome.payload().is_null());
    }

    #[test]
    fn portal_replies_are_never_client_faults() {
        let unsuccessful = outcome_from_json(
            r#"{"successful": false, "code": "USAGE", "message": "usage recorded"}"#,
        );
        assert!(!unsuccessful.is_client_fault());

        let bare = outcome_from_json(r#"{"successful": false}"#);
        assert!(!bare.is_client_fault());
    }

    #[test]
    fn portal_date_accepts_known_forms() {
        for raw in [
            "2025-06-30T12:00:00Z",
            "2025-06-30T12:00:00+02:00",
            "2025-06-30 12:00:00",
            "2025-06-30T12:00:00",
            "2025-06-30",
        ] {
            let date = PortalDate::parse(raw).unwrap_or_else(|| panic!("failed on {raw}"));
            assert_eq!(date.calendar(), "2025-06-30");
        }
    }

    #[test]
    fn portal_date_rejects_unknown_forms() {
        assert_eq!(PortalDate::parse("30/06/2025"), None);
        assert_eq!(PortalDate::parse("yesterday"), None);
        assert_eq!(PortalDate::parse(""), None);
    }

    #[test]
    fn date_field_parses_off_payload() {
        let outcome = outcome_from_json(
            r#"{"successful": true, "data": {"expirationDate": "2026-01-31"}}"#,
        );
        assert_eq!(
            outcome.date_field("expirationDate").unwrap().to_string(),
            "2026-01-31"
        );
    }
}
