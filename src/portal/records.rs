//! Typed records decoded from portal payloads.
//!
//! Field names on the wire are camelCase; date fields parse leniently
//! and read as `None` when the service sends something unrecognizable.

use serde::Deserialize;

use crate::portal::outcome::{lenient_date, CommandOutcome, PortalDate};

/// One license key row from a lookup response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    pub key_number: String,
    #[serde(default)]
    pub key_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub create_date: Option<PortalDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_reporting_date: Option<PortalDate>,
    #[serde(default)]
    pub last_reporting_ip: Option<String>,
    #[serde(default)]
    pub terminated: bool,
}

/// Full metadata for one key, as returned by the metadata operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetadata {
    #[serde(flatten)]
    pub record: KeyRecord,
    #[serde(default)]
    pub product_key: Option<String>,
    #[serde(default)]
    pub billing_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub expiration_date: Option<PortalDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub update_date: Option<PortalDate>,
    #[serde(default)]
    pub problem: bool,
    /// Feature entitlements, in service order.
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Keys issued alongside this one, in service order.
    #[serde(default)]
    pub additional_keys: Vec<AdditionalKey>,
}

/// A feature entitlement attached to a key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub api_name: Option<String>,
}

/// A companion key issued alongside the primary one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalKey {
    #[serde(default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub api_key_type: Option<String>,
    #[serde(default)]
    pub key_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub expiration_date: Option<PortalDate>,
}

/// Retrieved key material. `key_data` is opaque to the client and is
/// written out verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMaterial {
    pub key_number: String,
    pub key_data: String,
}

/// Lookup payload shape: `{"keys": [ ... ]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct KeyList {
    #[serde(default)]
    pub keys: Vec<KeyRecord>,
}

impl CommandOutcome {
    /// Key rows carried by a lookup outcome, in service order. Empty for
    /// failed or shapeless outcomes.
    pub fn key_records(&self) -> Vec<KeyRecord> {
        self.decode::<KeyList>().map(|l| l.keys).unwrap_or_default()
    }

    /// Metadata carried by a metadata outcome, when present and decodable.
    pub fn metadata(&self) -> Option<KeyMetadata> {
        if !self.successful() {
            return None;
        }
        self.decode()
    }

    /// Key material carried by a retrieve outcome.
    pub fn key_material(&self) -> Option<KeyMaterial> {
        if !self.successful() {
            return None;
        }
        self.decode()
    }
}
