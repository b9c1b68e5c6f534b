//! The portal client abstraction: session, criteria, operations, and the
//! uniform result model.

pub mod criteria;
pub mod operations;
pub mod outcome;
pub mod records;
pub mod session;

pub use criteria::{normalize_ips, normalize_macs, Criteria};
pub use outcome::{CommandOutcome, PortalDate, CLIENT_FAULT};
pub use records::{AdditionalKey, Feature, KeyMaterial, KeyMetadata, KeyRecord};
pub use session::Session;
