//! Lookup criteria validation.
//!
//! Raw criteria arrive as comma-separated strings from the argument
//! source. Normalization keeps entries that match the expected address
//! shape and drops everything else silently, preserving input order.
//! The checks are deliberately shape-only: the IPv4 pattern does not
//! bound groups to 0-255, and the MAC pattern accepts any 1-2
//! non-whitespace characters per group rather than strict hex. Matching
//! entries are preserved exactly as given (after trimming).

use std::sync::LazyLock;

use regex::Regex;

/// Four groups of 1-3 digits separated by dots. Shape check only.
static IPV4_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap());

/// Six colon-separated groups of 1-2 non-whitespace, non-colon characters.
static MAC_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:]{1,2}:){5}[^\s:]{1,2}$").unwrap());

/// Validated lookup criteria: the IP and MAC addresses a key search is
/// filtered by. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    ips: Vec<String>,
    macs: Vec<String>,
}

impl Criteria {
    /// Build criteria from raw comma-separated address lists.
    ///
    /// Entries that do not match the expected shape are dropped without
    /// error; this never fails, but the result may be empty.
    pub fn from_raw(raw_ips: &str, raw_macs: &str) -> Self {
        Self {
            ips: normalize_ips(raw_ips),
            macs: normalize_macs(raw_macs),
        }
    }

    /// Validated IPv4 entries, in input order.
    pub fn ips(&self) -> &[String] {
        &self.ips
    }

    /// Validated MAC entries, in input order.
    pub fn macs(&self) -> &[String] {
        &self.macs
    }

    /// True when no entry survived normalization.
    pub fn is_empty(&self) -> bool {
        self.ips.is_empty() && self.macs.is_empty()
    }
}

/// Split a comma-separated list and keep entries with an IPv4
/// dotted-quad shape, in original relative order.
pub fn normalize_ips(raw: &str) -> Vec<String> {
    normalize(raw, &IPV4_SHAPE)
}

/// Split a comma-separated list and keep entries with six colon-separated
/// groups of 1-2 characters, in original relative order.
pub fn normalize_macs(raw: &str) -> Vec<String> {
    normalize(raw, &MAC_SHAPE)
}

fn normalize(raw: &str, shape: &Regex) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| shape.is_match(entry))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ips_keep_well_formed_entries_in_order() {
        let ips = normalize_ips("10.0.0.1, bad-ip, 10.0.0.2");
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn ips_shape_check_has_no_bounds_check() {
        // Historical pattern: digit-group shape only, 999 passes.
        let ips = normalize_ips("999.999.999.999");
        assert_eq!(ips, vec!["999.999.999.999"]);
    }

    #[test]
    fn ips_reject_wrong_group_counts() {
        assert!(normalize_ips("10.0.0").is_empty());
        assert!(normalize_ips("10.0.0.0.1").is_empty());
        assert!(normalize_ips("10.0.0.1234").is_empty());
        assert!(normalize_ips("").is_empty());
        assert!(normalize_ips(",,,").is_empty());
    }

    #[test]
    fn ips_tolerate_surrounding_whitespace() {
        let ips = normalize_ips("  192.168.1.1 ,10.0.0.5  ");
        assert_eq!(ips, vec!["192.168.1.1", "10.0.0.5"]);
    }

    #[test]
    fn macs_keep_six_group_entries_in_order() {
        let macs = normalize_macs("aa:bb:cc:dd:ee:ff, nope, 00:11:22:33:44:55");
        assert_eq!(macs, vec!["aa:bb:cc:dd:ee:ff", "00:11:22:33:44:55"]);
    }

    #[test]
    fn macs_shape_check_is_not_strict_hex() {
        // Loose on purpose: single characters and non-hex pass through
        // unchanged.
        let macs = normalize_macs("a:b:c:d:e:f, zz:zz:zz:zz:zz:zz");
        assert_eq!(macs, vec!["a:b:c:d:e:f", "zz:zz:zz:zz:zz:zz"]);
    }

    #[test]
    fn macs_reject_wrong_group_counts_and_widths() {
        assert!(normalize_macs("aa:bb:cc:dd:ee").is_empty());
        assert!(normalize_macs("aa:bb:cc:dd:ee:ff:00").is_empty());
        assert!(normalize_macs("aaa:bb:cc:dd:ee:ff").is_empty());
        assert!(normalize_macs("aa-bb-cc-dd-ee-ff").is_empty());
        assert!(normalize_macs("").is_empty());
    }

    #[test]
    fn criteria_from_raw_combines_both_kinds() {
        let criteria = Criteria::from_raw("10.0.0.1, junk", "aa:bb:cc:dd:ee:ff");
        assert_eq!(criteria.ips(), ["10.0.0.1"]);
        assert_eq!(criteria.macs(), ["aa:bb:cc:dd:ee:ff"]);
        assert!(!criteria.is_empty());
    }

    #[test]
    fn criteria_is_empty_when_nothing_survives() {
        let criteria = Criteria::from_raw("not-an-ip", "not-a-mac");
        assert!(criteria.is_empty());
    }
}
