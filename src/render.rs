//! Stdout rendering for portal results.
//!
//! Nested sequences (features, additional keys) print in the order the
//! service returned them.

use keyport::portal::{CommandOutcome, KeyMetadata, KeyRecord, PortalDate};

fn date_or_dash(date: &Option<PortalDate>) -> String {
    date.map(|d| d.calendar()).unwrap_or_else(|| "-".to_string())
}

fn opt_or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Print lookup results, one key per line.
pub fn key_records(records: &[KeyRecord]) {
    if records.is_empty() {
        println!("No keys matched the given criteria.");
        return;
    }

    for r in records {
        println!(
            "{}  type={}  created={}  last-report={} ({})  {}",
            r.key_number,
            opt_or_dash(&r.key_type),
            date_or_dash(&r.create_date),
            date_or_dash(&r.last_reporting_date),
            opt_or_dash(&r.last_reporting_ip),
            if r.terminated { "TERMINATED" } else { "active" },
        );
    }
}

/// Print full key metadata, including nested sequences.
pub fn metadata(meta: &KeyMetadata) {
    let r = &meta.record;
    println!("Key number:       {}", r.key_number);
    println!("Key type:         {}", opt_or_dash(&r.key_type));
    println!("Product key:      {}", opt_or_dash(&meta.product_key));
    println!("Billing type:     {}", opt_or_dash(&meta.billing_type));
    println!("Created:          {}", date_or_dash(&r.create_date));
    println!("Expires:          {}", date_or_dash(&meta.expiration_date));
    println!("Updated:          {}", date_or_dash(&meta.update_date));
    println!("Last report:      {}", date_or_dash(&r.last_reporting_date));
    println!("Last report IP:   {}", opt_or_dash(&r.last_reporting_ip));
    println!("Terminated:       {}", r.terminated);
    println!("Problem flagged:  {}", meta.problem);

    if !meta.features.is_empty() {
        println!("Features:");
        for f in &meta.features {
            println!(
                "  {} ({})",
                f.name.as_deref().unwrap_or("-"),
                f.api_name.as_deref().unwrap_or("-")
            );
        }
    }

    if !meta.additional_keys.is_empty() {
        println!("Additional keys:");
        for k in &meta.additional_keys {
            println!(
                "  {}  type={} ({})  expires={}",
                k.key_number.as_deref().unwrap_or("-"),
                k.key_type.as_deref().unwrap_or("-"),
                k.api_key_type.as_deref().unwrap_or("-"),
                date_or_dash(&k.expiration_date),
            );
        }
    }
}

/// Print a generic operation outcome.
pub fn outcome(what: &str, outcome: &CommandOutcome) {
    if outcome.successful() {
        match outcome.message() {
            Some(msg) => println!("{what}: {msg}"),
            None => println!("{what}: ok"),
        }
    } else {
        match outcome.message() {
            Some(msg) => eprintln!("{what} failed: {msg}"),
            None => eprintln!("{what} failed"),
        }
    }
    if let Some(code) = outcome.code() {
        println!("Code: {code}");
    }
}

/// Print a usage report outcome.
///
/// The portal inverts the success flag for this operation: a successful
/// outcome means no usage data has been reported yet, and the actual
/// report arrives on a failed one. Client-side faults are filtered out
/// by the caller before this is reached.
pub fn usage(key: &str, outcome: &CommandOutcome) {
    if outcome.successful() {
        println!("No usage data has been reported yet for {key}.");
        return;
    }

    println!("Usage report for {key}:");
    if let Some(msg) = outcome.message() {
        println!("  {msg}");
    }
    if !outcome.payload().is_null() {
        // Usage payload shape varies by key type; print it as-is.
        println!(
            "{}",
            serde_json::to_string_pretty(outcome.payload()).unwrap_or_default()
        );
    }
}
