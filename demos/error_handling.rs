//! Error handling example for geolocation-rs
//!
//! This example demonstrates how lookups degrade and which failures surface

use geolocation_rs::prelude::*;

fn main() -> Result<()> {
    println!("=== geolocation-rs Error Handling Example ===\n");

    // Example 1: Handling dataset load errors
    println!("--- Example 1: Loading from a directory without datasets ---");
    match Datasets::load_from_dir(std::env::temp_dir().join("no-such-geolocation-data")) {
        Ok(db) => println!("✓ Unexpectedly loaded {} countries", db.stats().countries),
        Err(e) => println!("✗ {e}"),
    }
    println!();

    let db = Datasets::load()?;

    // Example 2: Unknown codes are absence, not errors
    println!("--- Example 2: Unknown country codes ---");
    for code in ["XX", "", "ABCD", "123"] {
        match db.countries.by_alpha2(code) {
            Some(c) => println!("  Found: {} ({})", c.name(), c.alpha2()),
            None => println!("  Not found: {code:?}"),
        }
    }
    println!();

    // Example 3: Malformed signals degrade to nulls
    println!("--- Example 3: Malformed request signals ---");
    let assembler = Assembler::new(db, ResolverConfig::default());
    let signals = EdgeSignals::from_pairs([
        ("cf-ipcountry", "FR"),
        ("cf-connecting-ip", "300.1.2.3"),
        ("cf-ipcity", "null"),
        ("cf-iplatitude", "north"),
        ("cf-iplongitude", "2.35"),
    ]);
    let record = assembler.assemble_base(&signals, EnrichOptions::default())?;
    println!("  ip version: {:?}", record.ip.version.as_number());
    println!("  city: {:?}", record.city.name);
    println!("  airport: {:?}", record.airport.map(|a| a.iata()));
    println!();

    // Example 4: The one request-path error
    println!("--- Example 4: Country not found ---");
    let signals = EdgeSignals::from_pairs([("cf-ipcountry", "ZZ")]);
    match assembler.assemble_base(&signals, EnrichOptions::default()) {
        Ok(record) => println!("  Resolved to {}", record.country.name()),
        Err(e) => {
            println!("  HTTP {}", e.status_code());
            println!(
                "  {}",
                serde_json::to_string(&e.to_error_body()).expect("error body serializes")
            );
        }
    }

    Ok(())
}
