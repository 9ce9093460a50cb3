//! Basic usage example for geolocation-rs
//!
//! This example demonstrates how to:
//! - Load the bundled datasets
//! - Look up countries by each ISO code form
//! - Find the nearest airport to a point
//! - Turn edge headers into a geolocation record

use geolocation_rs::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("=== geolocation-rs Basic Usage Example ===\n");

    println!("Loading datasets...");
    let db = Datasets::load()?;
    let stats = db.stats();
    println!(
        "✓ {} countries, {} airports loaded\n",
        stats.countries, stats.airports
    );

    // Example 1: Country lookups
    println!("--- Example 1: Country by alpha2 / alpha3 / numeric ---");
    for (key, code) in [
        (CountryKey::Alpha2, "de"),
        (CountryKey::Alpha3, "JPN"),
        (CountryKey::Numeric, "076"),
    ] {
        match db.countries.resolve(key, code) {
            Some(c) => println!("{key} {code}: {} ({})", c.name(), c.continent().name),
            None => println!("{key} {code}: not found"),
        }
    }
    println!();

    // Example 2: Nearest airport
    println!("--- Example 2: Nearest airport ---");
    for (place, lat, lon) in [
        ("Downtown LA", 34.0522, -118.2437),
        ("Longyearbyen", 78.2232, 15.6267),
        ("Suva", -18.1416, 178.4419),
    ] {
        let point = GeoPoint::new(lat, lon).expect("valid coordinates");
        if let Some((airport, km)) = db.airports.nearest_with_distance(point) {
            println!("{place}: {} {} ({km:.1} km)", airport.iata(), airport.name());
        }
    }
    println!();

    // Example 3: Full record from request headers
    println!("--- Example 3: Record from Cloudflare headers ---");
    let signals = EdgeSignals::from_pairs([
        ("cf-connecting-ip", "99.129.219.232"),
        ("cf-ipcountry", "US"),
        ("cf-ipcity", "Los%20Angeles"),
        ("cf-iplatitude", "34.0522"),
        ("cf-iplongitude", "-118.2437"),
        ("cf-timezone", "America/Los_Angeles"),
    ]);
    let assembler = Assembler::new(db, ResolverConfig::default());
    let record = assembler
        .assemble(&signals, EnrichOptions::default())
        .await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&record).expect("record serializes")
    );

    Ok(())
}
