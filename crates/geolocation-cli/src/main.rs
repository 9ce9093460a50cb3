//! geolocation-cli — Command-line interface for geolocation-core
//!
//! Inspects the bundled reference datasets and runs the enrichment resolver
//! on headers given on the command line, which is handy for checking what a
//! deployment would answer for a given edge request.
//!
//! Usage examples
//! --------------
//!
//! - Show dataset sizes
//!   $ geolocation stats
//!
//! - Country lookups
//!   $ geolocation country de
//!   $ geolocation country 276 --key numeric
//!   $ geolocation countries --query "alpha3=NOR"
//!
//! - Nearest airport to a point
//!   $ geolocation nearest 34.0522 -118.2437
//!
//! - Resolve a request
//!   $ geolocation resolve -H cf-ipcountry=US -H cf-iplatitude=34.05 -H cf-iplongitude=-118.24
//!   $ geolocation --dev resolve --query "headers&asn"
//!
//! Configuration
//! -------------
//!
//! `--config settings.toml` loads a `ResolverConfig`; `--dev` swaps in the
//! development overrides; `CLOUDFLARE_AUTHORIZATION` (or `--radar-token`)
//! supplies the Radar credentials used by `?asn`.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use geolocation_core::prelude::*;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ResolverConfig::default(),
    };
    if args.dev {
        config = config.with_overrides(Overrides::development());
    }
    if let Some(token) = args.radar_token {
        config.radar.token = Some(token);
    }

    let owned;
    let db: &Datasets = match &args.data_dir {
        Some(dir) => {
            owned = Datasets::load_from_dir(dir)
                .with_context(|| format!("loading datasets from {}", dir.display()))?;
            &owned
        }
        None => Datasets::load()?,
    };

    match args.command {
        Commands::Stats => {
            let stats = db.stats();
            println!("Dataset statistics:");
            println!("  Countries: {}", stats.countries);
            println!("  Airports: {}", stats.airports);
        }

        Commands::Countries { query: None } => {
            for c in db.countries.countries() {
                println!("{} ({}, {}, {})", c.name(), c.alpha2(), c.alpha3(), c.numeric());
            }
        }

        Commands::Countries { query: Some(query) } => {
            let result = db.countries.query(&CountryQuery::from_query(&query));
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Country { code, key } => match db.countries.resolve(key, &code) {
            Some(c) => {
                println!("Country: {}", c.name());
                println!("Alpha2: {}", c.alpha2());
                println!("Alpha3: {}", c.alpha3());
                println!("Numeric: {}", c.numeric());
                println!("Capital: {:?}", c.capital());
                println!("Continent: {} ({})", c.continent().name, c.continent().code);
                println!("Calling codes: {}", c.calling_codes.join(", "));
                println!("EU member: {}", c.eu_member);
                println!("EEA member: {}", c.eea_member);
            }
            None => eprintln!("No country found for {key}: {code}"),
        },

        Commands::Airports { search } => {
            let airports: Vec<&Airport> = match search.as_deref() {
                Some(q) => db.airports.search_by_name(q),
                None => db.airports.airports().iter().collect(),
            };
            if airports.is_empty() {
                println!("No airports found");
            }
            for a in airports {
                println!(
                    "{} — {} ({}, {:.4}, {:.4})",
                    a.iata(),
                    a.name(),
                    a.city().unwrap_or("-"),
                    a.latitude,
                    a.longitude
                );
            }
        }

        Commands::Nearest {
            latitude,
            longitude,
        } => {
            let point = GeoPoint::new(latitude, longitude)
                .with_context(|| format!("({latitude}, {longitude}) is not a valid position"))?;
            match db.airports.nearest_with_distance(point) {
                Some((a, km)) => println!("{} — {} ({km:.1} km)", a.iata(), a.name()),
                None => println!("No airport found"),
            }
        }

        Commands::Resolve { headers, query } => {
            let signals = EdgeSignals::from_pairs(headers);
            let options = EnrichOptions::from_query(&query);
            resolve(db, config, &signals, options).await?;
        }
    }

    Ok(())
}

async fn resolve(
    db: &Datasets,
    config: ResolverConfig,
    signals: &EdgeSignals,
    options: EnrichOptions,
) -> anyhow::Result<()> {
    let assembler = Assembler::new(db, config);

    #[cfg(feature = "asn")]
    let result = {
        let assembler = if options.include_asn {
            let client = RadarAsnClient::new(&assembler.config().radar)?;
            assembler.with_asn_lookup(std::sync::Arc::new(client))
        } else {
            assembler
        };
        assembler.assemble(signals, options).await
    };

    #[cfg(not(feature = "asn"))]
    let result = assembler.assemble_base(signals, options);

    match result {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(e @ GeoError::CountryNotFound { .. }) => {
            println!("{}", serde_json::to_string_pretty(&e.to_error_body())?);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn load_config(path: &Path) -> anyhow::Result<ResolverConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
