use clap::{ArgAction, Parser, Subcommand};
use geolocation_core::CountryKey;
use std::path::PathBuf;

/// CLI arguments for geolocation-cli
#[derive(Debug, Parser)]
#[command(
    name = "geolocation",
    version,
    about = "CLI for inspecting the geolocation datasets and resolving edge headers"
)]
pub struct CliArgs {
    /// Directory holding countries.json[.gz] and airports.json[.gz] (default: bundled data)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// TOML file with resolver settings (overrides, asn_timeout_ms, radar)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Use the fixed development request values (99.129.219.232, US, Los Angeles)
    #[arg(long, global = true)]
    pub dev: bool,

    /// Authorization header value for the Cloudflare Radar API
    #[arg(long, env = "CLOUDFLARE_AUTHORIZATION", hide_env_values = true, global = true)]
    pub radar_token: Option<String>,

    /// More log output (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the loaded datasets
    Stats,

    /// List countries, or answer a country query string as JSON
    Countries {
        /// Query string such as "alpha2=DE" or "numeric=840"
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Lookup a country by code
    Country {
        /// The code (e.g. DE, DEU, 276)
        code: String,

        /// Which code form `code` is: alpha2, alpha3 or numeric
        #[arg(short, long, default_value = "alpha2")]
        key: CountryKey,
    },

    /// List airports, optionally filtered by name, city or IATA code
    Airports {
        /// Substring to search (accent- and case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Find the airport nearest to a point
    Nearest {
        /// Latitude in degrees
        #[arg(allow_hyphen_values = true)]
        latitude: f64,

        /// Longitude in degrees
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Build a geolocation record from request headers and print it as JSON
    Resolve {
        /// Request header as name=value (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Enrichment flags as a query string, e.g. "headers&asn"
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .or_else(|| raw.split_once(':'))
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in `{raw}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
