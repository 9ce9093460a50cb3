// crates/geolocation-core/src/lib.rs

//! # geolocation-core
//!
//! Turns the geolocation headers an edge platform attaches to a request
//! (client IP, country code, city, coordinates, timezone) into one structured
//! [`GeolocationRecord`]: the full country record, a normalized city, the IP
//! version and the nearest airport.
//!
//! ```rust,no_run
//! use geolocation_core::prelude::*;
//!
//! # async fn run() -> geolocation_core::Result<()> {
//! let datasets = Datasets::load()?;
//! let assembler = Assembler::new(datasets, ResolverConfig::default());
//!
//! let signals = EdgeSignals::from_pairs([
//!     ("cf-connecting-ip", "99.129.219.232"),
//!     ("cf-ipcountry", "US"),
//!     ("cf-ipcity", "Los%20Angeles"),
//!     ("cf-iplatitude", "34.0522"),
//!     ("cf-iplongitude", "-118.2437"),
//! ]);
//!
//! let record = assembler.assemble(&signals, EnrichOptions::default()).await?;
//! assert_eq!(record.country.alpha2(), "US");
//! # Ok(())
//! # }
//! ```

pub mod airport;
pub mod assemble;
#[cfg(feature = "asn")]
pub mod asn;
pub mod city;
pub mod common;
pub mod config;
pub mod country;
pub mod dataset;
pub mod error;
pub mod ip;
pub mod loader; // The public loader
pub mod model;
pub mod prelude;
pub mod signals;
pub mod text;
pub mod traits;

// Re-exports
pub use crate::error::{ErrorBody, GeoError, Result};
pub use assemble::Assembler;
pub use common::DbStats;
pub use config::{Overrides, RadarConfig, ResolverConfig};
pub use country::{CountryIndex, CountryKey, CountryQuery, CountryQueryResult};
pub use dataset::Datasets;
pub use model::{
    Airport, AsnInfo, City, Continent, Coordinates, Country, CountryIdentity, GeoPoint,
    GeolocationRecord, IpInfo, IpVersion, Region,
};
pub use signals::{EdgeSignals, EnrichOptions};
pub use airport::Airports;
