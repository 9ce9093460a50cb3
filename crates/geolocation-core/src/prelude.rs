//! geolocation prelude: bring common types and traits into scope for demos.

#![allow(unused_imports)]

pub use crate::airport::{haversine_km, Airports};
pub use crate::assemble::Assembler;
pub use crate::config::{Overrides, RadarConfig, ResolverConfig};
pub use crate::country::{CountryIndex, CountryKey, CountryQuery, CountryQueryResult};
pub use crate::dataset::Datasets;
pub use crate::error::{ErrorBody, GeoError, Result};
pub use crate::model::{
    Airport, AsnInfo, City, Continent, Coordinates, Country, GeoPoint, GeolocationRecord,
    IpInfo, IpVersion, Region,
};
pub use crate::signals::{EdgeSignals, EnrichOptions};
pub use crate::text::{equals_folded, fold_key};
pub use crate::traits::{AirportSearch, NameMatch};

#[cfg(feature = "asn")]
pub use crate::asn::{AsnLookup, RadarAsnClient};
