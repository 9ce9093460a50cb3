// crates/geolocation-core/src/model/mod.rs
pub mod airport;
pub mod country;
pub mod record;

pub use airport::{Airport, Coordinates, GeoPoint};
pub use country::{Continent, Country, CountryIdentity, Currency, Language};
pub use record::{AsnCountry, AsnInfo, City, GeolocationRecord, IpInfo, IpVersion, Region};
