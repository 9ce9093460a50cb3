// crates/geolocation-core/src/airport.rs

//! # Airport Resolver
//!
//! Nearest airport by great-circle distance over a small static dataset.
//! A plain O(n) scan; see [`AirportSearch`] for the contract an index would
//! have to keep.

use crate::error::{GeoError, Result};
use crate::model::{Airport, Coordinates, GeoPoint};
use crate::text::fold_key;
use crate::traits::{AirportSearch, NameMatch};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Mean Earth radius (IUGG), in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Distances closer than this (1 m) are considered equal.
pub const TIE_EPSILON_KM: f64 = 0.001;

/// Great-circle distance in kilometres (haversine).
///
/// The longitude difference is wrapped into [-180, 180] and the haversine
/// term clamped to [0, 1], so antimeridian crossings, poles and antipodal
/// points stay well-defined.
///
/// ```rust
/// use geolocation_core::airport::haversine_km;
/// use geolocation_core::GeoPoint;
///
/// let berlin = GeoPoint::new(52.5200, 13.4050).unwrap();
/// let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
/// assert!((haversine_km(berlin, paris) - 878.0).abs() < 10.0);
/// ```
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = wrap_longitude_delta(b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

fn wrap_longitude_delta(delta: f64) -> f64 {
    if delta > 180.0 {
        delta - 360.0
    } else if delta < -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Linear scan over any airport slice.
///
/// Two passes: the first finds the minimum distance, the second picks the
/// smallest IATA code among airports within [`TIE_EPSILON_KM`] of it. The
/// result does not depend on the order of `airports`.
///
/// Airports whose own coordinates are invalid are skipped.
pub fn nearest_in(point: GeoPoint, airports: &[Airport]) -> Option<(&Airport, f64)> {
    let min_km = distances(point, airports)
        .map(|(_, km)| km)
        .min_by(f64::total_cmp)?;
    distances(point, airports)
        .filter(|&(_, km)| km <= min_km + TIE_EPSILON_KM)
        .min_by(|a, b| a.0.iata.cmp(&b.0.iata))
}

fn distances(point: GeoPoint, airports: &[Airport]) -> impl Iterator<Item = (&Airport, f64)> {
    airports
        .iter()
        .filter_map(move |a| a.point().map(|location| (a, haversine_km(point, location))))
}

/// Nearest airport to `coordinates`, or `None` if either component is
/// missing.
pub fn nearest<'a>(coordinates: &Coordinates, airports: &'a [Airport]) -> Option<&'a Airport> {
    let point = coordinates.point()?;
    nearest_in(point, airports).map(|(airport, _)| airport)
}

/// The static airport dataset.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Airport>", into = "Vec<Airport>")]
pub struct Airports {
    airports: Vec<Airport>,
}

impl Airports {
    /// Fails with [`GeoError::InvalidDataset`] if an airport has no IATA code
    /// or coordinates out of range.
    pub fn new(airports: Vec<Airport>) -> Result<Self> {
        for airport in &airports {
            if airport.iata.trim().is_empty() {
                return Err(GeoError::InvalidDataset(format!(
                    "airport `{}` has no IATA code",
                    airport.name
                )));
            }
            if airport.point().is_none() {
                return Err(GeoError::InvalidDataset(format!(
                    "airport {} has invalid coordinates ({}, {})",
                    airport.iata, airport.latitude, airport.longitude
                )));
            }
        }
        Ok(Airports { airports })
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Exact (case-insensitive) IATA lookup.
    pub fn by_iata(&self, iata: &str) -> Option<&Airport> {
        let iata = iata.trim();
        self.airports
            .iter()
            .find(|a| a.iata.eq_ignore_ascii_case(iata))
    }

    /// Folded substring search over name, city and IATA code.
    pub fn search_by_name(&self, substr: &str) -> Vec<&Airport> {
        let q = fold_key(substr.trim());
        if q.is_empty() {
            return Vec::new();
        }
        self.airports
            .iter()
            .filter(|a| {
                a.name_contains(&q)
                    || a.city().is_some_and(|c| fold_key(c).contains(&q))
                    || a.iata.to_ascii_lowercase() == q
            })
            .collect()
    }
}

impl AirportSearch for Airports {
    fn nearest_with_distance(&self, point: GeoPoint) -> Option<(&Airport, f64)> {
        let found = nearest_in(point, &self.airports);
        if let Some((airport, km)) = found {
            trace!(iata = %airport.iata, km, "nearest airport");
        }
        found
    }
}

impl TryFrom<Vec<Airport>> for Airports {
    type Error = GeoError;

    fn try_from(airports: Vec<Airport>) -> Result<Self> {
        Airports::new(airports)
    }
}

impl From<Airports> for Vec<Airport> {
    fn from(airports: Airports) -> Self {
        airports.airports
    }
}
