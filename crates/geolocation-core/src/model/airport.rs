// crates/geolocation-core/src/model/airport.rs
use crate::text::parse_opt_f64;
use crate::traits::NameMatch;
use serde::{Deserialize, Serialize};

/// An airport of the static dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// IATA code, the identifying key (e.g. "LAX").
    pub iata: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub city: Option<String>,
    /// ISO alpha-2 code of the country the airport is in.
    #[serde(default)]
    pub country: Option<String>,
}

impl Airport {
    pub fn iata(&self) -> &str {
        &self.iata
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// The airport's location, if its coordinates are valid.
    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl NameMatch for Airport {
    fn name_str(&self) -> &str {
        &self.name
    }
}

/// A validated position in degrees: both components finite and in range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Returns `None` unless latitude ∈ [-90, 90] and longitude ∈ [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        (is_latitude(latitude) && is_longitude(longitude)).then_some(GeoPoint {
            latitude,
            longitude,
        })
    }
}

fn is_latitude(v: f64) -> bool {
    v.is_finite() && (-90.0..=90.0).contains(&v)
}

fn is_longitude(v: f64) -> bool {
    v.is_finite() && (-180.0..=180.0).contains(&v)
}

/// Coordinates as reported by the edge platform.
///
/// Each component is independently optional: it is `None` when the header
/// was missing, unparseable, non-finite or out of range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinates {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Coordinates {
            latitude: latitude.filter(|v| is_latitude(*v)),
            longitude: longitude.filter(|v| is_longitude(*v)),
        }
    }

    /// Parses raw header values such as `"34.0522"`.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Self {
        Coordinates::new(parse_opt_f64(latitude), parse_opt_f64(longitude))
    }

    /// The point to measure from, only when both components are present.
    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.latitude?, self.longitude?)
    }

    pub fn is_usable(&self) -> bool {
        self.point().is_some()
    }
}
