// crates/geolocation-core/src/traits.rs
use crate::model::{Airport, Coordinates, GeoPoint};
use crate::text::{equals_folded, fold_key};

/// Name-based matching helpers for types that expose a canonical display name.
///
/// Comparisons are accent-insensitive and case-insensitive, based on
/// [`fold_key`].
///
/// # Examples
/// ```rust
/// use geolocation_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Zürich Airport").name_contains("zurich"));
/// assert!(Place("Nadi").is_named("NADI"));
/// ```
pub trait NameMatch {
    /// Returns the canonical display name used for matching.
    fn name_str(&self) -> &str;

    #[inline]
    fn is_named(&self, q: &str) -> bool {
        equals_folded(self.name_str(), q)
    }

    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        fold_key(self.name_str()).contains(&fold_key(q))
    }
}

/// Nearest-airport search over a static airport set.
///
/// Implementations must agree with the linear scan in
/// [`crate::airport::nearest_in`]: haversine distance, and among airports
/// within [`crate::airport::TIE_EPSILON_KM`] of the best distance the one with
/// the lexicographically smallest IATA code wins. A spatial index may replace
/// the scan as long as it keeps that contract.
pub trait AirportSearch {
    /// Nearest airport to `point` and its distance in kilometres.
    fn nearest_with_distance(&self, point: GeoPoint) -> Option<(&Airport, f64)>;

    /// Nearest airport, or `None` when the coordinates are not usable.
    fn nearest(&self, coordinates: &Coordinates) -> Option<&Airport> {
        let point = coordinates.point()?;
        self.nearest_with_distance(point).map(|(airport, _)| airport)
    }
}
