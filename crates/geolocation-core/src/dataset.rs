// crates/geolocation-core/src/dataset.rs
use crate::airport::Airports;
use crate::common::DbStats;
use crate::country::CountryIndex;
use crate::error::Result;
use crate::model::{Airport, Country};
use serde::{Deserialize, Serialize};

/// The read-only reference data shared by every request.
///
/// Build it once at startup (see the [`loader`](crate::loader)) and hand a
/// reference to the [`Assembler`](crate::Assembler).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Datasets {
    pub countries: CountryIndex,
    pub airports: Airports,
}

impl Datasets {
    pub fn new(countries: Vec<Country>, airports: Vec<Airport>) -> Result<Self> {
        Ok(Datasets {
            countries: CountryIndex::new(countries)?,
            airports: Airports::new(airports)?,
        })
    }

    pub fn stats(&self) -> DbStats {
        DbStats {
            countries: self.countries.len(),
            airports: self.airports.len(),
        }
    }
}
