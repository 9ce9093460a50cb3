// crates/geolocation-core/src/country.rs

//! # Country Index
//!
//! Immutable lookup maps over the static country dataset. Built once, then
//! shared read-only by every request.

use crate::error::{GeoError, Result};
use crate::model::Country;
use crate::traits::NameMatch;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which ISO 3166-1 code a lookup value is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountryKey {
    Alpha2,
    Alpha3,
    Numeric,
}

impl CountryKey {
    pub fn as_str(self) -> &'static str {
        match self {
            CountryKey::Alpha2 => "alpha2",
            CountryKey::Alpha3 => "alpha3",
            CountryKey::Numeric => "numeric",
        }
    }

    fn normalize(self, value: &str) -> String {
        let value = value.trim();
        match self {
            CountryKey::Alpha2 | CountryKey::Alpha3 => value.to_ascii_uppercase(),
            CountryKey::Numeric => value.to_owned(),
        }
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryKey {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha2" => Ok(CountryKey::Alpha2),
            "alpha3" => Ok(CountryKey::Alpha3),
            "numeric" => Ok(CountryKey::Numeric),
            other => Err(GeoError::InvalidDataset(format!(
                "unknown country key `{other}` (expected alpha2, alpha3 or numeric)"
            ))),
        }
    }
}

/// Country lookup by alpha-2, alpha-3 or numeric code.
///
/// Alpha codes match case-insensitively; numeric codes match exactly (after
/// trimming), so `"004"` and `"4"` are different keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Country>", into = "Vec<Country>")]
pub struct CountryIndex {
    countries: Vec<Country>,
    by_alpha2: HashMap<String, usize>,
    by_alpha3: HashMap<String, usize>,
    by_numeric: HashMap<String, usize>,
}

impl CountryIndex {
    /// Builds the three maps in one pass.
    ///
    /// Fails with [`GeoError::InvalidDataset`] if any code is used twice.
    pub fn new(countries: Vec<Country>) -> Result<Self> {
        let mut by_alpha2 = HashMap::with_capacity(countries.len());
        let mut by_alpha3 = HashMap::with_capacity(countries.len());
        let mut by_numeric = HashMap::with_capacity(countries.len());

        for (pos, country) in countries.iter().enumerate() {
            insert_unique(&mut by_alpha2, CountryKey::Alpha2, country.alpha2(), pos)?;
            insert_unique(&mut by_alpha3, CountryKey::Alpha3, country.alpha3(), pos)?;
            insert_unique(&mut by_numeric, CountryKey::Numeric, country.numeric(), pos)?;
        }

        Ok(CountryIndex {
            countries,
            by_alpha2,
            by_alpha3,
            by_numeric,
        })
    }

    /// Resolves a country by the given code form. Unknown codes give `None`.
    pub fn resolve(&self, key: CountryKey, value: &str) -> Option<&Country> {
        let map = match key {
            CountryKey::Alpha2 => &self.by_alpha2,
            CountryKey::Alpha3 => &self.by_alpha3,
            CountryKey::Numeric => &self.by_numeric,
        };
        let found = map
            .get(&key.normalize(value))
            .map(|&pos| &self.countries[pos]);
        debug!(%key, value, found = found.is_some(), "country lookup");
        found
    }

    pub fn by_alpha2(&self, alpha2: &str) -> Option<&Country> {
        self.resolve(CountryKey::Alpha2, alpha2)
    }

    pub fn by_alpha3(&self, alpha3: &str) -> Option<&Country> {
        self.resolve(CountryKey::Alpha3, alpha3)
    }

    pub fn by_numeric(&self, numeric: &str) -> Option<&Country> {
        self.resolve(CountryKey::Numeric, numeric)
    }

    /// All countries, in dataset order.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Runs a `/countries`-style query.
    pub fn query(&self, query: &CountryQuery) -> CountryQueryResult<'_> {
        match query {
            CountryQuery::All => CountryQueryResult::All(&self.countries),
            CountryQuery::Find { key, value } => CountryQueryResult::One(
                value
                    .as_deref()
                    .and_then(|value| self.resolve(*key, value)),
            ),
        }
    }

    /// Accent- and case-insensitive substring search over country names.
    pub fn search_by_name(&self, substr: &str) -> Vec<&Country> {
        if substr.trim().is_empty() {
            return Vec::new();
        }
        self.countries
            .iter()
            .filter(|c| c.name_contains(substr))
            .collect()
    }
}

fn insert_unique(
    map: &mut HashMap<String, usize>,
    key: CountryKey,
    value: &str,
    pos: usize,
) -> Result<()> {
    let normalized = key.normalize(value);
    if normalized.is_empty() {
        return Err(GeoError::InvalidDataset(format!(
            "country at position {pos} has an empty {key} code"
        )));
    }
    if map.insert(normalized, pos).is_some() {
        return Err(GeoError::InvalidDataset(format!(
            "duplicate {key} code `{value}`"
        )));
    }
    Ok(())
}

impl TryFrom<Vec<Country>> for CountryIndex {
    type Error = GeoError;

    fn try_from(countries: Vec<Country>) -> Result<Self> {
        CountryIndex::new(countries)
    }
}

impl From<CountryIndex> for Vec<Country> {
    fn from(index: CountryIndex) -> Self {
        index.countries
    }
}

/// A `/countries` query.
///
/// Parsed from a URL query string by [`CountryQuery::from_query`]:
/// - none of `alpha2`, `alpha3`, `numeric` present → [`CountryQuery::All`]
/// - otherwise the first non-empty of `alpha2`, `alpha3`, falling back to
///   `numeric` (whose value may be missing, which matches nothing)
///
/// A repeated key keeps its first value, so `alpha2=&alpha2=DE` counts as an
/// empty `alpha2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryQuery {
    All,
    Find {
        key: CountryKey,
        value: Option<String>,
    },
}

impl CountryQuery {
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut alpha2 = None;
        let mut alpha3 = None;
        let mut numeric = None;
        let mut filtered = false;

        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*k {
                "alpha2" => &mut alpha2,
                "alpha3" => &mut alpha3,
                "numeric" => &mut numeric,
                _ => continue,
            };
            filtered = true;
            // Only the first occurrence of a key counts, even when empty.
            if slot.is_none() {
                *slot = Some(v.into_owned());
            }
        }

        if !filtered {
            return CountryQuery::All;
        }
        let [alpha2, alpha3, numeric] =
            [alpha2, alpha3, numeric].map(|v| v.filter(|v| !v.is_empty()));
        if let Some(value) = alpha2 {
            return CountryQuery::Find {
                key: CountryKey::Alpha2,
                value: Some(value),
            };
        }
        if let Some(value) = alpha3 {
            return CountryQuery::Find {
                key: CountryKey::Alpha3,
                value: Some(value),
            };
        }
        CountryQuery::Find {
            key: CountryKey::Numeric,
            value: numeric,
        }
    }
}

/// Outcome of a [`CountryQuery`]: the whole dataset, or at most one country.
///
/// A missing match is plain absence (`null` when serialized), not an error.
#[derive(Clone, Copy, Debug)]
pub enum CountryQueryResult<'a> {
    All(&'a [Country]),
    One(Option<&'a Country>),
}

impl Serialize for CountryQueryResult<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CountryQueryResult::All(countries) => countries.serialize(serializer),
            CountryQueryResult::One(country) => country.serialize(serializer),
        }
    }
}
