// crates/geolocation-core/src/model/country.rs
use crate::traits::NameMatch;
use serde::{Deserialize, Serialize};

/// The ISO 3166-1 identity of a country.
///
/// `numeric` stays a string so codes with leading zeros (`"004"`) keep their
/// canonical form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryIdentity {
    pub alpha2: String,
    pub alpha3: String,
    pub numeric: String,
    pub name: String,
    #[serde(default)]
    pub flag: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A country entry of the static dataset.
///
/// Serializes to the same camelCase shape it is read from, with the ISO
/// identity nested under `country`:
///
/// ```json
/// { "country": { "alpha2": "US", ... }, "continent": { ... }, "capitals": [...], ... }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[serde(rename = "country")]
    pub identity: CountryIdentity,
    pub continent: Continent,
    #[serde(default)]
    pub capitals: Vec<String>,
    #[serde(default)]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub calling_codes: Vec<String>,
    #[serde(default)]
    pub eea_member: bool,
    #[serde(default)]
    pub eu_member: bool,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub tlds: Vec<String>,
}

impl Country {
    pub fn alpha2(&self) -> &str {
        &self.identity.alpha2
    }

    pub fn alpha3(&self) -> &str {
        &self.identity.alpha3
    }

    pub fn numeric(&self) -> &str {
        &self.identity.numeric
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// First listed capital, if any.
    pub fn capital(&self) -> Option<&str> {
        self.capitals.first().map(String::as_str)
    }

    pub fn continent(&self) -> &Continent {
        &self.continent
    }
}

impl NameMatch for Country {
    fn name_str(&self) -> &str {
        self.name()
    }
}
