// crates/geolocation-core/src/signals.rs

//! Request-side inputs: the geolocation headers an edge platform attaches
//! (Cloudflare `cf-*`, Vercel `x-vercel-ip-*`) and the query flags that opt
//! into the optional record sections.

use std::collections::BTreeMap;

const ADDRESS: &[&str] = &["cf-connecting-ip", "x-real-ip"];
const COUNTRY: &[&str] = &["x-vercel-ip-country", "cf-ipcountry"];
const CITY: &[&str] = &["x-vercel-ip-city", "cf-ipcity"];
const POSTAL_CODE: &[&str] = &["cf-postal-code", "x-vercel-ip-postal-code"];
const METRO_CODE: &[&str] = &["cf-metro-code"];
const LATITUDE: &[&str] = &["cf-iplatitude", "x-vercel-ip-latitude"];
const LONGITUDE: &[&str] = &["cf-iplongitude", "x-vercel-ip-longitude"];
const TIMEZONE: &[&str] = &["cf-timezone", "x-vercel-ip-timezone"];
const REGION_CODE: &[&str] = &["cf-region-code", "x-vercel-ip-country-region"];
const REGION_NAME: &[&str] = &["cf-region"];

/// Case-insensitive bag of request headers.
///
/// Names are stored lower-cased; repeated headers are joined with `", "` the
/// way the Fetch API does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeSignals {
    headers: BTreeMap<String, String>,
}

impl EdgeSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut signals = EdgeSignals::new();
        for (name, value) in pairs {
            signals.insert(name.as_ref(), value.as_ref());
        }
        signals
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        self.headers
            .entry(name)
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_owned());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// First header among `names` that is present.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    /// Every header, sorted by name.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Client address, falling back to the first `x-forwarded-for` hop.
    pub fn address(&self) -> Option<&str> {
        self.first_of(ADDRESS).or_else(|| {
            self.get("x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
    }

    pub fn country(&self) -> Option<&str> {
        self.first_of(COUNTRY)
    }

    pub fn city(&self) -> Option<&str> {
        self.first_of(CITY)
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.first_of(POSTAL_CODE)
    }

    pub fn metro_code(&self) -> Option<&str> {
        self.first_of(METRO_CODE)
    }

    pub fn latitude(&self) -> Option<&str> {
        self.first_of(LATITUDE)
    }

    pub fn longitude(&self) -> Option<&str> {
        self.first_of(LONGITUDE)
    }

    pub fn timezone(&self) -> Option<&str> {
        self.first_of(TIMEZONE)
    }

    pub fn region_code(&self) -> Option<&str> {
        self.first_of(REGION_CODE)
    }

    pub fn region_name(&self) -> Option<&str> {
        self.first_of(REGION_NAME)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for EdgeSignals {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        EdgeSignals::from_pairs(iter)
    }
}

/// Opt-in flags for the optional record sections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Include the raw header dump.
    pub include_headers: bool,
    /// Run the ASN lookup.
    pub include_asn: bool,
}

impl EnrichOptions {
    /// Reads the `headers` and `asn` flags from a URL query string.
    ///
    /// Presence is enough (`?asn`, `?asn=`, `?asn=false` all opt in).
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut options = EnrichOptions::default();
        for (key, _) in url::form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "headers" => options.include_headers = true,
                "asn" => options.include_asn = true,
                _ => {}
            }
        }
        options
    }
}
