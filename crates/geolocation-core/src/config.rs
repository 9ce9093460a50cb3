// crates/geolocation-core/src/config.rs
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ASN_TIMEOUT_MS: u64 = 1500;
pub const DEFAULT_RADAR_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Settings injected into the [`Assembler`](crate::Assembler).
///
/// Deserializable from TOML/JSON; every field has a default:
///
/// ```toml
/// asn_timeout_ms = 1500
///
/// [overrides]
/// address = "99.129.219.232"
/// country = "US"
/// city = "Los Angeles"
///
/// [radar]
/// base_url = "https://api.cloudflare.com/client/v4"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub overrides: Overrides,
    pub asn_timeout_ms: u64,
    pub radar: RadarConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            overrides: Overrides::default(),
            asn_timeout_ms: DEFAULT_ASN_TIMEOUT_MS,
            radar: RadarConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Config for running outside the edge, with fixed request values.
    pub fn development() -> Self {
        ResolverConfig {
            overrides: Overrides::development(),
            ..Self::default()
        }
    }

    pub fn asn_timeout(&self) -> Duration {
        Duration::from_millis(self.asn_timeout_ms)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Fixed values that replace the corresponding request signals.
///
/// Empty by default; each field set here wins over whatever the request
/// carries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Overrides {
    pub fn development() -> Self {
        Overrides {
            address: Some("99.129.219.232".into()),
            country: Some("US".into()),
            city: Some("Los Angeles".into()),
            latitude: None,
            longitude: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Overrides::default()
    }
}

/// Cloudflare Radar API access for ASN lookups.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub base_url: String,
    /// Sent verbatim as the `authorization` header (e.g. `Bearer …`).
    pub token: Option<String>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        RadarConfig {
            base_url: DEFAULT_RADAR_BASE_URL.to_string(),
            token: None,
        }
    }
}

impl std::fmt::Debug for RadarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
