// crates/geolocation-core/src/asn.rs

//! # ASN lookup
//!
//! The one outbound call of the resolver: who operates the network an address
//! belongs to. [`AsnLookup`] is the seam; [`RadarAsnClient`] talks to the
//! Cloudflare Radar entities API.

use crate::config::RadarConfig;
use crate::error::{GeoError, Result};
use crate::model::{AsnCountry, AsnInfo};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, trace};

pub const RADAR_QUALITY_URL: &str = "https://radar.cloudflare.com/quality";

/// Resolves an IP address to its autonomous system.
#[async_trait]
pub trait AsnLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Result<AsnInfo>;

    /// Name used in logs.
    fn name(&self) -> &'static str;
}

pub struct RadarAsnClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl RadarAsnClient {
    pub fn new(config: &RadarConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("geolocation-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(RadarAsnClient {
            client,
            endpoint: format!(
                "{}/radar/entities/asns/ip",
                config.base_url.trim_end_matches('/')
            ),
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AsnLookup for RadarAsnClient {
    async fn lookup(&self, ip: &str) -> Result<AsnInfo> {
        debug!(ip, endpoint = %self.endpoint, "querying Radar for ASN");

        let mut request = self.client.get(&self.endpoint).query(&[("ip", ip)]);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Enrichment(format!("Radar answered {status}")));
        }

        let envelope: RadarEnvelope = response.json().await?;
        let info = envelope.into_asn_info()?;
        trace!(asn = info.id, name = %info.name, "Radar lookup done");
        Ok(info)
    }

    fn name(&self) -> &'static str {
        "cloudflare-radar"
    }
}

#[derive(Debug, Deserialize)]
struct RadarEnvelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    errors: Vec<RadarMessage>,
    result: Option<RadarResult>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RadarMessage {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RadarResult {
    asn: RadarAsn,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadarAsn {
    asn: u32,
    #[serde(default)]
    name: String,
    aka: Option<String>,
    name_long: Option<String>,
    website: Option<String>,
    country: Option<String>,
    country_name: Option<String>,
    estimated_users: Option<RadarUsers>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadarUsers {
    estimated_users: Option<u64>,
}

impl RadarEnvelope {
    fn into_asn_info(self) -> Result<AsnInfo> {
        if !self.success {
            let reasons: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(GeoError::Enrichment(format!(
                "Radar reported failure: {}",
                reasons.join("; ")
            )));
        }
        self.result
            .map(|r| r.asn.into())
            .ok_or_else(|| GeoError::Enrichment("Radar response has no result".into()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RadarAsn> for AsnInfo {
    fn from(asn: RadarAsn) -> Self {
        let name = non_empty(asn.aka).unwrap_or(asn.name);
        AsnInfo {
            id: asn.asn,
            name,
            company: non_empty(asn.name_long),
            website: non_empty(asn.website),
            country: AsnCountry {
                name: non_empty(asn.country_name),
                alpha2: non_empty(asn.country),
            },
            users: asn.estimated_users.and_then(|u| u.estimated_users),
            more_info_url: format!("{RADAR_QUALITY_URL}/as{}", asn.asn),
        }
    }
}
