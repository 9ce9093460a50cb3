// crates/geolocation-core/src/model/record.rs
use super::{Airport, Coordinates, Country};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// IP version of a client address.
///
/// Serializes as `4`, `6` or `null`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
    Unknown,
}

impl IpVersion {
    pub fn as_number(self) -> Option<u8> {
        match self {
            IpVersion::V4 => Some(4),
            IpVersion::V6 => Some(6),
            IpVersion::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != IpVersion::Unknown
    }
}

impl Serialize for IpVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(v) => serializer.serialize_u8(v),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IpInfo {
    pub address: Option<String>,
    pub version: IpVersion,
}

/// Normalized city.
///
/// `postal_code` and `metro_code` are tri-state: `None` means the field was
/// never requested and is left out of the output, `Some(None)` renders as
/// `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metro_code: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Region {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Region {
    /// `None` when neither part was supplied.
    pub fn from_parts(code: Option<&str>, name: Option<&str>) -> Option<Self> {
        if code.is_none() && name.is_none() {
            return None;
        }
        Some(Region {
            code: code.map(str::to_owned),
            name: name.map(str::to_owned),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnCountry {
    pub name: Option<String>,
    pub alpha2: Option<String>,
}

/// The network operator behind an address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsnInfo {
    pub id: u32,
    pub name: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub country: AsnCountry,
    pub users: Option<u64>,
    pub more_info_url: String,
}

/// The enriched "who/where is this request from" record.
///
/// Borrows the country and airport from the shared datasets; everything
/// derived from the request is owned.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationRecord<'a> {
    pub ip: IpInfo,
    pub city: City,
    #[serde(flatten)]
    pub country: &'a Country,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    pub airport: Option<&'a Airport>,
    pub coordinates: Coordinates,
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<AsnInfo>,
}
