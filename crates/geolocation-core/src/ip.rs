// crates/geolocation-core/src/ip.rs
use crate::model::{IpInfo, IpVersion};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Classifies a client address by IP version.
///
/// Never fails: an absent or malformed address yields
/// [`IpVersion::Unknown`]. The (trimmed) address is echoed back as given.
///
/// ```rust
/// use geolocation_core::ip::classify;
/// use geolocation_core::IpVersion;
///
/// assert_eq!(classify(Some("99.129.219.232")).version, IpVersion::V4);
/// assert_eq!(classify(Some("2001:db8::1")).version, IpVersion::V6);
/// assert_eq!(classify(None).version, IpVersion::Unknown);
/// ```
pub fn classify(address: Option<&str>) -> IpInfo {
    match address {
        Some(raw) => {
            let address = raw.trim();
            IpInfo {
                version: version_of(address),
                address: Some(address.to_owned()),
            }
        }
        None => IpInfo {
            address: None,
            version: IpVersion::Unknown,
        },
    }
}

/// Lexical IPv4/IPv6 check. An IPv6 zone suffix (`fe80::1%eth0`) is allowed.
pub fn version_of(address: &str) -> IpVersion {
    if address.parse::<Ipv4Addr>().is_ok() {
        return IpVersion::V4;
    }
    let host = match address.split_once('%') {
        Some((_, "")) => return IpVersion::Unknown,
        Some((host, _zone)) => host,
        None => address,
    };
    if host.parse::<Ipv6Addr>().is_ok() {
        IpVersion::V6
    } else {
        IpVersion::Unknown
    }
}
