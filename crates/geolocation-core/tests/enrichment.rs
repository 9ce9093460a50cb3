// crates/geolocation-core/tests/enrichment.rs
use geolocation_core::prelude::*;
use serde_json::{json, Value};

fn assembler() -> Assembler<'static> {
    Assembler::new(Datasets::load().unwrap(), ResolverConfig::default())
}

fn los_angeles() -> EdgeSignals {
    EdgeSignals::from_pairs([
        ("CF-Connecting-IP", "99.129.219.232"),
        ("CF-IPCountry", "US"),
        ("CF-IPCity", "Los%20Angeles"),
        ("CF-IPLatitude", "34.0522"),
        ("CF-IPLongitude", "-118.2437"),
        ("CF-Timezone", "America/Los_Angeles"),
        ("CF-Postal-Code", "90012"),
        ("CF-Metro-Code", "803"),
    ])
}

#[tokio::test]
async fn us_request_gets_country_and_nearest_airport() {
    let record = assembler()
        .assemble(&los_angeles(), EnrichOptions::default())
        .await
        .unwrap();

    assert_eq!(record.country.alpha2(), "US");
    assert_eq!(record.country.continent().code, "NA");
    assert_eq!(record.ip.version, IpVersion::V4);
    assert_eq!(record.airport.map(Airport::iata), Some("LAX"));
    assert!(record.asn.is_none());
}

#[tokio::test]
async fn unknown_country_is_reported_with_its_code() {
    let signals = EdgeSignals::from_pairs([("cf-ipcountry", "ZZ")]);
    let err = assembler()
        .assemble(&signals, EnrichOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GeoError::CountryNotFound { code: Some(ref c) } if c == "ZZ"));
    assert_eq!(err.status_code(), 404);
    assert_eq!(
        serde_json::to_value(err.to_error_body()).unwrap(),
        json!({
            "error": "Country not found",
            "message": "Unable to find country information for code: ZZ",
            "code": "COUNTRY_NOT_FOUND"
        })
    );
}

#[test]
fn record_serializes_to_the_public_shape() {
    let record = assembler()
        .assemble_base(&los_angeles(), EnrichOptions::default())
        .unwrap();
    let v: Value = serde_json::to_value(&record).unwrap();

    assert_eq!(v["ip"], json!({"address": "99.129.219.232", "version": 4}));
    assert_eq!(
        v["city"],
        json!({"name": "Los Angeles", "postalCode": "90012", "metroCode": "803"})
    );
    assert_eq!(v["country"]["alpha2"], "US");
    assert_eq!(v["country"]["alpha3"], "USA");
    assert_eq!(v["country"]["numeric"], "840");
    assert_eq!(v["continent"]["code"], "NA");
    assert!(v["capitals"].is_array());
    assert!(v["currencies"].is_array());
    assert!(v["callingCodes"].is_array());
    assert_eq!(v["eeaMember"], false);
    assert_eq!(v["euMember"], false);
    assert!(v["languages"].is_array());
    assert!(v["tlds"].is_array());
    assert_eq!(v["airport"]["iata"], "LAX");
    assert_eq!(v["coordinates"], json!({"latitude": 34.0522, "longitude": -118.2437}));
    assert_eq!(v["timezone"], "America/Los_Angeles");

    let obj = v.as_object().unwrap();
    assert!(!obj.contains_key("headers"));
    assert!(!obj.contains_key("asn"));
    assert!(!obj.contains_key("region"));
}

#[test]
fn degraded_signals_become_nulls() {
    let signals = EdgeSignals::from_pairs([
        ("cf-ipcountry", "de"),
        ("cf-ipcity", "null"),
        ("cf-connecting-ip", "definitely-not-an-ip"),
        ("cf-iplatitude", "48.1"),
    ]);
    let record = assembler()
        .assemble_base(&signals, EnrichOptions::default())
        .unwrap();
    let v = serde_json::to_value(&record).unwrap();

    assert_eq!(v["country"]["alpha2"], "DE");
    assert_eq!(v["ip"]["version"], Value::Null);
    assert_eq!(v["city"], json!({"name": null, "postalCode": null, "metroCode": null}));
    assert_eq!(v["airport"], Value::Null);
    assert_eq!(v["coordinates"], json!({"latitude": 48.1, "longitude": null}));
    assert_eq!(v["timezone"], Value::Null);
}

#[test]
fn vercel_headers_are_understood() {
    let signals = EdgeSignals::from_pairs([
        ("x-real-ip", "2a02:1210:2e4c:b00::1"),
        ("x-vercel-ip-country", "CH"),
        ("x-vercel-ip-city", "Z%C3%BCrich"),
        ("x-vercel-ip-latitude", "47.3769"),
        ("x-vercel-ip-longitude", "8.5417"),
        ("x-vercel-ip-timezone", "Europe/Zurich"),
        ("x-vercel-ip-country-region", "ZH"),
    ]);
    let record = assembler()
        .assemble_base(&signals, EnrichOptions::from_query("headers"))
        .unwrap();

    assert_eq!(record.country.name(), "Switzerland");
    assert_eq!(record.ip.version, IpVersion::V6);
    assert_eq!(record.city.name.as_deref(), Some("Zürich"));
    assert_eq!(record.airport.map(Airport::iata), Some("ZRH"));
    assert_eq!(record.region.as_ref().and_then(|r| r.code.as_deref()), Some("ZH"));
    assert_eq!(record.headers.as_ref().map(|h| h.len()), Some(7));
}

#[test]
fn development_config_resolves_without_headers() {
    let assembler = Assembler::new(Datasets::load().unwrap(), ResolverConfig::development());
    let record = assembler
        .assemble_base(&EdgeSignals::new(), EnrichOptions::default())
        .unwrap();
    assert_eq!(record.country.alpha2(), "US");
    assert_eq!(record.city.name.as_deref(), Some("Los Angeles"));
    assert_eq!(record.ip.address.as_deref(), Some("99.129.219.232"));
}

#[tokio::test]
async fn asn_requested_without_a_lookup_is_omitted() {
    let record = assembler()
        .assemble(&los_angeles(), EnrichOptions::from_query("asn"))
        .await
        .unwrap();
    assert!(record.asn.is_none());
}
