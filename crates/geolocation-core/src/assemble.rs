// crates/geolocation-core/src/assemble.rs

//! # Enrichment
//!
//! [`Assembler`] combines the request signals with the shared datasets into a
//! [`GeolocationRecord`]. Only an unknown country code fails a request; every
//! other missing or malformed signal degrades to `null` in the record.

use crate::city::{self, RawCity};
use crate::config::ResolverConfig;
use crate::dataset::Datasets;
use crate::error::{GeoError, Result};
use crate::ip;
use crate::model::{Coordinates, GeolocationRecord, Region};
use crate::signals::{EdgeSignals, EnrichOptions};
use crate::traits::AirportSearch;
use tracing::{debug, error};

#[cfg(feature = "asn")]
use crate::asn::AsnLookup;
#[cfg(feature = "asn")]
use crate::model::AsnInfo;
#[cfg(feature = "asn")]
use std::sync::Arc;
#[cfg(feature = "asn")]
use tracing::warn;

/// Builds geolocation records against one set of datasets.
///
/// Cheap to clone; holds a borrow of the datasets plus the configuration.
#[derive(Clone)]
pub struct Assembler<'d> {
    datasets: &'d Datasets,
    config: ResolverConfig,
    #[cfg(feature = "asn")]
    asn: Option<Arc<dyn AsnLookup>>,
}

impl<'d> Assembler<'d> {
    pub fn new(datasets: &'d Datasets, config: ResolverConfig) -> Self {
        Assembler {
            datasets,
            config,
            #[cfg(feature = "asn")]
            asn: None,
        }
    }

    /// Attaches the collaborator used when a request asks for `asn`.
    #[cfg(feature = "asn")]
    pub fn with_asn_lookup(mut self, lookup: Arc<dyn AsnLookup>) -> Self {
        self.asn = Some(lookup);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn datasets(&self) -> &'d Datasets {
        self.datasets
    }

    /// Everything but the ASN section. Synchronous, so it also runs where no
    /// async executor exists.
    pub fn assemble_base(
        &self,
        signals: &EdgeSignals,
        options: EnrichOptions,
    ) -> Result<GeolocationRecord<'d>> {
        let datasets = self.datasets;
        let overrides = &self.config.overrides;

        let code = overrides.country.as_deref().or_else(|| signals.country());
        let country = code
            .and_then(|code| datasets.countries.by_alpha2(code))
            .ok_or_else(|| {
                error!(code = code.unwrap_or("null"), "no country found for alpha2 code");
                GeoError::CountryNotFound {
                    code: code.map(str::to_owned),
                }
            })?;

        let address = overrides.address.as_deref().or_else(|| signals.address());
        let ip = ip::classify(address);

        let city = city::normalize(RawCity {
            name: overrides.city.as_deref().or_else(|| signals.city()),
            postal_code: Some(signals.postal_code()),
            metro_code: Some(signals.metro_code()),
        });

        let coordinates = self.coordinates(signals);
        let airport = datasets.airports.nearest(&coordinates);

        debug!(
            country = country.alpha2(),
            ip_version = ?ip.version,
            airport = airport.map(|a| a.iata()),
            "assembled base record"
        );

        Ok(GeolocationRecord {
            ip,
            city,
            country,
            region: Region::from_parts(signals.region_code(), signals.region_name()),
            airport,
            coordinates,
            timezone: signals.timezone().map(str::to_owned),
            headers: options
                .include_headers
                .then(|| signals.headers().clone()),
            asn: None,
        })
    }

    /// The full record. The ASN section is added when requested and a lookup
    /// is configured; a failed or slow lookup leaves it out.
    #[cfg(feature = "asn")]
    pub async fn assemble(
        &self,
        signals: &EdgeSignals,
        options: EnrichOptions,
    ) -> Result<GeolocationRecord<'d>> {
        let mut record = self.assemble_base(signals, options)?;

        if options.include_asn {
            if let Some(address) = record.ip.address.as_deref() {
                if record.ip.version.is_known() {
                    record.asn = self.enrich_asn(address).await;
                }
            }
        }

        Ok(record)
    }

    #[cfg(feature = "asn")]
    async fn enrich_asn(&self, address: &str) -> Option<AsnInfo> {
        let Some(lookup) = self.asn.as_ref() else {
            debug!("ASN requested but no lookup is configured");
            return None;
        };

        let timeout = self.config.asn_timeout();
        let outcome = match tokio::time::timeout(timeout, lookup.lookup(address)).await {
            Ok(result) => result,
            Err(_) => Err(GeoError::EnrichmentTimeout(timeout)),
        };

        match outcome {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(provider = lookup.name(), address, error = %e, "ASN enrichment skipped");
                None
            }
        }
    }

    fn coordinates(&self, signals: &EdgeSignals) -> Coordinates {
        let overrides = &self.config.overrides;
        if overrides.latitude.is_some() || overrides.longitude.is_some() {
            return Coordinates::new(overrides.latitude, overrides.longitude);
        }
        Coordinates::parse(signals.latitude(), signals.longitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;
    use crate::model::IpVersion;

    fn datasets() -> Datasets {
        Datasets::from_json_str(
            r#"[
              {"country":{"alpha2":"US","alpha3":"USA","numeric":"840","name":"United States of America"},
               "continent":{"code":"NA","name":"North America"}},
              {"country":{"alpha2":"DE","alpha3":"DEU","numeric":"276","name":"Germany"},
               "continent":{"code":"EU","name":"Europe"},"euMember":true,"eeaMember":true}
            ]"#,
            r#"[
              {"iata":"LAX","name":"Los Angeles International Airport","latitude":33.9416,"longitude":-118.4085},
              {"iata":"JFK","name":"John F. Kennedy International Airport","latitude":40.6413,"longitude":-73.7781},
              {"iata":"FRA","name":"Frankfurt Airport","latitude":50.0379,"longitude":8.5622}
            ]"#,
        )
        .unwrap()
    }

    fn la_signals() -> EdgeSignals {
        EdgeSignals::from_pairs([
            ("cf-connecting-ip", "99.129.219.232"),
            ("cf-ipcountry", "US"),
            ("cf-ipcity", "Los%20Angeles"),
            ("cf-iplatitude", "34.0522"),
            ("cf-iplongitude", "-118.2437"),
            ("cf-timezone", "America/Los_Angeles"),
            ("cf-postal-code", "90012"),
        ])
    }

    #[test]
    fn builds_record_from_headers() {
        let db = datasets();
        let record = Assembler::new(&db, ResolverConfig::default())
            .assemble_base(&la_signals(), EnrichOptions::default())
            .unwrap();

        assert_eq!(record.country.alpha2(), "US");
        assert_eq!(record.ip.version, IpVersion::V4);
        assert_eq!(record.city.name.as_deref(), Some("Los Angeles"));
        assert_eq!(record.city.postal_code, Some(Some("90012".into())));
        assert_eq!(record.city.metro_code, Some(None));
        assert_eq!(record.airport.map(|a| a.iata()), Some("LAX"));
        assert_eq!(record.timezone.as_deref(), Some("America/Los_Angeles"));
        assert!(record.headers.is_none());
        assert!(record.asn.is_none());
        assert!(record.region.is_none());
    }

    #[test]
    fn unknown_country_fails() {
        let db = datasets();
        let signals = EdgeSignals::from_pairs([("cf-ipcountry", "ZZ")]);
        let err = Assembler::new(&db, ResolverConfig::default())
            .assemble_base(&signals, EnrichOptions::default())
            .unwrap_err();
        assert!(matches!(err, GeoError::CountryNotFound { code: Some(ref c) } if c == "ZZ"));
    }

    #[test]
    fn missing_country_fails_with_null_code() {
        let db = datasets();
        let err = Assembler::new(&db, ResolverConfig::default())
            .assemble_base(&EdgeSignals::new(), EnrichOptions::default())
            .unwrap_err();
        assert!(matches!(err, GeoError::CountryNotFound { code: None }));
        assert_eq!(
            err.to_string(),
            "Unable to find country information for code: null"
        );
    }

    #[test]
    fn overrides_win_over_headers() {
        let db = datasets();
        let config = ResolverConfig::default().with_overrides(Overrides {
            country: Some("DE".into()),
            address: Some("2001:db8::1".into()),
            city: Some("Frankfurt".into()),
            latitude: Some(50.11),
            longitude: Some(8.68),
        });
        let record = Assembler::new(&db, config)
            .assemble_base(&la_signals(), EnrichOptions::default())
            .unwrap();

        assert_eq!(record.country.alpha2(), "DE");
        assert_eq!(record.ip.address.as_deref(), Some("2001:db8::1"));
        assert_eq!(record.ip.version, IpVersion::V6);
        assert_eq!(record.city.name.as_deref(), Some("Frankfurt"));
        assert_eq!(record.airport.map(|a| a.iata()), Some("FRA"));
    }

    #[test]
    fn development_config_needs_no_headers() {
        let db = datasets();
        let record = Assembler::new(&db, ResolverConfig::development())
            .assemble_base(&EdgeSignals::new(), EnrichOptions::default())
            .unwrap();
        assert_eq!(record.country.alpha2(), "US");
        assert_eq!(record.ip.address.as_deref(), Some("99.129.219.232"));
        assert_eq!(record.city.name.as_deref(), Some("Los Angeles"));
        assert!(record.airport.is_none());
    }

    #[test]
    fn bad_coordinates_give_no_airport() {
        let db = datasets();
        let mut signals = la_signals();
        signals.insert("cf-iplatitude", "not-a-number");
        let record = Assembler::new(&db, ResolverConfig::default())
            .assemble_base(
                &EdgeSignals::from_pairs([
                    ("cf-ipcountry", "US"),
                    ("cf-iplatitude", "95"),
                    ("cf-iplongitude", "10"),
                ]),
                EnrichOptions::default(),
            )
            .unwrap();
        assert!(record.airport.is_none());
        assert_eq!(record.coordinates.latitude, None);

        // "34.0522, not-a-number" after joining repeated headers.
        let record = Assembler::new(&db, ResolverConfig::default())
            .assemble_base(&signals, EnrichOptions::default())
            .unwrap();
        assert!(record.airport.is_none());
    }

    #[test]
    fn headers_flag_includes_dump() {
        let db = datasets();
        let options = EnrichOptions {
            include_headers: true,
            ..EnrichOptions::default()
        };
        let record = Assembler::new(&db, ResolverConfig::default())
            .assemble_base(&la_signals(), options)
            .unwrap();
        let headers = record.headers.unwrap();
        assert_eq!(headers.get("cf-ipcountry").map(String::as_str), Some("US"));
        assert_eq!(headers.len(), 7);
    }

    #[test]
    fn region_from_headers() {
        let db = datasets();
        let mut signals = la_signals();
        signals.insert("cf-region-code", "CA");
        signals.insert("cf-region", "California");
        let record = Assembler::new(&db, ResolverConfig::default())
            .assemble_base(&signals, EnrichOptions::default())
            .unwrap();
        let region = record.region.unwrap();
        assert_eq!(region.code.as_deref(), Some("CA"));
        assert_eq!(region.name.as_deref(), Some("California"));
    }

    #[cfg(feature = "asn")]
    mod asn {
        use super::*;
        use crate::model::AsnCountry;
        use async_trait::async_trait;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        fn att() -> AsnInfo {
            AsnInfo {
                id: 7018,
                name: "AT&T".into(),
                company: Some("AT&T Services, Inc.".into()),
                website: None,
                country: AsnCountry {
                    name: Some("United States".into()),
                    alpha2: Some("US".into()),
                },
                users: Some(41_000_000),
                more_info_url: "https://radar.cloudflare.com/quality/as7018".into(),
            }
        }

        enum Behaviour {
            Answer,
            Fail,
            Hang,
        }

        struct FakeLookup {
            behaviour: Behaviour,
            calls: AtomicUsize,
        }

        impl FakeLookup {
            fn new(behaviour: Behaviour) -> Arc<Self> {
                Arc::new(FakeLookup {
                    behaviour,
                    calls: AtomicUsize::new(0),
                })
            }
        }

        #[async_trait]
        impl AsnLookup for FakeLookup {
            async fn lookup(&self, _ip: &str) -> Result<AsnInfo> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                match self.behaviour {
                    Behaviour::Answer => Ok(att()),
                    Behaviour::Fail => Err(GeoError::Enrichment("upstream 503".into())),
                    Behaviour::Hang => {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok(att())
                    }
                }
            }

            fn name(&self) -> &'static str {
                "fake"
            }
        }

        const WITH_ASN: EnrichOptions = EnrichOptions {
            include_headers: false,
            include_asn: true,
        };

        #[tokio::test]
        async fn merges_successful_lookup() {
            let db = datasets();
            let fake = FakeLookup::new(Behaviour::Answer);
            let record = Assembler::new(&db, ResolverConfig::default())
                .with_asn_lookup(fake.clone())
                .assemble(&la_signals(), WITH_ASN)
                .await
                .unwrap();
            assert_eq!(record.asn, Some(att()));
            assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn not_requested_means_no_call() {
            let db = datasets();
            let fake = FakeLookup::new(Behaviour::Answer);
            let record = Assembler::new(&db, ResolverConfig::default())
                .with_asn_lookup(fake.clone())
                .assemble(&la_signals(), EnrichOptions::default())
                .await
                .unwrap();
            assert!(record.asn.is_none());
            assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn failure_omits_field() {
            let db = datasets();
            let record = Assembler::new(&db, ResolverConfig::default())
                .with_asn_lookup(FakeLookup::new(Behaviour::Fail))
                .assemble(&la_signals(), WITH_ASN)
                .await
                .unwrap();
            assert!(record.asn.is_none());
            assert_eq!(record.country.alpha2(), "US");
        }

        #[tokio::test(start_paused = true)]
        async fn timeout_omits_field() {
            let db = datasets();
            let record = Assembler::new(&db, ResolverConfig::default())
                .with_asn_lookup(FakeLookup::new(Behaviour::Hang))
                .assemble(&la_signals(), WITH_ASN)
                .await
                .unwrap();
            assert!(record.asn.is_none());
            assert_eq!(record.airport.map(|a| a.iata()), Some("LAX"));
        }

        #[tokio::test]
        async fn unknown_address_skips_lookup() {
            let db = datasets();
            let fake = FakeLookup::new(Behaviour::Answer);
            let signals = EdgeSignals::from_pairs([
                ("cf-ipcountry", "US"),
                ("cf-connecting-ip", "not-an-ip"),
            ]);
            let record = Assembler::new(&db, ResolverConfig::default())
                .with_asn_lookup(fake.clone())
                .assemble(&signals, WITH_ASN)
                .await
                .unwrap();
            assert!(record.asn.is_none());
            assert_eq!(record.ip.version, IpVersion::Unknown);
            assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn country_failure_short_circuits() {
            let db = datasets();
            let fake = FakeLookup::new(Behaviour::Answer);
            let signals = EdgeSignals::from_pairs([("cf-ipcountry", "ZZ")]);
            let result = Assembler::new(&db, ResolverConfig::default())
                .with_asn_lookup(fake.clone())
                .assemble(&signals, WITH_ASN)
                .await;
            assert!(result.is_err());
            assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
        }
    }
}
