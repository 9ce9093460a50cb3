// crates/geolocation-core/src/loader/mod.rs

//! # Data Loader
//!
//! Reads the country and airport reference files from disk (plain or
//! gzip-compressed JSON), validates them into [`Datasets`], and keeps a
//! bincode snapshot next to the sources so later starts skip the JSON parse.

use crate::dataset::Datasets;
use crate::error::{GeoError, Result};
use bincode::Options;
#[cfg(feature = "json")]
use once_cell::sync::OnceCell;
use std::io::Read;
use std::path::{Path, PathBuf};
#[cfg(feature = "json")]
use tracing::{debug, info, warn};

pub mod common_io;

pub const COUNTRIES_FILE: &str = "countries.json";
pub const AIRPORTS_FILE: &str = "airports.json";
pub const CACHE_FILE: &str = "datasets.bin";

/// Upper bound for a decoded snapshot.
const SNAPSHOT_LIMIT: u64 = 256 * 1024 * 1024;

#[cfg(feature = "json")]
static DATASETS_CACHE: OnceCell<Datasets> = OnceCell::new();

fn snapshot_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(SNAPSHOT_LIMIT)
        .allow_trailing_bytes()
}

impl Datasets {
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    /// Loads the bundled datasets once per process and returns the shared copy.
    #[cfg(feature = "json")]
    pub fn load() -> Result<&'static Datasets> {
        DATASETS_CACHE.get_or_try_init(|| Self::load_from_dir(Self::default_data_dir()))
    }

    /// Loads `countries.json[.gz]` and `airports.json[.gz]` from `dir`.
    ///
    /// A `datasets.bin` snapshot in the same directory is used instead when
    /// it is newer than both sources. A fresh snapshot is written after a
    /// JSON load; failing to write it is only logged.
    #[cfg(feature = "json")]
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let countries_path = common_io::resolve_dataset_path(dir, COUNTRIES_FILE)?;
        let airports_path = common_io::resolve_dataset_path(dir, AIRPORTS_FILE)?;
        let cache_path = dir.join(CACHE_FILE);

        if is_cache_fresh(&cache_path, &[&countries_path, &airports_path]) {
            match Self::load_snapshot(&cache_path) {
                Ok(datasets) => {
                    debug!(path = %cache_path.display(), "loaded dataset snapshot");
                    return Ok(datasets);
                }
                Err(e) => warn!(path = %cache_path.display(), error = %e, "ignoring unreadable snapshot"),
            }
        }

        let datasets = Self::from_json(
            common_io::open_stream(&countries_path)?,
            common_io::open_stream(&airports_path)?,
        )?;

        let stats = datasets.stats();
        info!(
            countries = stats.countries,
            airports = stats.airports,
            dir = %dir.display(),
            "loaded datasets from JSON"
        );

        if let Err(e) = datasets.save_snapshot(&cache_path) {
            warn!(path = %cache_path.display(), error = %e, "could not write dataset snapshot");
        }

        Ok(datasets)
    }

    /// Parses and validates the two JSON documents.
    #[cfg(feature = "json")]
    pub fn from_json(countries: impl Read, airports: impl Read) -> Result<Self> {
        let countries = serde_json::from_reader(countries)?;
        let airports = serde_json::from_reader(airports)?;
        Self::new(countries, airports)
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(countries: &str, airports: &str) -> Result<Self> {
        Self::new(serde_json::from_str(countries)?, serde_json::from_str(airports)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(snapshot_options().serialize(self)?)
    }

    /// Decodes a snapshot. Indexes are rebuilt and validated on the way in.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(snapshot_options().deserialize(data)?)
    }

    /// Writes the snapshot to a per-process temp file, then renames it over
    /// `path`, so readers never see a partial file.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(format!(".{}.tmp", std::process::id()));
        let tmp = PathBuf::from(tmp_name);

        std::fs::write(&tmp, self.to_bytes()?)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut data = Vec::new();
        common_io::open_stream(path)?.read_to_end(&mut data)?;
        Self::from_bytes(&data).map_err(|e| match e {
            GeoError::Bincode(inner) => {
                GeoError::InvalidDataset(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }
}

#[cfg(feature = "json")]
fn is_cache_fresh(cache: &Path, sources: &[&Path]) -> bool {
    let Ok(cache_time) = cache.metadata().and_then(|m| m.modified()) else {
        return false;
    };
    sources.iter().all(|src| {
        src.metadata()
            .and_then(|m| m.modified())
            .map(|t| t <= cache_time)
            .unwrap_or(false)
    })
}
