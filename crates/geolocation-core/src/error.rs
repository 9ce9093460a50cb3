// crates/geolocation-core/src/error.rs
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while loading datasets or assembling a record.
///
/// Only [`GeoError::CountryNotFound`] is expected on the request path; the
/// enrichment variants are logged and swallowed by the assembler.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Unable to find country information for code: {}", display_code(.code))]
    CountryNotFound { code: Option<String> },

    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary cache error: {0}")]
    Bincode(#[from] bincode::Error),

    #[cfg(feature = "asn")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ASN enrichment failed: {0}")]
    Enrichment(String),

    #[error("ASN enrichment timed out after {0:?}")]
    EnrichmentTimeout(Duration),
}

pub type Result<T> = std::result::Result<T, GeoError>;

fn display_code(code: &Option<String>) -> &str {
    code.as_deref().unwrap_or("null")
}

/// JSON body handed to the transport layer when a request cannot be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub code: &'static str,
}

impl GeoError {
    pub fn code(&self) -> &'static str {
        match self {
            GeoError::CountryNotFound { .. } => "COUNTRY_NOT_FOUND",
            _ => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the boundary layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            GeoError::CountryNotFound { .. } => 404,
            _ => 500,
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        let error = match self {
            GeoError::CountryNotFound { .. } => "Country not found",
            _ => "Internal error",
        };
        ErrorBody {
            error: error.to_string(),
            message: self.to_string(),
            code: self.code(),
        }
    }
}
