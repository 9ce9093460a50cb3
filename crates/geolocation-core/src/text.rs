// crates/geolocation-core/src/text.rs

/// Convert a string into a folded key suitable for comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Zürich` -> `Zurich`)
/// 2\) Normalize to lowercase
///
/// ```rust
/// use geolocation_core::text::fold_key;
///
/// assert_eq!(fold_key("Zürich"), "zurich");
/// assert_eq!(fold_key("São Paulo"), "sao paulo");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Compares two strings for equality after Unicode folding.
///
/// ```rust
/// use geolocation_core::text::equals_folded;
///
/// assert!(equals_folded("MÜNCHEN", "munchen"));
/// assert!(!equals_folded("Berlin", "Paris"));
/// ```
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Parses an optional string into a finite `f64`.
///
/// Trims whitespace; `None`, unparseable input, `NaN` and infinities all map
/// to `None`.
pub fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    s.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
