// crates/geolocation-core/src/city.rs
use crate::model::City;
use std::borrow::Cow;

/// What the city headers carry instead of being absent.
///
/// Seen on `x-vercel-ip-city` and `cf-ipcity`; only the city name is checked
/// for it.
pub const NULL_SENTINEL: &str = "null";

/// Raw city signals as read from the request.
///
/// `postal_code`/`metro_code`: `None` = not requested, `Some(None)` =
/// requested but the platform sent nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawCity<'a> {
    pub name: Option<&'a str>,
    pub postal_code: Option<Option<&'a str>>,
    pub metro_code: Option<Option<&'a str>>,
}

pub fn normalize(raw: RawCity<'_>) -> City {
    City {
        name: raw.name.and_then(decode_name),
        postal_code: raw.postal_code.map(|v| v.map(str::to_owned)),
        metro_code: raw.metro_code.map(|v| v.map(str::to_owned)),
    }
}

/// Percent-decodes a city name; `"null"` (after decoding) becomes `None`.
///
/// Invalid escapes never fail, the raw string is kept instead.
///
/// ```rust
/// use geolocation_core::city::decode_name;
///
/// assert_eq!(decode_name("Los%20Angeles").as_deref(), Some("Los Angeles"));
/// assert_eq!(decode_name("null"), None);
/// ```
pub fn decode_name(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    (decoded != NULL_SENTINEL).then(|| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(s: &str) -> String {
        urlencoding::encode(s).into_owned()
    }

    #[test]
    fn decodes_percent_encoding() {
        let city = normalize(RawCity {
            name: Some(&encode("Los Angeles")),
            ..Default::default()
        });
        assert_eq!(city.name.as_deref(), Some("Los Angeles"));
    }

    #[test]
    fn decodes_unicode_names() {
        let city = normalize(RawCity {
            name: Some(&encode("Zürich")),
            ..Default::default()
        });
        assert_eq!(city.name.as_deref(), Some("Zürich"));
    }

    #[test]
    fn sentinel_becomes_null() {
        let city = normalize(RawCity {
            name: Some(&encode("null")),
            ..Default::default()
        });
        assert_eq!(city.name, None);

        // the sentinel only counts after decoding and is case-sensitive
        assert_eq!(decode_name("%6Eull"), None);
        assert_eq!(decode_name("NULL").as_deref(), Some("NULL"));
    }

    #[test]
    fn malformed_encoding_falls_back_to_raw() {
        assert_eq!(decode_name("%FF").as_deref(), Some("%FF"));
        assert_eq!(decode_name("100%").as_deref(), Some("100%"));
    }

    #[test]
    fn plus_is_not_a_space() {
        assert_eq!(decode_name("San+Jose").as_deref(), Some("San+Jose"));
    }

    #[test]
    fn codes_pass_through_or_null() {
        let city = normalize(RawCity {
            name: None,
            postal_code: Some(Some("90001")),
            metro_code: Some(None),
        });
        assert_eq!(city.name, None);
        assert_eq!(city.postal_code, Some(Some("90001".to_string())));
        assert_eq!(city.metro_code, Some(None));

        let json = serde_json::to_value(&city).unwrap();
        assert_eq!(json["postalCode"], "90001");
        assert!(json["metroCode"].is_null());
        assert!(json.as_object().unwrap().contains_key("metroCode"));
    }

    #[test]
    fn unrequested_codes_are_omitted() {
        let city = normalize(RawCity {
            name: Some("Oslo"),
            ..Default::default()
        });
        let json = serde_json::to_value(&city).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("postalCode"));
        assert!(!obj.contains_key("metroCode"));
    }
}
