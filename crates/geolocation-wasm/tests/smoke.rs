use wasm_bindgen_test::*;

// Import the wasm functions from this crate
use geolocation_wasm::{get_country_count, get_country_name, normalize_city};

#[wasm_bindgen_test]
fn can_get_country_count() {
    #[cfg(target_arch = "wasm32")]
    geolocation_wasm::start();

    let count = get_country_count();
    assert!(count > 0, "expected at least one country, got {count}");
}

#[wasm_bindgen_test]
fn can_lookup_country_name() {
    #[cfg(target_arch = "wasm32")]
    geolocation_wasm::start();

    assert_eq!(get_country_name("us").as_deref(), Some("United States"));
    assert!(get_country_name("ZZ").is_none());
}

#[wasm_bindgen_test]
fn city_sentinel_is_dropped() {
    assert_eq!(normalize_city("S%C3%A3o%20Paulo").as_deref(), Some("São Paulo"));
    assert_eq!(normalize_city("null"), None);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen_test]
fn geolocate_builds_a_record() {
    use wasm_bindgen::JsValue;

    let headers = js_sys::Object::new();
    for (name, value) in [
        ("cf-ipcountry", "JP"),
        ("cf-iplatitude", "35.6762"),
        ("cf-iplongitude", "139.6503"),
    ] {
        js_sys::Reflect::set(&headers, &name.into(), &value.into()).unwrap();
    }

    let record = geolocation_wasm::geolocate(headers.into(), "").unwrap();
    let airport = js_sys::Reflect::get(&record, &"airport".into()).unwrap();
    let iata = js_sys::Reflect::get(&airport, &"iata".into()).unwrap();
    assert_eq!(iata, JsValue::from_str("HND"));

    let missing = js_sys::Object::new();
    assert!(geolocation_wasm::geolocate(missing.into(), "").is_err());
}
