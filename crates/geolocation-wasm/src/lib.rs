//! geolocation-wasm — WebAssembly bindings for geolocation-core
//!
//! Exposes the synchronous part of the resolver to JavaScript, with the
//! country and airport datasets embedded in the WASM binary. Edge runtimes
//! (Workers, Vercel Edge) can hand their request headers straight to
//! [`geolocate`].
//!
//! What it provides
//! ----------------
//! - Automatic initialization on module load (via `#[wasm_bindgen(start)]`)
//! - Basic queries: `get_country_count()`, `get_country_name(alpha2)`, `get_stats()`
//! - Lookups returning JSON-compatible objects:
//!   - `resolve_country("alpha3=DEU")`
//!   - `nearest_airport(34.05, -118.24)`
//!   - `search_airports("zurich")`
//!   - `classify_ip("2001:db8::1")`, `normalize_city("Z%C3%BCrich")`
//! - `geolocate(headers, "headers")`: the full record, or throws the
//!   `COUNTRY_NOT_FOUND` error body
//!
//! Quick start
//! -----------
//! ```javascript
//! import init, { geolocate } from 'geolocation-wasm';
//!
//! export default {
//!   async fetch(request) {
//!     await init();
//!     const query = new URL(request.url).search;
//!     try {
//!       return Response.json(geolocate(Object.fromEntries(request.headers), query));
//!     } catch (body) {
//!       return Response.json(body, { status: 404 });
//!     }
//!   }
//! };
//! ```
//!
//! Notes
//! -----
//! - ASN enrichment is not available here; `asn` in the query is ignored.
//! - The datasets are compiled in; rebuild the crate after changing them.

use std::collections::BTreeMap;
use std::result::Result;
use std::sync::OnceLock;
use wasm_bindgen::prelude::*;

use geolocation_core::prelude::*;
use geolocation_core::{city, ip};
use serde::Serialize;
use serde_json::json;

// 1. Embed the datasets
static COUNTRIES_JSON: &str = include_str!("../../geolocation-core/data/countries.json");
static AIRPORTS_JSON: &str = include_str!("../../geolocation-core/data/airports.json");

// 2. Static instance
static DB: OnceLock<Datasets> = OnceLock::new();

fn db() -> &'static Datasets {
    DB.get_or_init(|| {
        Datasets::from_json_str(COUNTRIES_JSON, AIRPORTS_JSON)
            .expect("embedded datasets are valid")
    })
}

/// Plain objects rather than JS `Map`s, so records look like `JSON.parse` output.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing geolocation WASM module...".into());

    let stats = db().stats();
    web_sys::console::log_1(
        &format!(
            "✓ Loaded {} countries, {} airports",
            stats.countries, stats.airports
        )
        .into(),
    );
}

/* --------------------------------------------------------------------------
   Basic Queries
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn get_country_count() -> usize {
    db().countries.len()
}

#[wasm_bindgen]
pub fn get_country_name(alpha2: &str) -> Option<String> {
    db().countries.by_alpha2(alpha2).map(|c| c.name().to_string())
}

#[wasm_bindgen]
pub fn get_stats() -> Result<JsValue, JsValue> {
    let stats = db().stats();
    to_js(&json!({
        "countries": stats.countries,
        "airports": stats.airports
    }))
}

/* --------------------------------------------------------------------------
   Countries
-------------------------------------------------------------------------- */

/// Answers a `/countries` query string: the whole list, one country or `null`.
#[wasm_bindgen]
pub fn resolve_country(query: &str) -> Result<JsValue, JsValue> {
    let query = CountryQuery::from_query(query);
    to_js(&db().countries.query(&query))
}

/* --------------------------------------------------------------------------
   Airports
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn nearest_airport(latitude: f64, longitude: f64) -> Result<JsValue, JsValue> {
    let coordinates = Coordinates::new(Some(latitude), Some(longitude));
    to_js(&db().airports.nearest(&coordinates))
}

#[wasm_bindgen]
pub fn search_airports(substr: &str) -> Result<JsValue, JsValue> {
    let array = js_sys::Array::new();
    for airport in db().airports.search_by_name(substr) {
        array.push(&to_js(airport)?);
    }
    Ok(array.into())
}

/* --------------------------------------------------------------------------
   Normalizers
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn classify_ip(address: Option<String>) -> Result<JsValue, JsValue> {
    to_js(&ip::classify(address.as_deref()))
}

#[wasm_bindgen]
pub fn normalize_city(name: &str) -> Option<String> {
    city::decode_name(name)
}

/* --------------------------------------------------------------------------
   Full record
-------------------------------------------------------------------------- */

/// Builds the geolocation record from a plain `{ name: value }` header object.
///
/// Throws the `{ error, message, code }` body when the country is unknown.
#[wasm_bindgen]
pub fn geolocate(headers: JsValue, query: &str) -> Result<JsValue, JsValue> {
    let headers: BTreeMap<String, String> = serde_wasm_bindgen::from_value(headers)?;
    let signals = EdgeSignals::from_pairs(headers);
    let options = EnrichOptions::from_query(query);

    let assembler = Assembler::new(db(), ResolverConfig::default());
    match assembler.assemble_base(&signals, options) {
        Ok(record) => to_js(&record),
        Err(e) => {
            web_sys::console::error_1(&e.to_string().into());
            Err(to_js(&e.to_error_body())?)
        }
    }
}
