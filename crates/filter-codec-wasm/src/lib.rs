//! WASM bindings for filter-codec.
//!
//! The results table calls these from its URL handling code: `serialize`
//! whenever the active filters change, `deserialize` when the page loads or
//! the location hash changes. Predicates, table records and the value domain
//! cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p filter-codec-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir react-table/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/filter_codec_wasm.wasm
//! ```

use filter_codec::{FilterPredicate, StaticDomain, TableFilter};
use wasm_bindgen::prelude::*;

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_domain(domain_json: &str) -> Result<StaticDomain, JsValue> {
    StaticDomain::from_json(domain_json).map_err(to_js)
}

/// Encode a JSON array of predicates into a filter string.
///
/// Throws a JS error if either JSON argument is invalid.
#[wasm_bindgen]
pub fn serialize(predicates_json: &str, domain_json: &str) -> Result<String, JsValue> {
    let domain = parse_domain(domain_json)?;
    let predicates: Vec<FilterPredicate> = serde_json::from_str(predicates_json).map_err(to_js)?;
    Ok(filter_codec::serialize(&predicates, &domain))
}

/// Decode a filter string into a JSON array of predicates.
///
/// Throws a JS error if the filter string is malformed.
#[wasm_bindgen]
pub fn deserialize(text: &str, domain_json: &str) -> Result<String, JsValue> {
    let domain = parse_domain(domain_json)?;
    let predicates = filter_codec::deserialize(text, &domain).map_err(to_js)?;
    serde_json::to_string(&predicates).map_err(to_js)
}

/// Encode a JSON array of table `{id, value}` records into a filter string.
#[wasm_bindgen(js_name = serializeTableFilters)]
pub fn serialize_table_filters(records_json: &str, domain_json: &str) -> Result<String, JsValue> {
    let domain = parse_domain(domain_json)?;
    let records: Vec<TableFilter> = serde_json::from_str(records_json).map_err(to_js)?;
    filter_codec::serialize_table_filters(&records, &domain).map_err(to_js)
}

/// Decode a filter string into a JSON array of table `{id, value}` records.
#[wasm_bindgen(js_name = deserializeTableFilters)]
pub fn deserialize_table_filters(text: &str, domain_json: &str) -> Result<String, JsValue> {
    let domain = parse_domain(domain_json)?;
    let records = filter_codec::deserialize_table_filters(text, &domain).map_err(to_js)?;
    serde_json::to_string(&records).map_err(to_js)
}
