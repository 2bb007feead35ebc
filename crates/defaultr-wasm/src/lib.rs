//! WASM bindings for defaultr-core.
//!
//! Exposes `apply` and `validateSpec` as `#[wasm_bindgen]` functions that can
//! be called from JavaScript/TypeScript. Documents cross the boundary as JSON
//! text.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p defaultr-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/defaultr-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/defaultr_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Apply a JSON defaults spec to a JSON document and return the result as
/// compact JSON.
///
/// An empty `input_json` is treated as "no document": the result is built
/// from the spec alone. Throws a JS error on invalid JSON or a malformed spec.
#[wasm_bindgen]
pub fn apply(spec_json: &str, input_json: &str) -> std::result::Result<String, JsValue> {
    defaultr_core::apply_json(spec_json, input_json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a JSON defaults spec without applying it.
///
/// Returns a JSON summary of the spec's shape, or throws a JS error if the
/// spec is malformed.
#[wasm_bindgen(js_name = validateSpec)]
pub fn validate_spec(spec_json: &str) -> std::result::Result<String, JsValue> {
    let spec: serde_json::Value =
        serde_json::from_str(spec_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let defaultr =
        defaultr_core::Defaultr::new(&spec).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&defaultr.spec().summary()).map_err(|e| JsValue::from_str(&e.to_string()))
}
