//! The defaulting engine -- fill missing values without overwriting any.
//!
//! Where a filter walks the *document* and asks the spec what to drop,
//! Defaultr walks the *spec* and asks the document "does this exist? if not,
//! add it". Given
//!
//! ```json
//! { "Rating": 3, "SecondaryRatings": { "quality": { "Value": 3 } } }
//! ```
//!
//! and the spec
//!
//! ```json
//! {
//!   "RatingRange": 5,
//!   "SecondaryRatings": {
//!     "quality|sharpness": { "MinLabel": "Low" },
//!     "*": { "DisplayType": "NORMAL" }
//!   }
//! }
//! ```
//!
//! the document gains `RatingRange`, and `quality` gains `MinLabel` and
//! `DisplayType`. No `sharpness` entry is created: only literal keys create.
//!
//! # Algorithm
//!
//! At every spec level, keys are applied literal first, then OR, then STAR
//! (see [`crate::order`]). For each document entry a key matches:
//!
//! 1. nested spec + entry missing or null: create an empty object (or array,
//!    for `[]` keys) and recurse into it;
//! 2. nested spec + entry of the wrong kind: leave it alone, do not recurse;
//! 3. literal default + entry missing or null: write the default;
//! 4. literal default + entry present: leave it alone.
//!
//! The document is mutated in place. Callers that need the original must
//! clone it first.

use crate::error::{DefaultrError, Result};
use crate::key::{KeyOp, Selectors, SpecKey, SpecNode, SpecValue};
use serde_json::{Map, Value};

/// A parsed defaults spec, ready to be applied to any number of documents.
///
/// # Examples
///
/// ```
/// use defaultr_core::Defaultr;
/// use serde_json::json;
///
/// let defaultr = Defaultr::new(&json!({"RatingRange": 5})).unwrap();
/// let mut doc = json!({"Rating": 3});
/// defaultr.apply(&mut doc);
/// assert_eq!(doc, json!({"Rating": 3, "RatingRange": 5}));
/// ```
#[derive(Debug, Clone)]
pub struct Defaultr {
    root: SpecKey,
    spec: SpecNode,
}

impl Defaultr {
    /// Parse a spec object.
    ///
    /// # Errors
    /// Returns [`DefaultrError::SpecNotObject`] if `spec` is not a JSON object,
    /// or any key parse error from [`SpecKey::parse`].
    pub fn new(spec: &Value) -> Result<Self> {
        let map = spec
            .as_object()
            .ok_or(DefaultrError::SpecNotObject(kind_name(spec)))?;
        let spec = SpecNode::parse(map)?;
        tracing::debug!(keys = spec.len(), "parsed defaultr spec");
        Ok(Self {
            root: SpecKey::root(),
            spec,
        })
    }

    /// The parsed key tree.
    pub fn spec(&self) -> &SpecNode {
        &self.spec
    }

    /// Apply the defaults to `document` in place.
    ///
    /// A `null` document is replaced by a fresh empty container first, so
    /// `apply` on `null` behaves like `apply` on `{}`.
    pub fn apply(&self, document: &mut Value) {
        if document.is_null() {
            tracing::debug!("no document supplied, starting from an empty container");
            *document = empty_container(&self.root);
        }
        apply_spec(&self.root, &self.spec, document);
    }
}

/// Parse `spec` and apply it to `document`, returning the defaulted document.
///
/// # Examples
///
/// ```
/// use defaultr_core::defaultr;
/// use serde_json::{json, Value};
///
/// let out = defaultr(&json!({"a": {"b": 1}}), Value::Null).unwrap();
/// assert_eq!(out, json!({"a": {"b": 1}}));
/// ```
pub fn defaultr(spec: &Value, mut document: Value) -> Result<Value> {
    Defaultr::new(spec)?.apply(&mut document);
    Ok(document)
}

/// Parse `spec` and apply it to `document` in place.
///
/// On error the document is untouched: the spec is fully parsed first.
pub fn apply_defaults(spec: &Value, document: &mut Value) -> Result<()> {
    Defaultr::new(spec)?.apply(document);
    Ok(())
}

/// Apply a JSON spec to a JSON document, returning compact JSON.
///
/// Empty (or whitespace-only) input text is treated as an absent document.
///
/// # Errors
///
/// Returns an error if either text is not valid JSON or the spec is malformed.
///
/// # Examples
///
/// ```
/// use defaultr_core::apply_json;
///
/// let out = apply_json(r#"{"b":2}"#, r#"{"a":1}"#).unwrap();
/// assert_eq!(out, r#"{"a":1,"b":2}"#);
/// ```
pub fn apply_json(spec_json: &str, input_json: &str) -> Result<String> {
    let spec: Value = serde_json::from_str(spec_json)?;
    let document: Value = if input_json.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(input_json)?
    };
    let output = defaultr(&spec, document)?;
    Ok(serde_json::to_string(&output)?)
}

fn apply_spec(parent: &SpecKey, spec: &SpecNode, document: &mut Value) {
    if parent.is_array_output() {
        let len = parent.max_literal_index().and_then(|max| max.checked_add(1));
        if let (Some(len), Value::Array(items)) = (len, &mut *document) {
            if items.len() < len {
                tracing::trace!(
                    key = parent.raw(),
                    from = items.len(),
                    to = len,
                    "extending array"
                );
                items.resize(len, Value::Null);
            }
        }
    }

    for (key, sub_spec) in spec.children() {
        apply_key(key, sub_spec, document);
    }
}

fn apply_key(key: &SpecKey, sub_spec: &SpecValue, document: &mut Value) {
    match (find_matches(key, document), document) {
        (Matches::Indices(indices), Value::Array(items)) => {
            for index in indices {
                if index >= items.len() {
                    let Some(len) = index.checked_add(1) else {
                        continue;
                    };
                    items.resize(len, Value::Null);
                }
                default_entry(key, sub_spec, &mut items[index]);
            }
        }
        (Matches::Fields(fields), Value::Object(map)) => {
            for field in fields {
                default_entry(key, sub_spec, map.entry(field).or_insert(Value::Null));
            }
        }
        (_, other) => {
            tracing::trace!(
                key = key.raw(),
                found = kind_name(other),
                "no matching container, skipping key"
            );
        }
    }
}

/// Document selectors a key resolves to at one level.
enum Matches {
    Fields(Vec<String>),
    Indices(Vec<usize>),
    None,
}

fn find_matches(key: &SpecKey, document: &Value) -> Matches {
    match (key.op(), key.selectors(), document) {
        (_, _, Value::Null) => Matches::None,
        (KeyOp::Literal, Selectors::Fields(fields), _) => Matches::Fields(fields.clone()),
        (KeyOp::Literal, Selectors::Indices(indices), _) => Matches::Indices(indices.clone()),
        (KeyOp::Star, Selectors::Fields(_), Value::Object(map)) => {
            Matches::Fields(map.keys().cloned().collect())
        }
        (KeyOp::Star, Selectors::Indices(_), Value::Array(items)) => {
            Matches::Indices((0..items.len()).collect())
        }
        (KeyOp::Or, Selectors::Fields(fields), Value::Object(map)) => Matches::Fields(
            fields
                .iter()
                .filter(|field| map.contains_key(field.as_str()))
                .cloned()
                .collect(),
        ),
        (KeyOp::Or, Selectors::Indices(indices), Value::Array(items)) => Matches::Indices(
            indices
                .iter()
                .copied()
                .filter(|&index| index < items.len())
                .collect(),
        ),
        _ => Matches::None,
    }
}

/// Default a single document entry (an object field or array slot).
fn default_entry(key: &SpecKey, sub_spec: &SpecValue, entry: &mut Value) {
    match sub_spec {
        SpecValue::Node(node) => {
            if entry.is_null() {
                tracing::trace!(
                    key = key.raw(),
                    array = key.is_array_output(),
                    "creating container"
                );
                *entry = empty_container(key);
            } else if !fits_container(key, entry) {
                tracing::trace!(
                    key = key.raw(),
                    found = kind_name(entry),
                    "existing value is not a matching container, leaving it"
                );
                return;
            }
            apply_spec(key, node, entry);
        }
        SpecValue::Literal(default) => {
            if entry.is_null() {
                *entry = default.clone();
            }
        }
    }
}

fn fits_container(key: &SpecKey, value: &Value) -> bool {
    match value {
        Value::Array(_) => key.is_array_output(),
        Value::Object(_) => !key.is_array_output(),
        _ => false,
    }
}

fn empty_container(key: &SpecKey) -> Value {
    if key.is_array_output() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
