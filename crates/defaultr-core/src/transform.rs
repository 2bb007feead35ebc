//! Pipeline-facing entry points.
//!
//! A transform pipeline describes each stage with an operation descriptor
//! such as `{"operation": "default", "spec": {...}}`. Only the `spec` field is
//! read here; running the rest of a pipeline is up to the caller.

use crate::defaultr::Defaultr;
use crate::error::{DefaultrError, Result};
use serde_json::Value;

/// A document-to-document transform stage.
pub trait Transform {
    fn transform(&self, input: Value) -> Result<Value>;
}

impl Transform for Defaultr {
    fn transform(&self, mut input: Value) -> Result<Value> {
        self.apply(&mut input);
        Ok(input)
    }
}

impl Defaultr {
    /// Build a `Defaultr` from an operation descriptor's `spec` field.
    ///
    /// # Errors
    /// Returns [`DefaultrError::MissingSpec`] if `operation` has no `spec`
    /// (or a `null` one), otherwise any spec parse error.
    pub fn from_operation(operation: &Value) -> Result<Self> {
        match operation.get("spec") {
            Some(spec) if !spec.is_null() => Defaultr::new(spec),
            _ => Err(DefaultrError::MissingSpec(operation.to_string())),
        }
    }
}

/// Apply the defaults described by `operation` to `input`.
///
/// # Examples
///
/// ```
/// use defaultr_core::process;
/// use serde_json::json;
///
/// let op = json!({"operation": "default", "spec": {"b": 2}});
/// let out = process(json!({"a": 1}), &op).unwrap();
/// assert_eq!(out, json!({"a": 1, "b": 2}));
///
/// assert!(process(json!({}), &json!({"operation": "default"})).is_err());
/// ```
pub fn process(input: Value, operation: &Value) -> Result<Value> {
    Defaultr::from_operation(operation)?.transform(input)
}
