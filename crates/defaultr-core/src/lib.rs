//! # defaultr-core
//!
//! Non-destructive defaulting for JSON documents.
//!
//! A *defaults spec* is a JSON object mirroring the shape of the documents it
//! applies to. Every value it names that is missing (or `null`) in a document
//! is filled in; every value the document already has is left exactly as is.
//! Spec keys may be wildcards (`*`), alternatives (`a|b`), or carry the `[]`
//! suffix to declare that a value is an array.
//!
//! ## Quick start
//!
//! ```rust
//! use defaultr_core::defaultr;
//! use serde_json::json;
//!
//! let spec = json!({
//!     "RatingRange": 5,
//!     "photos[]": { "2": { "caption": "" } }
//! });
//! let doc = json!({ "Rating": 3, "photos": [{ "url": "a" }] });
//!
//! let out = defaultr(&spec, doc).unwrap();
//! assert_eq!(out, json!({
//!     "Rating": 3,
//!     "photos": [{ "url": "a" }, null, { "caption": "" }],
//!     "RatingRange": 5
//! }));
//! ```
//!
//! ## Modules
//!
//! - [`key`] — raw spec key → [`SpecKey`]; raw spec object → [`SpecNode`] tree
//! - [`order`] — application order of sibling keys (literal, OR, STAR)
//! - [`mod@defaultr`] — the recursive defaulting engine
//! - [`transform`] — operation-descriptor wrapper and the [`Transform`] trait
//! - [`error`] — Error types for malformed specs and JSON text

pub mod defaultr;
pub mod error;
pub mod key;
pub mod order;
pub mod transform;

pub use defaultr::{apply_defaults, apply_json, defaultr, Defaultr};
pub use error::DefaultrError;
pub use key::{KeyOp, Selectors, SpecKey, SpecNode, SpecSummary, SpecValue};
pub use transform::{process, Transform};
