//! Spec keys -- the typed form of a raw defaults-spec key.
//!
//! A defaults spec is a JSON object whose keys are not plain field names but
//! small selector expressions:
//!
//! - `"name"` -- literal: the field `name` (or index, under an array key)
//! - `"a|b"` -- OR: whichever of `a` / `b` already exist in the document
//! - `"*"` -- STAR: every entry currently present at this level
//! - `"photos[]"` -- array output: the value under `photos` is an array, and
//!   every key one level down must be an integer index (or `*` / `1|3`)
//!
//! The whole spec is parsed into a [`SpecNode`] tree once, up front, so that
//! malformed keys are reported before any document is touched.

use crate::error::{DefaultrError, Result};
use crate::order;
use serde::Serialize;
use serde_json::{Map, Value};

/// Wildcard key matching every present entry.
pub const STAR: &str = "*";
/// Delimiter separating the alternatives of an OR key.
pub const OR: char = '|';
/// Suffix marking a key whose value is materialized as an array.
pub const ARRAY: &str = "[]";
/// Largest array index a spec key may name. Arrays are padded up to the
/// highest declared index, so this also caps how far a spec can grow one.
pub const MAX_INDEX: usize = u16::MAX as usize;

/// Operator of a spec key. Declaration order is application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyOp {
    Literal,
    Or,
    Star,
}

/// Candidate selectors a key denotes.
///
/// Keys below an array-output key select indices; every other key selects
/// object fields. A STAR key carries an empty list of the right flavour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selectors {
    Fields(Vec<String>),
    Indices(Vec<usize>),
}

/// A parsed spec key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecKey {
    raw: String,
    op: KeyOp,
    selectors: Selectors,
    array_output: bool,
    max_literal_index: Option<usize>,
}

impl SpecKey {
    /// Parse one raw key.
    ///
    /// `in_array` is true when the enclosing spec object hangs off an
    /// array-output key; the key's tokens must then be integer indices.
    ///
    /// # Errors
    /// - [`DefaultrError::NonIntegerArrayKey`] for a non-integer token in array context.
    /// - [`DefaultrError::IndexTooLarge`] for an index above [`MAX_INDEX`].
    /// - [`DefaultrError::InvalidOrKey`] for an OR key with an empty alternative.
    pub fn parse(raw: &str, in_array: bool) -> Result<Self> {
        let (name, array_output) = match raw.strip_suffix(ARRAY) {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };

        let (op, tokens): (KeyOp, Vec<&str>) = if name == STAR {
            (KeyOp::Star, Vec::new())
        } else if name.contains(OR) {
            let mut tokens: Vec<&str> = Vec::new();
            for token in name.split(OR) {
                if token.is_empty() {
                    return Err(DefaultrError::InvalidOrKey(raw.to_string()));
                }
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
            (KeyOp::Or, tokens)
        } else {
            (KeyOp::Literal, vec![name])
        };

        let selectors = if in_array {
            let indices = tokens
                .iter()
                .map(|token| parse_index(raw, token))
                .collect::<Result<Vec<_>>>()?;
            Selectors::Indices(indices)
        } else {
            Selectors::Fields(tokens.into_iter().map(str::to_string).collect())
        };

        Ok(Self {
            raw: raw.to_string(),
            op,
            selectors,
            array_output,
            max_literal_index: None,
        })
    }

    /// The synthetic key the top level of a spec hangs off.
    pub(crate) fn root() -> Self {
        Self {
            raw: "root".to_string(),
            op: KeyOp::Literal,
            selectors: Selectors::Fields(Vec::new()),
            array_output: false,
            max_literal_index: None,
        }
    }

    /// The key exactly as written in the spec, `[]` suffix included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn op(&self) -> KeyOp {
        self.op
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    /// True if this key selects array indices rather than object fields.
    pub fn is_array_key(&self) -> bool {
        matches!(self.selectors, Selectors::Indices(_))
    }

    /// True if the value under this key is materialized as an array.
    pub fn is_array_output(&self) -> bool {
        self.array_output
    }

    /// Highest index declared directly below this array-output key, by a
    /// literal key or any alternative of an OR key.
    ///
    /// Arrays reached through this key are padded with nulls up to this
    /// index before any child key is applied. `None` when the key is not an
    /// array-output key or only has STAR children.
    pub fn max_literal_index(&self) -> Option<usize> {
        self.max_literal_index
    }
}

fn parse_index(raw: &str, token: &str) -> Result<usize> {
    let too_large = || DefaultrError::IndexTooLarge {
        key: raw.to_string(),
        token: token.to_string(),
        max: MAX_INDEX,
    };
    match token.parse::<usize>() {
        Ok(index) if index <= MAX_INDEX => Ok(index),
        Ok(_) => Err(too_large()),
        // Digits that overflow usize are still an index, just an absurd one.
        Err(_) if token.bytes().all(|b| b.is_ascii_digit()) => Err(too_large()),
        Err(_) => Err(DefaultrError::NonIntegerArrayKey {
            key: raw.to_string(),
            token: token.to_string(),
        }),
    }
}

/// The value below a spec key: either a nested spec level or a default.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecValue {
    Node(SpecNode),
    Literal(Value),
}

/// One level of a parsed spec, children stored in application order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecNode {
    children: Vec<(SpecKey, SpecValue)>,
}

impl SpecNode {
    /// Parse a raw spec object into a key tree.
    pub fn parse(spec: &Map<String, Value>) -> Result<Self> {
        Self::parse_level(spec, false)
    }

    fn parse_level(spec: &Map<String, Value>, in_array: bool) -> Result<Self> {
        let mut children = Vec::with_capacity(spec.len());

        for (raw, sub_spec) in spec {
            let mut key = SpecKey::parse(raw, in_array)?;
            let value = match sub_spec {
                Value::Object(map) => {
                    let node = Self::parse_level(map, key.array_output)?;
                    if key.array_output {
                        key.max_literal_index = node.max_literal_index();
                    }
                    SpecValue::Node(node)
                }
                literal => SpecValue::Literal(literal.clone()),
            };
            children.push((key, value));
        }

        children.sort_by(|(a, _), (b, _)| order::compare(a, b));
        Ok(Self { children })
    }

    // Every index named by a literal or OR child; STAR names none.
    fn max_literal_index(&self) -> Option<usize> {
        self.children
            .iter()
            .filter_map(|(key, _)| match &key.selectors {
                Selectors::Indices(indices) => indices.iter().copied().max(),
                Selectors::Fields(_) => None,
            })
            .max()
    }

    /// Child keys and their values, literals first, then OR, then STAR.
    pub fn children(&self) -> &[(SpecKey, SpecValue)] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Count keys and defaults across the whole tree.
    pub fn summary(&self) -> SpecSummary {
        let mut summary = SpecSummary::default();
        self.accumulate(1, &mut summary);
        summary
    }

    fn accumulate(&self, depth: usize, summary: &mut SpecSummary) {
        summary.depth = summary.depth.max(depth);
        for (key, value) in &self.children {
            match key.op {
                KeyOp::Literal => summary.literal_keys += 1,
                KeyOp::Or => summary.or_keys += 1,
                KeyOp::Star => summary.star_keys += 1,
            }
            if key.array_output {
                summary.array_outputs += 1;
            }
            match value {
                SpecValue::Node(node) => node.accumulate(depth + 1, summary),
                SpecValue::Literal(_) => summary.defaults += 1,
            }
        }
    }
}

/// Shape statistics of a parsed spec, reported by `defaultr check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpecSummary {
    pub literal_keys: usize,
    pub or_keys: usize,
    pub star_keys: usize,
    pub array_outputs: usize,
    /// Number of literal default values (leaves).
    pub defaults: usize,
    /// Nesting depth of spec objects; a flat spec has depth 1.
    pub depth: usize,
}
