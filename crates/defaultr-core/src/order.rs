//! Application order of sibling spec keys.
//!
//! Literal keys are the only keys allowed to create document entries, so they
//! run first; OR and STAR keys then see every entry the literals added.

use crate::key::{Selectors, SpecKey};
use std::cmp::Ordering;

/// Total order over spec keys at one level.
///
/// 1. `Literal` < `Or` < `Star`.
/// 2. Within an operator group, index keys compare numerically and field
///    keys compare by their raw text.
/// 3. Remaining ties (e.g. `"2"` vs `"2[]"`) fall back to the raw text.
pub fn compare(a: &SpecKey, b: &SpecKey) -> Ordering {
    a.op()
        .cmp(&b.op())
        .then_with(|| match (a.selectors(), b.selectors()) {
            (Selectors::Indices(x), Selectors::Indices(y)) => x.cmp(y),
            _ => Ordering::Equal,
        })
        .then_with(|| a.raw().cmp(b.raw()))
}
