/// Property-based tests for the defaulting engine.
///
/// Uses `proptest` to generate random documents and specs and checks the
/// engine's contract on all of them:
///
/// - non-destruction: every non-null value present before is unchanged after
/// - idempotence: applying a spec twice equals applying it once
/// - determinism: equal inputs serialize to byte-identical outputs
/// - array extension: `[]` keys pad to the highest declared index, never truncate
///
/// Specs are built from a small key alphabet shared with the documents so
/// that literal, OR and STAR keys actually hit existing entries.
use defaultr_core::defaultr;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_field() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(str::to_string)
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-100i64..100).prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn arb_document() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((arb_field(), inner), 0..4)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// A spec key for an object level.
fn arb_object_key() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_field(),
        1 => Just("*".to_string()),
        1 => (arb_field(), arb_field())
            .prop_filter("distinct alternatives", |(a, b)| a != b)
            .prop_map(|(a, b)| format!("{a}|{b}")),
    ]
}

/// A spec key for an array level.
fn arb_index_key() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (0usize..5).prop_map(|i| i.to_string()),
        1 => Just("*".to_string()),
        1 => (0usize..5, 0usize..5).prop_map(|(a, b)| format!("{a}|{b}")),
    ]
}

fn arb_spec_level(depth: u32, in_array: bool) -> BoxedStrategy<Map<String, Value>> {
    let key = if in_array {
        arb_index_key().boxed()
    } else {
        arb_object_key().boxed()
    };
    let leaf = arb_scalar().prop_map(|v| (false, v)).boxed();
    let value = if depth == 0 {
        leaf
    } else {
        prop_oneof![
            2 => leaf,
            1 => arb_spec_level(depth - 1, false).prop_map(|m| (false, Value::Object(m))),
            1 => arb_spec_level(depth - 1, true).prop_map(|m| (true, Value::Object(m))),
        ]
        .boxed()
    };

    prop::collection::vec((key, value), 0..4)
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(key, (array_output, value))| {
                    if array_output {
                        (format!("{key}[]"), value)
                    } else {
                        (key, value)
                    }
                })
                .collect()
        })
        .boxed()
}

fn arb_spec() -> impl Strategy<Value = Value> {
    arb_spec_level(3, false).prop_map(Value::Object)
}

// ============================================================================
// Helpers
// ============================================================================

/// True if every non-null value in `before` is still present, unchanged in
/// kind, at the same path in `after`.
fn preserved(before: &Value, after: &Value) -> bool {
    match (before, after) {
        (Value::Null, _) => true,
        (Value::Object(b), Value::Object(a)) => b
            .iter()
            .all(|(k, v)| v.is_null() || a.get(k).is_some_and(|av| preserved(v, av))),
        (Value::Array(b), Value::Array(a)) => {
            a.len() >= b.len() && b.iter().zip(a).all(|(bv, av)| preserved(bv, av))
        }
        (b, a) => b == a,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn never_overwrites_existing_values(spec in arb_spec(), doc in arb_document()) {
        let out = defaultr(&spec, doc.clone()).unwrap();
        prop_assert!(preserved(&doc, &out), "before: {doc}\nafter: {out}");
    }

    #[test]
    fn is_idempotent(spec in arb_spec(), doc in arb_document()) {
        let once = defaultr(&spec, doc).unwrap();
        let twice = defaultr(&spec, once.clone()).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }

    #[test]
    fn is_deterministic(spec in arb_spec(), doc in arb_document()) {
        let a = defaultr(&spec, doc.clone()).unwrap();
        let b = defaultr(&spec, doc).unwrap();
        prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn null_document_equals_empty_object(spec in arb_spec()) {
        let from_null = defaultr(&spec, Value::Null).unwrap();
        let from_empty = defaultr(&spec, json!({})).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&from_null).unwrap(),
            serde_json::to_string(&from_empty).unwrap()
        );
    }

    #[test]
    fn array_extends_to_max_literal_index(
        len in 0usize..8,
        max in 0usize..8,
    ) {
        let spec = json!({ "items[]": { (max.to_string()): "filled" } });
        let doc = json!({ "items": vec![json!(1); len] });

        let out = defaultr(&spec, doc).unwrap();
        let items = out["items"].as_array().unwrap();

        prop_assert_eq!(items.len(), len.max(max + 1));
        prop_assert!(items.iter().take(len).all(|v| v == &json!(1)));
        if max >= len {
            prop_assert_eq!(&items[max], &json!("filled"));
            prop_assert!(items[len..max].iter().all(Value::is_null));
        }
    }
}
