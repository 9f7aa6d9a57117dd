//! Property-based tests for URL construction.
//!
//! The URL builder must produce the same URL for the same logical request
//! regardless of parameter insertion order, drop null-valued parameters,
//! and encode values with `%20` for spaces. These properties are what make
//! request URLs reproducible and therefore cacheable.

use ebay_shopping::{CallName, Config, Params, Request};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Lower-case/underscored parameter names that cannot collide after
/// camelization.
fn param_key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{2,8}(_[a-z]{2,8}){0,2}"
}

/// Parameter values with spaces and reserved characters mixed in.
fn param_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 &=/.]{1,20}"
}

fn params_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec((param_key_strategy(), param_value_strategy()), 0..8)
}

fn build_url(params: Params) -> String {
    let config = Config::new("app123");
    Request::new(&config, CallName::FindItems, params)
        .unwrap()
        .url()
}

/// The caller-parameter fragments of a built URL.
fn param_fragments(url: &str) -> Vec<&str> {
    url.split('&')
        .skip(3) // version, appid, callname
        .collect()
}

proptest! {
    #[test]
    fn fragments_are_sorted_regardless_of_insertion_order(entries in params_strategy()) {
        let mut params = Params::new();
        for (key, value) in &entries {
            params.insert(key.clone(), json!(value));
        }
        let url = build_url(params);
        let fragments = param_fragments(&url);
        for window in fragments.windows(2) {
            prop_assert!(window[0] <= window[1], "unsorted: {} > {}", window[0], window[1]);
        }
    }

    #[test]
    fn insertion_order_never_changes_the_url(entries in params_strategy()) {
        let forward: Params = entries
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect();
        let reverse: Params = entries
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect();
        prop_assert_eq!(build_url(forward), build_url(reverse));
    }

    #[test]
    fn null_valued_parameters_never_reach_the_url(
        entries in params_strategy(),
        null_key in param_key_strategy(),
    ) {
        let mut params = Params::new();
        for (key, value) in &entries {
            params.insert(key.clone(), json!(value));
        }
        params.insert(format!("zz_{null_key}"), Value::Null);
        let url = build_url(params);
        let dropped = format!("Zz{}=", camel(&null_key));
        for fragment in param_fragments(&url) {
            prop_assert!(!fragment.starts_with(&dropped));
        }
    }

    #[test]
    fn spaces_encode_as_percent_20(value in "[a-z]{1,5} [a-z]{1,5}") {
        let url = build_url(Params::from([("query_keywords".to_string(), json!(value))]));
        prop_assert!(!url.contains('+'));
        prop_assert!(!url.contains(' '));
        prop_assert!(url.contains("%20"));
    }

    #[test]
    fn sequences_are_comma_joined_with_each_element_encoded(
        elements in proptest::collection::vec("[a-z]{1,6}( [a-z]{1,6})?", 1..5),
    ) {
        let url = build_url(Params::from([("some_array".to_string(), json!(elements))]));
        let expected: Vec<String> = elements
            .iter()
            .map(|e| urlencoding::encode(e).into_owned())
            .collect();
        let tail = format!("SomeArray={}", expected.join(","));
        prop_assert!(url.ends_with(&tail));
    }
}

/// Minimal camelization mirror for assertion building.
fn camel(name: &str) -> String {
    name.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
