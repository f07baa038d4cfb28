//! Property-based tests for parameter encoding and descriptor building.

use std::collections::BTreeMap;

use formreq_core::params::{decode, encode};
use formreq_core::{build_request, HttpMethod, ParamSet, FORM_CONTENT_TYPE};
use proptest::prelude::*;

// ============================================================================
// Test Generators
// ============================================================================

/// Arbitrary printable text, including spaces, reserved characters and
/// non-ASCII code points.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_.~-]{0,12}",
        "[ &=+%?#/]{1,6}",
        "\\PC{0,16}",
    ]
}

fn params_strategy() -> impl Strategy<Value = ParamSet> {
    prop::collection::btree_map(text_strategy(), text_strategy(), 0..8)
        .prop_map(|map: BTreeMap<String, String>| map.into_iter().collect())
}

fn base_url_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("http://localhost:3000".to_string()),
        Just("http://www.google.com".to_string()),
        "[a-z]{1,10}".prop_map(|path| format!("http://127.0.0.1:8080/{path}")),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn decode_inverts_encode(params in params_strategy()) {
        let encoded = encode(&params).unwrap();
        prop_assert_eq!(decode(&encoded).unwrap(), params);
    }

    #[test]
    fn encoding_is_deterministic(params in params_strategy()) {
        let rebuilt: ParamSet = params
            .iter()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        prop_assert_eq!(encode(&params).unwrap(), encode(&rebuilt).unwrap());
    }

    #[test]
    fn encoded_form_has_no_raw_whitespace(params in params_strategy()) {
        let encoded = encode(&params).unwrap();
        prop_assert!(!encoded.contains(' '));
        prop_assert!(!encoded.contains('\n'));
    }

    #[test]
    fn get_url_is_base_plus_query(base in base_url_strategy(), params in params_strategy()) {
        let encoded = encode(&params).unwrap();
        let request = build_request(HttpMethod::Get, &base, &encoded);

        if encoded.is_empty() {
            prop_assert_eq!(request.url, base);
        } else {
            prop_assert_eq!(request.url, format!("{base}?{encoded}"));
        }
        prop_assert!(request.body.is_none());
    }

    #[test]
    fn post_body_is_encoded_params(base in base_url_strategy(), params in params_strategy()) {
        let encoded = encode(&params).unwrap();
        let request = build_request(HttpMethod::Post, &base, &encoded);

        prop_assert_eq!(&request.url, &base);
        prop_assert!(!request.url.contains('?'));
        prop_assert_eq!(request.body_str(), Some(encoded.as_str()));
        prop_assert!(request
            .headers
            .iter()
            .any(|(name, value)| name == "content-type" && value == FORM_CONTENT_TYPE));
    }
}
