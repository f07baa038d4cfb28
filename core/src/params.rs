//! Request parameters and their `application/x-www-form-urlencoded` form.
//!
//! # Design
//! `ParamSet` is a string-to-string map backed by a `BTreeMap`, so encoding
//! a given set always yields the same string regardless of the order in which
//! fields were inserted. `encode` and `decode` are inverse operations: keys
//! and values are percent-encoded as UTF-8, pairs are joined with `&`, and
//! `decode` also accepts `+` for a space.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RequestError;

/// Key/value fields sent with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    fields: BTreeMap<String, String>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value for `key` if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build a parameter set from the members of a JSON object.
    ///
    /// Strings are taken verbatim, `null` becomes an empty string and every
    /// other value uses its compact JSON text.
    pub fn from_json(value: &Value) -> Result<Self, RequestError> {
        let object = value.as_object().ok_or_else(|| {
            RequestError::Encoding(format!("parameters must be a JSON object, got {value}"))
        })?;

        Ok(object
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect())
    }

    pub fn from_json_str(json: &str) -> Result<Self, RequestError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| RequestError::Encoding(e.to_string()))?;
        Self::from_json(&value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for ParamSet {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Form-encode `params` as `k1=v1&k2=v2`. An empty set encodes to `""`.
///
/// Fields are already UTF-8 strings, so this currently never returns `Err`.
pub fn encode(params: &ParamSet) -> Result<String, RequestError> {
    let mut out = String::new();
    for (key, value) in params.iter() {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&urlencoding::encode(key));
        out.push('=');
        out.push_str(&urlencoding::encode(value));
    }
    Ok(out)
}

/// Parse a form-encoded string back into a `ParamSet`.
///
/// Empty segments are skipped and a segment without `=` yields an empty
/// value. When a key repeats, the last occurrence wins.
pub fn decode(encoded: &str) -> Result<ParamSet, RequestError> {
    let mut params = ParamSet::new();
    for segment in encoded.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
        params.insert(decode_component(key)?, decode_component(value)?);
    }
    Ok(params)
}

fn decode_component(component: &str) -> Result<String, RequestError> {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|cow| cow.into_owned())
        .map_err(|e| RequestError::Encoding(format!("{component:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_set_encodes_to_empty_string() {
        assert_eq!(encode(&ParamSet::new()).unwrap(), "");
    }

    #[test]
    fn space_is_never_left_raw() {
        let encoded = encode(&ParamSet::from([("q", "a b")])).unwrap();
        assert!(encoded == "q=a%20b" || encoded == "q=a+b", "{encoded}");
        assert!(!encoded.contains(' '));
    }

    #[test]
    fn pairs_are_sorted_and_joined() {
        let params = ParamSet::from([("q", "teste"), ("hl", "pt-BR"), ("output", "search")]);
        assert_eq!(
            encode(&params).unwrap(),
            "hl=pt-BR&output=search&q=teste"
        );
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let params = ParamSet::from([("a&b", "c=d"), ("plus", "1+1")]);
        let encoded = encode(&params).unwrap();
        assert_eq!(encoded, "a%26b=c%3Dd&plus=1%2B1");
        assert_eq!(decode(&encoded).unwrap(), params);
    }

    #[test]
    fn non_ascii_is_utf8_percent_encoded() {
        let params = ParamSet::from([("cidade", "São Paulo")]);
        let encoded = encode(&params).unwrap();
        assert_eq!(encoded, "cidade=S%C3%A3o%20Paulo");
        assert_eq!(decode(&encoded).unwrap(), params);
    }

    #[test]
    fn empty_key_survives_round_trip() {
        let params = ParamSet::from([("", "orphan")]);
        let encoded = encode(&params).unwrap();
        assert_eq!(encoded, "=orphan");
        assert_eq!(decode(&encoded).unwrap(), params);
    }

    #[test]
    fn decode_accepts_plus_and_bare_keys() {
        let params = decode("q=a+b&&flag").unwrap();
        assert_eq!(params.get("q"), Some("a b"));
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let err = decode("k=%FF%FE").unwrap_err();
        assert!(matches!(err, RequestError::Encoding(_)));
    }

    #[test]
    fn from_json_stringifies_scalars() {
        let params = ParamSet::from_json(&json!({
            "hl": "pt-BR",
            "page": 2,
            "safe": true,
            "cursor": null
        }))
        .unwrap();
        assert_eq!(params.get("hl"), Some("pt-BR"));
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("safe"), Some("true"));
        assert_eq!(params.get("cursor"), Some(""));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        let err = ParamSet::from_json(&json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, RequestError::Encoding(_)));

        let err = ParamSet::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, RequestError::Encoding(_)));
    }

    #[test]
    fn insert_replaces_existing_value() {
        let mut params = ParamSet::new();
        assert_eq!(params.insert("k", "1"), None);
        assert_eq!(params.insert("k", "2"), Some("1".to_string()));
        assert_eq!(params.get("k"), Some("2"));
    }
}
