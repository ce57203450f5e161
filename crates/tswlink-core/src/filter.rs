// ── Response filtering ──
//
// Strips sensitive subtrees from a fetched state tree before it is cached.
// Exclusion is by key name at any depth, including inside arrays.

use serde_json::{Map, Value};

/// Keys removed from every fetched state tree: the certificate store and the
/// 802.1X network-auth block.
pub const EXCLUDED_KEYS: &[&str] = &["CertificateStore", "Ieee8021x"];

/// Rebuild `tree` without any object entry whose key is in `excluded`.
///
/// The input is left untouched.
pub fn filter<S: AsRef<str>>(tree: &Value, excluded: &[S]) -> Value {
    match tree {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !is_excluded(key, excluded))
                .map(|(key, value)| (key.clone(), filter(value, excluded)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| filter(v, excluded)).collect()),
        leaf => leaf.clone(),
    }
}

fn is_excluded<S: AsRef<str>>(key: &str, excluded: &[S]) -> bool {
    excluded.iter().any(|k| k.as_ref() == key)
}

/// Returns `true` if any object at any depth of `tree` has one of `keys`.
pub fn contains_any_key<S: AsRef<str>>(tree: &Value, keys: &[S]) -> bool {
    match tree {
        Value::Object(map) => map
            .iter()
            .any(|(key, value)| is_excluded(key, keys) || contains_any_key(value, keys)),
        Value::Array(items) => items.iter().any(|v| contains_any_key(v, keys)),
        _ => false,
    }
}
