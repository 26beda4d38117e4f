//! Shallow record merging.
//!
//! Field and form data flow through the crate as flat, insertion-ordered
//! string records. Defaults are applied by merging two records into a
//! fresh one, overrides winning on collision.

use indexmap::IndexMap;

/// Ordered string-to-string mapping used for field records, form
/// attributes and template substitution values.
pub type Record = IndexMap<String, String>;

/// Shallow-merge two records into a new one.
///
/// Every key of `base` is copied first, then every key of `overrides`
/// (overwriting on collision; new keys appended in `overrides` order).
/// Records are flat, so there is no deep merge: a colliding value is
/// replaced wholesale. Neither input is mutated, and an empty input
/// behaves as an empty mapping.
///
/// # Examples
///
/// ```
/// use formwright::merge::{Record, merge};
///
/// let mut base = Record::new();
/// base.insert("x".to_string(), "1".to_string());
/// base.insert("y".to_string(), "2".to_string());
///
/// let mut overrides = Record::new();
/// overrides.insert("y".to_string(), "3".to_string());
/// overrides.insert("z".to_string(), "4".to_string());
///
/// let merged = merge(&base, &overrides);
/// assert_eq!(merged.get("x").map(String::as_str), Some("1"));
/// assert_eq!(merged.get("y").map(String::as_str), Some("3"));
/// assert_eq!(merged.get("z").map(String::as_str), Some("4"));
/// ```
pub fn merge(base: &Record, overrides: &Record) -> Record {
	let mut merged = base.clone();
	for (key, value) in overrides {
		merged.insert(key.clone(), value.clone());
	}
	merged
}

/// Stringify a JSON scalar for use in a record.
///
/// Strings pass through unquoted, numbers and booleans use their JSON
/// literal form. Nulls, arrays and objects have no record representation
/// and are skipped by callers.
pub(crate) fn record_value(value: &serde_json::Value) -> Option<String> {
	match value {
		serde_json::Value::String(s) => Some(s.clone()),
		serde_json::Value::Number(n) => Some(n.to_string()),
		serde_json::Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn record(pairs: &[(&str, &str)]) -> Record {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_merge_override_and_union() {
		let base = record(&[("x", "1"), ("y", "2")]);
		let overrides = record(&[("y", "3"), ("z", "4")]);

		let merged = merge(&base, &overrides);

		assert_eq!(merged, record(&[("x", "1"), ("y", "3"), ("z", "4")]));
	}

	#[test]
	fn test_merge_does_not_mutate_inputs() {
		let base = record(&[("a", "1")]);
		let overrides = record(&[("a", "2")]);

		let merged = merge(&base, &overrides);

		assert_eq!(base.get("a").map(String::as_str), Some("1"));
		assert_eq!(overrides.get("a").map(String::as_str), Some("2"));
		assert_eq!(merged.get("a").map(String::as_str), Some("2"));
	}

	#[test]
	fn test_merge_empty_inputs() {
		let populated = record(&[("k", "v")]);
		let empty = Record::new();

		assert_eq!(merge(&empty, &populated), populated);
		assert_eq!(merge(&populated, &empty), populated);
		assert_eq!(merge(&empty, &empty), Record::new());
	}

	#[test]
	fn test_merge_preserves_base_order() {
		let base = record(&[("first", "1"), ("second", "2")]);
		let overrides = record(&[("second", "x"), ("third", "3")]);

		let merged = merge(&base, &overrides);
		let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["first", "second", "third"]);
	}

	#[test]
	fn test_record_value_scalars() {
		assert_eq!(record_value(&json!("text")), Some("text".to_string()));
		assert_eq!(record_value(&json!(42)), Some("42".to_string()));
		assert_eq!(record_value(&json!(true)), Some("true".to_string()));
		assert_eq!(record_value(&json!(null)), None);
		assert_eq!(record_value(&json!(["a"])), None);
	}
}
