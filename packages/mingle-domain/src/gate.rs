use serde_json::{Map, Value};

pub const NO_MATCH: &str = "$noMatch";
pub const AMBIGUOUS: &str = "$ambiguous";
pub const LOOKUP_FROM: &str = "$lookupFrom";

/// The decoded form of a translated query. Sentinel markers from the
/// translator are control-flow signals, so they are lifted into a tagged
/// variant here; downstream code never inspects raw sentinel keys.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
	/// An executable filter. The empty filter deliberately means "match every
	/// document in the target collection".
	Filter(Map<String, Value>),
	/// The translator decided nothing can match. Execution is skipped.
	NoMatch,
	/// The request was ambiguous; candidate filters are returned to the
	/// caller for disambiguation. A terminal state, not an error.
	Ambiguous(Vec<Value>),
	/// The result should be derived by querying a secondary collection first
	/// and projecting the identity references out of its matches.
	Redirect { collection: String, criteria: Map<String, Value> },
}

/// Decodes a raw translated query. Anything that is not a well-formed filter
/// object or a well-formed sentinel decodes to `NoMatch`; a malformed
/// sentinel must not leak into execution as an ordinary filter.
pub fn decode(raw: &Value) -> Outcome {
	let Some(obj) = raw.as_object() else {
		return Outcome::NoMatch;
	};

	// Any spelling of the sentinel key marks the query as non-executable;
	// `{"$noMatch": false}` must not fall through to the store as a filter.
	if obj.contains_key(NO_MATCH) {
		return Outcome::NoMatch;
	}
	if let Some(alternatives) = obj.get(AMBIGUOUS) {
		return match alternatives.as_array() {
			Some(alts) => Outcome::Ambiguous(alts.clone()),
			None => Outcome::NoMatch,
		};
	}
	if let Some(redirect) = obj.get(LOOKUP_FROM) {
		let collection = redirect.get("collection").and_then(Value::as_str);
		let criteria = redirect.get("filter").and_then(Value::as_object);

		return match (collection, criteria) {
			(Some(collection), Some(criteria)) => Outcome::Redirect {
				collection: collection.to_string(),
				criteria: criteria.clone(),
			},
			_ => Outcome::NoMatch,
		};
	}

	Outcome::Filter(obj.clone())
}

/// The sentinel substituted when the translator fails or returns something
/// unparseable.
pub fn no_match_sentinel() -> Value {
	serde_json::json!({ NO_MATCH: true })
}

/// Effective page size: absent or non-positive requests fall back to
/// `default`, and the result never exceeds `ceiling`.
pub fn clamp_limit(requested: Option<i64>, default: u32, ceiling: u32) -> usize {
	let requested = requested.filter(|n| *n > 0).map_or(u64::from(default), |n| n as u64);

	requested.min(u64::from(ceiling)) as usize
}
