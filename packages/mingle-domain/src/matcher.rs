use std::cmp::Ordering;

use regex::RegexBuilder;
use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

const MAX_FILTER_DEPTH: usize = 8;
const MAX_IN_LIST_ITEMS: usize = 256;
const MAX_REGEX_SIZE: usize = 1 << 16;

/// Evaluates a Mongo-style filter subset against one document. Filters come
/// from an untrusted translator, so the evaluator is total: malformed
/// operator shapes, unknown operators, over-deep nesting, and oversized `$in`
/// lists all match nothing instead of erroring.
///
/// Supported: top-level `$or`/`$and`, per-field equality, `$eq`, `$ne`,
/// `$in`, `$nin`, `$gt`, `$gte`, `$lt`, `$lte`, `$exists`, `$regex` with
/// `$options: "i"`, and dotted field paths. Array-valued fields match by
/// containment, as the store does.
pub fn matches(filter: &Map<String, Value>, doc: &Map<String, Value>) -> bool {
	matches_at(filter, doc, 0)
}

fn matches_at(filter: &Map<String, Value>, doc: &Map<String, Value>, depth: usize) -> bool {
	if depth > MAX_FILTER_DEPTH {
		return false;
	}

	// The empty filter matches every document.
	filter.iter().all(|(key, cond)| match key.as_str() {
		"$or" => cond
			.as_array()
			.is_some_and(|alts| alts.iter().any(|alt| branch_matches(alt, doc, depth))),
		"$and" => cond
			.as_array()
			.is_some_and(|alts| alts.iter().all(|alt| branch_matches(alt, doc, depth))),
		_ => field_matches(key, cond, doc, depth),
	})
}

fn branch_matches(branch: &Value, doc: &Map<String, Value>, depth: usize) -> bool {
	branch.as_object().is_some_and(|inner| matches_at(inner, doc, depth + 1))
}

fn field_matches(path: &str, cond: &Value, doc: &Map<String, Value>, depth: usize) -> bool {
	let actual = lookup(doc, path);

	match cond {
		Value::Object(ops) if ops.keys().any(|key| key.starts_with('$')) => {
			let options = ops.get("$options").and_then(Value::as_str).unwrap_or("");

			ops.iter()
				.filter(|(op, _)| op.as_str() != "$options")
				.all(|(op, arg)| op_matches(op, arg, actual, options, depth))
		},
		expected => eq_matches(expected, actual),
	}
}

fn op_matches(op: &str, arg: &Value, actual: Option<&Value>, options: &str, _depth: usize) -> bool {
	match op {
		"$eq" => eq_matches(arg, actual),
		"$ne" => !eq_matches(arg, actual),
		"$in" => in_list(arg).is_some_and(|list| list.iter().any(|item| eq_matches(item, actual))),
		"$nin" => in_list(arg).is_some_and(|list| !list.iter().any(|item| eq_matches(item, actual))),
		"$exists" => {
			let wanted = arg.as_bool().unwrap_or(true);

			actual.is_some() == wanted
		},
		"$gt" => compare(actual, arg).is_some_and(|ord| ord == Ordering::Greater),
		"$gte" => compare(actual, arg).is_some_and(|ord| ord != Ordering::Less),
		"$lt" => compare(actual, arg).is_some_and(|ord| ord == Ordering::Less),
		"$lte" => compare(actual, arg).is_some_and(|ord| ord != Ordering::Greater),
		"$regex" => arg.as_str().is_some_and(|pattern| regex_matches(pattern, options, actual)),
		// Unknown operators from the translator match nothing.
		_ => false,
	}
}

fn in_list(arg: &Value) -> Option<&Vec<Value>> {
	arg.as_array().filter(|list| list.len() <= MAX_IN_LIST_ITEMS)
}

fn eq_matches(expected: &Value, actual: Option<&Value>) -> bool {
	match actual {
		None => expected.is_null(),
		Some(Value::Array(items)) if !expected.is_array() =>
			items.iter().any(|item| value_eq(expected, item)),
		Some(actual) => value_eq(expected, actual),
	}
}

fn value_eq(a: &Value, b: &Value) -> bool {
	match (a.as_f64(), b.as_f64()) {
		(Some(a), Some(b)) => a == b,
		_ => a == b,
	}
}

fn compare(actual: Option<&Value>, arg: &Value) -> Option<Ordering> {
	let actual = actual?;

	if let (Some(a), Some(b)) = (actual.as_f64(), arg.as_f64()) {
		return a.partial_cmp(&b);
	}

	let (a, b) = (actual.as_str()?, arg.as_str()?);

	match (parse_datetime(a), parse_datetime(b)) {
		(Some(a), Some(b)) => Some(a.cmp(&b)),
		_ => Some(a.cmp(b)),
	}
}

fn parse_datetime(raw: &str) -> Option<OffsetDateTime> {
	OffsetDateTime::parse(raw, &Rfc3339).ok()
}

fn regex_matches(pattern: &str, options: &str, actual: Option<&Value>) -> bool {
	let Ok(re) = RegexBuilder::new(pattern)
		.case_insensitive(options.contains('i'))
		.size_limit(MAX_REGEX_SIZE)
		.build()
	else {
		return false;
	};

	match actual {
		Some(Value::String(text)) => re.is_match(text),
		Some(Value::Array(items)) =>
			items.iter().filter_map(Value::as_str).any(|text| re.is_match(text)),
		_ => false,
	}
}

fn lookup<'a>(doc: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
	let mut segments = path.split('.');
	let mut current = doc.get(segments.next()?)?;

	for segment in segments {
		current = current.as_object()?.get(segment)?;
	}

	Some(current)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn doc(raw: Value) -> Map<String, Value> {
		raw.as_object().expect("doc fixture is an object").clone()
	}

	fn filter(raw: Value) -> Map<String, Value> {
		raw.as_object().expect("filter fixture is an object").clone()
	}

	fn user() -> Map<String, Value> {
		doc(serde_json::json!({
			"_id": "u1",
			"name": "Asha Rao",
			"gender": "female",
			"location": "Bengaluru",
			"salary": 180_000,
			"dateOfBirth": "1992-03-14T00:00:00Z",
			"tags": ["tech", "music"],
		}))
	}

	#[test]
	fn empty_filter_matches_everything() {
		assert!(matches(&Map::new(), &user()));
	}

	#[test]
	fn equality_and_operators() {
		assert!(matches(&filter(serde_json::json!({ "location": "Bengaluru" })), &user()));
		assert!(matches(&filter(serde_json::json!({ "salary": { "$gte": 100_000 } })), &user()));
		assert!(!matches(&filter(serde_json::json!({ "salary": { "$lt": 100_000 } })), &user()));
		assert!(matches(
			&filter(serde_json::json!({ "gender": { "$in": ["female", "nonbinary"] } })),
			&user()
		));
		assert!(matches(&filter(serde_json::json!({ "gender": { "$ne": "male" } })), &user()));
	}

	#[test]
	fn array_fields_match_by_containment() {
		assert!(matches(&filter(serde_json::json!({ "tags": "music" })), &user()));
		assert!(matches(&filter(serde_json::json!({ "tags": { "$in": ["music"] } })), &user()));
		assert!(!matches(&filter(serde_json::json!({ "tags": "sports" })), &user()));
	}

	#[test]
	fn date_strings_compare_as_dates() {
		let after_1990 =
			filter(serde_json::json!({ "dateOfBirth": { "$gt": "1990-01-01T00:00:00Z" } }));
		let offset_form =
			filter(serde_json::json!({ "dateOfBirth": { "$lt": "2000-01-01T05:30:00+05:30" } }));

		assert!(matches(&after_1990, &user()));
		assert!(matches(&offset_form, &user()));
	}

	#[test]
	fn or_branches() {
		let either = filter(serde_json::json!({
			"$or": [ { "location": "Mumbai" }, { "location": "Bengaluru" } ]
		}));
		let neither = filter(serde_json::json!({
			"$or": [ { "location": "Mumbai" }, { "location": "Delhi" } ]
		}));

		assert!(matches(&either, &user()));
		assert!(!matches(&neither, &user()));
	}

	#[test]
	fn case_insensitive_regex() {
		let by_name = filter(serde_json::json!({
			"name": { "$regex": "asha", "$options": "i" }
		}));

		assert!(matches(&by_name, &user()));
	}

	#[test]
	fn invalid_regex_matches_nothing() {
		let broken = filter(serde_json::json!({ "name": { "$regex": "(" } }));

		assert!(!matches(&broken, &user()));
	}

	#[test]
	fn unknown_operator_matches_nothing() {
		let exotic = filter(serde_json::json!({ "salary": { "$near": 0 } }));

		assert!(!matches(&exotic, &user()));
	}

	#[test]
	fn missing_field_only_matches_null_or_absent() {
		assert!(!matches(&filter(serde_json::json!({ "email": "x@example.com" })), &user()));
		assert!(matches(&filter(serde_json::json!({ "email": { "$exists": false } })), &user()));
		assert!(matches(&filter(serde_json::json!({ "email": null })), &user()));
	}

	#[test]
	fn over_deep_filters_match_nothing() {
		let mut nested = serde_json::json!({ "location": "Bengaluru" });

		for _ in 0..12 {
			nested = serde_json::json!({ "$or": [nested] });
		}

		assert!(!matches(&filter(nested), &user()));
	}

	#[test]
	fn dotted_paths() {
		let record = doc(serde_json::json!({ "profile": { "city": "Pune" } }));

		assert!(matches(&filter(serde_json::json!({ "profile.city": "Pune" })), &record));
	}
}
