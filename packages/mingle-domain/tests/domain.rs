use serde_json::{Map, Value};

use mingle_domain::{dates, gate, matcher, redact};

fn object(raw: Value) -> Map<String, Value> {
	raw.as_object().expect("fixture is an object").clone()
}

#[test]
fn translated_filter_flows_through_gate_normalizer_and_matcher() {
	let raw = serde_json::json!({
		"type": "meetup",
		"date": {
			"$gte": { "$dateFromString": { "dateString": "2024-05-01" } },
			"$lt": { "$dateFromString": { "dateString": "2024-06-01" } },
		},
	});
	let gate::Outcome::Filter(filter) = gate::decode(&raw) else {
		panic!("expected an executable filter");
	};
	let normalized = dates::normalize(Value::Object(filter));
	let filter = normalized.as_object().expect("normalizer preserves the object shape");
	let event = object(serde_json::json!({
		"_id": "e1",
		"type": "meetup",
		"location": "Bengaluru",
		"date": "2024-05-18T18:30:00Z",
		"participants": ["u1", "u2"],
	}));

	assert!(matcher::matches(filter, &event));
}

#[test]
fn normalizer_is_stable_after_first_pass() {
	let raw = serde_json::json!({
		"$or": [
			{ "date": { "$gte": { "$dateFromString": { "dateString": "2024-01-01" } } } },
			{ "location": "Goa" },
		],
	});
	let once = dates::normalize(raw);
	let twice = dates::normalize(once.clone());

	assert_eq!(once, twice);
}

#[test]
fn redacted_records_never_carry_sensitive_fields() {
	let record = object(serde_json::json!({
		"_id": "u9",
		"name": "Dev Mehta",
		"salary": 95_000,
		"email": "dev@example.com",
		"occupation": "designer",
	}));
	let redacted = redact::redact(&record, false);

	for field in redact::SENSITIVE_FIELDS {
		assert!(!redacted.contains_key(field));
	}
	assert_eq!(redacted["occupation"], Value::String("designer".to_string()));
}
