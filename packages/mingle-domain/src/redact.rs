use serde_json::{Map, Value};

/// Identity attributes that never leave the service unless the operator
/// enabled PII at startup.
pub const SENSITIVE_FIELDS: [&str; 2] = ["salary", "email"];

/// Returns a shallow copy of `record` with the sensitive attributes removed.
/// With `allow_pii` set the record passes through unchanged.
pub fn redact(record: &Map<String, Value>, allow_pii: bool) -> Map<String, Value> {
	let mut copy = record.clone();

	if !allow_pii {
		for field in SENSITIVE_FIELDS {
			copy.remove(field);
		}
	}

	copy
}
