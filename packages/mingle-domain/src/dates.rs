use serde_json::Value;
use time::{
	Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339, macros::format_description,
};

/// Marker emitted by the translator for date literals, following the
/// `{"$dateFromString": {"dateString": "<ISO-8601>"}}` shape.
pub const DATE_FROM_STRING: &str = "$dateFromString";

/// Replaces every `$dateFromString` node in `value` with a canonical UTC
/// RFC 3339 string. All other structure passes through unchanged. Nodes with
/// a missing or unparseable `dateString` are left as they are; this function
/// never fails and is idempotent on already-normalized input.
pub fn normalize(value: Value) -> Value {
	match value {
		Value::Object(map) => {
			if let Some(normalized) = normalize_marker(&map) {
				return normalized;
			}

			Value::Object(map.into_iter().map(|(key, child)| (key, normalize(child))).collect())
		},
		Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
		scalar => scalar,
	}
}

fn normalize_marker(map: &serde_json::Map<String, Value>) -> Option<Value> {
	if map.len() != 1 {
		return None;
	}

	let inner = map.get(DATE_FROM_STRING)?.as_object()?;
	let raw = inner.get("dateString")?.as_str()?;

	parse_date_string(raw).map(Value::String)
}

/// Parses an ISO-8601-ish date string into canonical UTC RFC 3339 form.
/// Accepts a full RFC 3339 timestamp, a bare `YYYY-MM-DD` date (midnight
/// UTC), or a timestamp without an offset (assumed UTC).
pub fn parse_date_string(raw: &str) -> Option<String> {
	let trimmed = raw.trim();
	let parsed = OffsetDateTime::parse(trimmed, &Rfc3339)
		.ok()
		.or_else(|| {
			Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
				.ok()
				.map(|date| date.midnight().assume_utc())
		})
		.or_else(|| OffsetDateTime::parse(&format!("{trimmed}Z"), &Rfc3339).ok())?;

	parsed.to_offset(UtcOffset::UTC).format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn marker(date_string: &str) -> Value {
		serde_json::json!({ DATE_FROM_STRING: { "dateString": date_string } })
	}

	#[test]
	fn replaces_nested_markers() {
		let filter = serde_json::json!({
			"date": { "$gte": marker("2024-05-01"), "$lt": marker("2024-06-01T00:00:00+02:00") },
			"location": "Bengaluru",
		});
		let normalized = normalize(filter);

		assert_eq!(normalized["date"]["$gte"], Value::String("2024-05-01T00:00:00Z".to_string()));
		assert_eq!(normalized["date"]["$lt"], Value::String("2024-05-31T22:00:00Z".to_string()));
		assert_eq!(normalized["location"], Value::String("Bengaluru".to_string()));
	}

	#[test]
	fn walks_arrays() {
		let filter = serde_json::json!({ "$or": [ { "date": marker("2023-12-31") } ] });
		let normalized = normalize(filter);

		assert_eq!(
			normalized["$or"][0]["date"],
			Value::String("2023-12-31T00:00:00Z".to_string())
		);
	}

	#[test]
	fn leaves_unparseable_marker_in_place() {
		let filter = serde_json::json!({ "date": marker("next tuesday") });
		let normalized = normalize(filter.clone());

		assert_eq!(normalized, filter);
	}

	#[test]
	fn leaves_marker_without_date_string_in_place() {
		let node = serde_json::json!({ DATE_FROM_STRING: { "format": "%Y" } });
		let filter = serde_json::json!({ "date": node });
		let normalized = normalize(filter.clone());

		assert_eq!(normalized, filter);
	}

	#[test]
	fn idempotent_on_normalized_input() {
		let filter = serde_json::json!({ "date": { "$gte": marker("2024-05-01") } });
		let once = normalize(filter);
		let twice = normalize(once.clone());

		assert_eq!(once, twice);
	}
}
