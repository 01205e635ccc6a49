use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Asks the configured LLM to translate a free-text search string into a
/// structured filter for `collection_hint` (`users`, `events`, or `dating`).
/// The reply is parsed best-effort as JSON; the caller decides what a
/// failure degrades to.
pub async fn translate(
	cfg: &mingle_config::TranslatorConfig,
	collection_hint: &str,
	query: &str,
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let now = OffsetDateTime::now_utc().format(&Rfc3339)?;
	let system = system_prompt(collection_hint, &now);

	for _ in 0..3 {
		let body = serde_json::json!({
			"model": cfg.model,
			"temperature": cfg.temperature,
			"messages": [
				{ "role": "system", "content": system },
				{ "role": "user", "content": query },
			],
		});
		let res = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;
		if let Ok(parsed) = parse_translator_json(json) {
			return Ok(parsed);
		}
	}

	Err(eyre::eyre!("Translator response is not valid JSON."))
}

fn system_prompt(collection_hint: &str, now: &str) -> String {
	let schema = match collection_hint {
		"users" =>
			"users: _id, name, gender, location, occupation, salary, email, dateOfBirth (date)",
		"events" => "events: _id, type, location, date (date), participants (array of user _id)",
		_ => "dating: _id, location, date (date), firstUserId, secondUserId (user _id references)",
	};

	format!(
		"You translate natural-language search requests into MongoDB-style JSON filters \
for the `{collection_hint}` collection.\n\
Current server time: {now}.\n\
Collection schema: {schema}.\n\
Rules:\n\
- Reply with a single JSON object and nothing else.\n\
- Allowed operators: $or, $and, $in, $nin, $eq, $ne, $gt, $gte, $lt, $lte, $exists, \
$regex with $options \"i\".\n\
- Express every date literal as {{\"$dateFromString\": {{\"dateString\": \"<ISO-8601>\"}}}}.\n\
- If the request should match everything, reply with {{}}.\n\
- If nothing can match, reply with {{\"$noMatch\": true}}.\n\
- If the request is ambiguous, reply with {{\"$ambiguous\": [<candidate filters>]}}.\n\
- If the request describes the people in an event or dating record rather than the \
record itself, reply with {{\"$lookupFrom\": {{\"collection\": \"<events|dating>\", \
\"filter\": {{...}}}}}}."
	)
}

fn parse_translator_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		let parsed: Value = serde_json::from_str(strip_code_fences(content))
			.map_err(|_| eyre::eyre!("Translator content is not valid JSON."))?;

		return Ok(parsed);
	}

	if json.is_object() {
		return Ok(json);
	}

	Err(eyre::eyre!("Translator response is missing JSON content."))
}

/// Models frequently wrap JSON replies in Markdown code fences despite the
/// prompt; tolerate that instead of burning a retry.
fn strip_code_fences(content: &str) -> &str {
	let trimmed = content.trim();
	let Some(inner) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let inner = inner.strip_prefix("json").unwrap_or(inner);

	inner.strip_suffix("```").unwrap_or(inner).trim()
}
