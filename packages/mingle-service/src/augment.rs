use serde_json::Value;

use mingle_storage::{
	models::{Collection, Document, FIRST_PARTNER_FIELD, ID_FIELD, NAME_FIELD, PARTICIPANTS_FIELD, SECOND_PARTNER_FIELD},
	store::FindOptions,
};

use crate::{Result, SearchService};

/// Widens a gathering or dating filter so the raw free text can also match
/// by participant name: one bounded, case-insensitive lookup of user display
/// names, with any matching ids unioned into the filter's top-level `$or`
/// list. A no-op when nothing matches; other clauses are left untouched.
pub(crate) async fn union_name_matches(
	svc: &SearchService,
	collection: Collection,
	query: &str,
	filter: &mut Document,
) -> Result<()> {
	let trimmed = query.trim();

	if trimmed.is_empty() {
		return Ok(());
	}

	let mut name_filter = Document::new();

	name_filter.insert(
		NAME_FIELD.to_string(),
		serde_json::json!({ "$regex": regex::escape(trimmed), "$options": "i" }),
	);

	let opts = FindOptions {
		limit: svc.cfg.search.name_match_limit as usize,
		exclude: svc.sensitive_exclusions(),
	};
	let users = svc.store.find(Collection::Users, &name_filter, &opts).await?;
	let ids: Vec<Value> = users
		.iter()
		.filter_map(|user| user.get(ID_FIELD).and_then(Value::as_str))
		.map(|id| Value::String(id.to_string()))
		.collect();

	if ids.is_empty() {
		return Ok(());
	}

	let clauses: Vec<Value> = match collection {
		Collection::Events => {
			vec![serde_json::json!({ PARTICIPANTS_FIELD: { "$in": ids } })]
		},
		Collection::Datings => vec![
			serde_json::json!({ FIRST_PARTNER_FIELD: { "$in": ids.clone() } }),
			serde_json::json!({ SECOND_PARTNER_FIELD: { "$in": ids } }),
		],
		Collection::Users => Vec::new(),
	};

	if clauses.is_empty() {
		return Ok(());
	}

	let or_list = filter
		.entry("$or".to_string())
		.or_insert_with(|| Value::Array(Vec::new()));

	if let Value::Array(list) = or_list {
		list.extend(clauses);
	}

	Ok(())
}
