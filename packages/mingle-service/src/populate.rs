use std::collections::{HashMap, HashSet};

use serde_json::Value;

use mingle_domain::redact;
use mingle_storage::{
	models::{Collection, Document, FIRST_PARTNER_FIELD, ID_FIELD, PARTICIPANTS_FIELD, SECOND_PARTNER_FIELD},
	store::FindOptions,
};

use crate::{Result, SearchService};

/// Resolves the weak identity references on a page of gathering or dating
/// records into redacted user sub-documents. One batched lookup per page;
/// a reference with no matching user degrades to an `{_id}` placeholder.
pub(crate) async fn attach_identities(
	svc: &SearchService,
	collection: Collection,
	docs: Vec<Document>,
) -> Result<Vec<Document>> {
	let ids = referenced_ids(collection, &docs);

	if ids.is_empty() {
		return Ok(docs);
	}

	let filter = id_filter(&ids);
	let opts = FindOptions { limit: ids.len(), exclude: svc.sensitive_exclusions() };
	let users = svc.store.find(Collection::Users, &filter, &opts).await?;
	let mut by_id: HashMap<String, Document> = HashMap::with_capacity(users.len());

	for user in users {
		let Some(id) = user.get(ID_FIELD).and_then(Value::as_str) else {
			continue;
		};

		by_id.insert(id.to_string(), redact::redact(&user, svc.cfg.search.allow_pii));
	}

	Ok(docs.into_iter().map(|doc| resolve_references(collection, doc, &by_id)).collect())
}

/// De-duplicated foreign identifiers across a page, in first-seen order.
pub(crate) fn referenced_ids(collection: Collection, docs: &[Document]) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut ids = Vec::new();
	let mut push = |id: &str| {
		if seen.insert(id.to_string()) {
			ids.push(id.to_string());
		}
	};

	for doc in docs {
		match collection {
			Collection::Events => {
				let participants =
					doc.get(PARTICIPANTS_FIELD).and_then(Value::as_array).into_iter().flatten();

				for participant in participants {
					if let Some(id) = participant.as_str() {
						push(id);
					}
				}
			},
			Collection::Datings =>
				for field in [FIRST_PARTNER_FIELD, SECOND_PARTNER_FIELD] {
					if let Some(id) = doc.get(field).and_then(Value::as_str) {
						push(id);
					}
				},
			Collection::Users => {},
		}
	}

	ids
}

pub(crate) fn id_filter(ids: &[String]) -> Document {
	let list: Vec<Value> = ids.iter().map(|id| Value::String(id.clone())).collect();
	let mut filter = Document::new();

	filter.insert(ID_FIELD.to_string(), serde_json::json!({ "$in": list }));

	filter
}

fn resolve_references(
	collection: Collection,
	mut doc: Document,
	by_id: &HashMap<String, Document>,
) -> Document {
	let resolve = |reference: &Value| -> Value {
		let Some(id) = reference.as_str() else {
			return reference.clone();
		};

		match by_id.get(id) {
			Some(user) => Value::Object(user.clone()),
			// Dangling reference; keep the slot with a placeholder.
			None => serde_json::json!({ ID_FIELD: id }),
		}
	};

	match collection {
		Collection::Events =>
			if let Some(Value::Array(participants)) = doc.get_mut(PARTICIPANTS_FIELD) {
				for slot in participants.iter_mut() {
					let resolved = resolve(slot);

					*slot = resolved;
				}
			},
		Collection::Datings =>
			for field in [FIRST_PARTNER_FIELD, SECOND_PARTNER_FIELD] {
				if let Some(slot) = doc.get_mut(field) {
					let resolved = resolve(slot);

					*slot = resolved;
				}
			},
		Collection::Users => {},
	}

	doc
}
