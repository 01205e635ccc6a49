use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use mingle_domain::{
	dates,
	gate::{self, Outcome},
	redact,
};
use mingle_storage::{
	models::{Collection, Document},
	store::FindOptions,
};

use crate::{Result, SearchService, augment, populate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	/// Requested page size. Non-numeric and non-positive values fall back to
	/// the configured default, so a sloppy caller degrades instead of
	/// erroring.
	#[serde(default, deserialize_with = "lenient_limit")]
	pub limit: Option<i64>,
	pub populate: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	pub count: usize,
	pub results: Vec<Value>,
	/// Set when the translator flagged the request as ambiguous; the
	/// candidate filters are in `alternatives` and `count` is zero.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub ambiguous: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub alternatives: Option<Vec<Value>>,
}
impl SearchResponse {
	fn empty() -> Self {
		Self { count: 0, results: Vec::new(), ambiguous: false, alternatives: None }
	}

	fn of(results: Vec<Value>) -> Self {
		Self { count: results.len(), results, ambiguous: false, alternatives: None }
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResult {
	pub count: usize,
	pub data: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAllResults {
	pub users: CollectionResult,
	pub events: CollectionResult,
	pub dating: CollectionResult,
}

/// The raw translated queries, returned for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAllQueries {
	pub users: Value,
	pub events: Value,
	pub dating: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAllResponse {
	pub results: SearchAllResults,
	pub queries: SearchAllQueries,
}

impl SearchService {
	pub async fn search_users(&self, req: SearchRequest) -> Result<SearchResponse> {
		let limit = self.single_limit(req.limit);
		let (response, _) =
			self.search_collection(Collection::Users, &req.query, limit, false).await?;

		Ok(response)
	}

	pub async fn search_events(&self, req: SearchRequest) -> Result<SearchResponse> {
		let limit = self.single_limit(req.limit);
		let populate = req.populate.unwrap_or(true);
		let (response, _) =
			self.search_collection(Collection::Events, &req.query, limit, populate).await?;

		Ok(response)
	}

	pub async fn search_datings(&self, req: SearchRequest) -> Result<SearchResponse> {
		let limit = self.single_limit(req.limit);
		let populate = req.populate.unwrap_or(true);
		let (response, _) =
			self.search_collection(Collection::Datings, &req.query, limit, populate).await?;

		Ok(response)
	}

	/// Runs all three collection pipelines concurrently. Translator failures
	/// degrade inside each pipeline, so one collection's translation cannot
	/// block or fail the other two; only storage failures surface.
	pub async fn search_all(&self, req: SearchRequest) -> Result<SearchAllResponse> {
		let limit = gate::clamp_limit(
			req.limit,
			self.cfg.search.default_limit,
			self.cfg.search.combined_max_limit,
		);
		let populate = req.populate.unwrap_or(false);
		let (users, events, datings) = tokio::join!(
			self.search_collection(Collection::Users, &req.query, limit, false),
			self.search_collection(Collection::Events, &req.query, limit, populate),
			self.search_collection(Collection::Datings, &req.query, limit, populate),
		);
		let (users, users_query) = users?;
		let (events, events_query) = events?;
		let (datings, datings_query) = datings?;

		Ok(SearchAllResponse {
			results: SearchAllResults {
				users: CollectionResult { count: users.count, data: users.results },
				events: CollectionResult { count: events.count, data: events.results },
				dating: CollectionResult { count: datings.count, data: datings.results },
			},
			queries: SearchAllQueries {
				users: users_query,
				events: events_query,
				dating: datings_query,
			},
		})
	}

	fn single_limit(&self, requested: Option<i64>) -> usize {
		gate::clamp_limit(requested, self.cfg.search.default_limit, self.cfg.search.max_limit)
	}

	async fn search_collection(
		&self,
		collection: Collection,
		query: &str,
		limit: usize,
		populate: bool,
	) -> Result<(SearchResponse, Value)> {
		let translator_cfg = &self.cfg.providers.translator;
		let raw = match self
			.providers
			.translator
			.translate(translator_cfg, collection.hint(), query)
			.await
		{
			Ok(raw) => raw,
			Err(err) => {
				warn!(
					collection = collection.hint(),
					error = %err,
					"Translator failed; degrading to no-match.",
				);

				gate::no_match_sentinel()
			},
		};
		let response = match gate::decode(&raw) {
			Outcome::NoMatch => SearchResponse::empty(),
			Outcome::Ambiguous(alternatives) => SearchResponse {
				count: 0,
				results: Vec::new(),
				ambiguous: true,
				alternatives: Some(alternatives),
			},
			Outcome::Redirect { collection: secondary, criteria } =>
				self.redirect_to_users(&secondary, criteria, limit).await?,
			Outcome::Filter(filter) =>
				self.execute_filter(collection, filter, query, limit, populate).await?,
		};

		Ok((response, raw))
	}

	async fn execute_filter(
		&self,
		collection: Collection,
		filter: Document,
		query: &str,
		limit: usize,
		populate: bool,
	) -> Result<SearchResponse> {
		let normalized = dates::normalize(Value::Object(filter));
		let mut filter = normalized.as_object().cloned().unwrap_or_default();

		if matches!(collection, Collection::Events | Collection::Datings) {
			augment::union_name_matches(self, collection, query, &mut filter).await?;
		}

		debug!(collection = collection.hint(), filter = %serde_json::Value::Object(filter.clone()), "Executing translated filter.");

		let opts = FindOptions { limit, exclude: self.sensitive_exclusions() };
		let docs = self.store.find(collection, &filter, &opts).await?;
		let allow_pii = self.cfg.search.allow_pii;
		let results: Vec<Value> = match collection {
			Collection::Users =>
				docs.iter().map(|doc| Value::Object(redact::redact(doc, allow_pii))).collect(),
			_ if populate => populate::attach_identities(self, collection, docs)
				.await?
				.into_iter()
				.map(Value::Object)
				.collect(),
			_ => docs.into_iter().map(Value::Object).collect(),
		};

		Ok(SearchResponse::of(results))
	}

	/// Foreign-key redirect: run the criteria against the secondary
	/// collection, union the identity references from its matches, and fetch
	/// those users directly, bypassing the primary collection.
	async fn redirect_to_users(
		&self,
		secondary: &str,
		criteria: Document,
		limit: usize,
	) -> Result<SearchResponse> {
		let secondary = match secondary {
			"events" => Collection::Events,
			"dating" | "datings" => Collection::Datings,
			other => {
				warn!(collection = other, "Redirect names an unknown collection; degrading to empty.");

				return Ok(SearchResponse::empty());
			},
		};
		let normalized = dates::normalize(Value::Object(criteria));
		let criteria = normalized.as_object().cloned().unwrap_or_default();
		let scan_opts = FindOptions {
			limit: self.cfg.search.max_limit as usize,
			exclude: Vec::new(),
		};
		let matches = self.store.find(secondary, &criteria, &scan_opts).await?;
		let ids = populate::referenced_ids(secondary, &matches);

		if ids.is_empty() {
			return Ok(SearchResponse::empty());
		}

		let filter = populate::id_filter(&ids);
		let opts = FindOptions { limit, exclude: self.sensitive_exclusions() };
		let users = self.store.find(Collection::Users, &filter, &opts).await?;
		let allow_pii = self.cfg.search.allow_pii;
		let results =
			users.iter().map(|doc| Value::Object(redact::redact(doc, allow_pii))).collect();

		Ok(SearchResponse::of(results))
	}
}

fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(raw.as_ref().and_then(Value::as_i64))
}
