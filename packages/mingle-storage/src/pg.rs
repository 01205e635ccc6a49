use std::sync::OnceLock;

use serde_json::Value;
use tracing::warn;

use crate::{
	Result,
	db::Db,
	models::{Collection, Document},
	store::{BoxFuture, DocStore, FindOptions, project},
};

const SCAN_BATCH: i64 = 500;

/// Postgres-backed document store. Documents live as JSONB rows; filters are
/// evaluated in process with the domain matcher, scanning in keyset-paginated
/// batches until the requested limit is filled.
pub struct PgStore {
	db: Db,
	/// First dating table name that probed successfully, cached for the
	/// process lifetime.
	datings_table: OnceLock<&'static str>,
}
impl PgStore {
	pub fn new(db: Db) -> Self {
		Self { db, datings_table: OnceLock::new() }
	}

	async fn resolve_table(&self, collection: Collection) -> Result<Option<&'static str>> {
		let candidates = collection.table_candidates();

		if candidates.len() == 1 {
			return Ok(Some(candidates[0]));
		}
		if let Some(table) = self.datings_table.get() {
			return Ok(Some(table));
		}

		for table in candidates {
			let regclass: Option<String> = sqlx::query_scalar("SELECT to_regclass($1)::text")
				.bind(table)
				.fetch_one(&self.db.pool)
				.await?;

			if regclass.is_some() {
				return Ok(Some(self.datings_table.get_or_init(|| table)));
			}
		}

		warn!(collection = collection.hint(), "No physical table found for collection.");

		Ok(None)
	}

	async fn scan(
		&self,
		table: &str,
		filter: &Document,
		opts: &FindOptions,
	) -> Result<Vec<Document>> {
		let query = format!("SELECT id, doc FROM {table} WHERE id > $1 ORDER BY id LIMIT $2");
		let mut out = Vec::new();
		let mut last_id = String::new();

		loop {
			let rows: Vec<(String, Value)> = sqlx::query_as(query.as_str())
				.bind(last_id.as_str())
				.bind(SCAN_BATCH)
				.fetch_all(&self.db.pool)
				.await?;
			let batch_len = rows.len();

			for (id, doc) in rows {
				let Some(obj) = doc.as_object() else {
					continue;
				};

				if mingle_domain::matcher::matches(filter, obj) {
					out.push(project(obj.clone(), &opts.exclude));

					if out.len() >= opts.limit {
						return Ok(out);
					}
				}

				last_id = id;
			}
			if (batch_len as i64) < SCAN_BATCH {
				return Ok(out);
			}
		}
	}
}
impl DocStore for PgStore {
	fn find<'a>(
		&'a self,
		collection: Collection,
		filter: &'a Document,
		opts: &'a FindOptions,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			if opts.limit == 0 {
				return Ok(Vec::new());
			}

			let Some(table) = self.resolve_table(collection).await? else {
				return Ok(Vec::new());
			};

			self.scan(table, filter, opts).await
		})
	}
}
