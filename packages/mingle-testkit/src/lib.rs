//! Test support: an in-memory document store driven by the same filter
//! matcher as the Postgres store, plus fixtures for the three collections.

pub mod fixtures;

use std::{
	collections::HashMap,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::Value;

use mingle_storage::{
	models::{Collection, Document},
	store::{BoxFuture, DocStore, FindOptions, project},
};

/// In-memory `DocStore`. Counts `find` calls so tests can pin the
/// one-lookup-per-populate and zero-reads-on-no-match properties.
#[derive(Default)]
pub struct MemStore {
	collections: Mutex<HashMap<Collection, Vec<Document>>>,
	finds: AtomicUsize,
}
impl MemStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// A store pre-loaded with the standard fixtures.
	pub fn seeded() -> Self {
		let store = Self::new();

		store.insert_all(Collection::Users, fixtures::users());
		store.insert_all(Collection::Events, fixtures::events());
		store.insert_all(Collection::Datings, fixtures::datings());

		store
	}

	pub fn insert(&self, collection: Collection, doc: Document) {
		let mut collections = self.collections.lock().unwrap_or_else(|err| err.into_inner());

		collections.entry(collection).or_default().push(doc);
	}

	pub fn insert_all(&self, collection: Collection, docs: Vec<Document>) {
		for doc in docs {
			self.insert(collection, doc);
		}
	}

	pub fn find_calls(&self) -> usize {
		self.finds.load(Ordering::SeqCst)
	}
}
impl DocStore for MemStore {
	fn find<'a>(
		&'a self,
		collection: Collection,
		filter: &'a Document,
		opts: &'a FindOptions,
	) -> BoxFuture<'a, mingle_storage::Result<Vec<Document>>> {
		self.finds.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			let collections = self.collections.lock().unwrap_or_else(|err| err.into_inner());
			let docs = collections.get(&collection).cloned().unwrap_or_default();
			let mut out = Vec::new();

			for doc in docs {
				if mingle_domain::matcher::matches(filter, &doc) {
					out.push(project(doc, &opts.exclude));

					if out.len() >= opts.limit {
						break;
					}
				}
			}

			Ok(out)
		})
	}
}

/// Convenience for building a `Document` from a JSON literal in tests.
pub fn document(raw: Value) -> Document {
	raw.as_object().expect("test document literals must be objects").clone()
}
