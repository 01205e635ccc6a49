use std::{future::Future, pin::Pin};

use crate::models::{Collection, Document};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Clone, Debug, Default)]
pub struct FindOptions {
	/// Maximum number of matching documents returned. Callers always clamp
	/// this before it reaches the store.
	pub limit: usize,
	/// Top-level fields stripped from every returned document.
	pub exclude: Vec<String>,
}

/// Read-only document-store boundary. The core never writes.
pub trait DocStore
where
	Self: Send + Sync,
{
	fn find<'a>(
		&'a self,
		collection: Collection,
		filter: &'a Document,
		opts: &'a FindOptions,
	) -> BoxFuture<'a, crate::Result<Vec<Document>>>;
}

/// Applies a `FindOptions` projection to one document.
pub fn project(mut doc: Document, exclude: &[String]) -> Document {
	for field in exclude {
		doc.remove(field);
	}

	doc
}
