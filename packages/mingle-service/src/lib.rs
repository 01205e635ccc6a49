pub mod search;

mod augment;
mod error;
mod populate;

pub use error::{Error, Result};
pub use search::{
	CollectionResult, SearchAllQueries, SearchAllResponse, SearchAllResults, SearchRequest,
	SearchResponse,
};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use mingle_config::{Config, TranslatorConfig};
use mingle_domain::redact;
use mingle_providers::translator;
use mingle_storage::store::DocStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The external natural-language-to-query translator. Object-safe so tests
/// can inject spies and canned translations.
pub trait TranslatorProvider
where
	Self: Send + Sync,
{
	fn translate<'a>(
		&'a self,
		cfg: &'a TranslatorConfig,
		collection_hint: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

#[derive(Clone)]
pub struct Providers {
	pub translator: Arc<dyn TranslatorProvider>,
}
impl Providers {
	pub fn new(translator: Arc<dyn TranslatorProvider>) -> Self {
		Self { translator }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { translator: Arc::new(DefaultProviders) }
	}
}

struct DefaultProviders;
impl TranslatorProvider for DefaultProviders {
	fn translate<'a>(
		&'a self,
		cfg: &'a TranslatorConfig,
		collection_hint: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(translator::translate(cfg, collection_hint, query))
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub store: Arc<dyn DocStore>,
	pub providers: Providers,
}
impl SearchService {
	pub fn new(cfg: Config, store: Arc<dyn DocStore>) -> Self {
		Self { cfg, store, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, store: Arc<dyn DocStore>, providers: Providers) -> Self {
		Self { cfg, store, providers }
	}

	/// Store-level projection matching the redaction policy; sensitive
	/// fields never leave the store unless PII is allowed process-wide.
	pub(crate) fn sensitive_exclusions(&self) -> Vec<String> {
		if self.cfg.search.allow_pii {
			return Vec::new();
		}

		redact::SENSITIVE_FIELDS.iter().map(|field| (*field).to_string()).collect()
	}
}
