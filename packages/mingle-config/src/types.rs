use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub translator: TranslatorConfig,
}

#[derive(Debug, Deserialize)]
pub struct TranslatorConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Page size used when a request carries no limit, or a non-positive one.
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	/// Hard ceiling for single-collection search.
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
	/// Hard ceiling for combined ("search all") mode.
	#[serde(default = "default_combined_max_limit")]
	pub combined_max_limit: u32,
	/// When true, salary and email survive redaction. Immutable for the
	/// process lifetime; never re-read per request.
	#[serde(default)]
	pub allow_pii: bool,
	/// Upper bound on identity rows fetched by the name-match augmenter.
	#[serde(default = "default_name_match_limit")]
	pub name_match_limit: u32,
}

impl Default for Search {
	fn default() -> Self {
		Self {
			default_limit: default_limit(),
			max_limit: default_max_limit(),
			combined_max_limit: default_combined_max_limit(),
			allow_pii: false,
			name_match_limit: default_name_match_limit(),
		}
	}
}

fn default_limit() -> u32 {
	10
}

fn default_max_limit() -> u32 {
	100
}

fn default_combined_max_limit() -> u32 {
	30
}

fn default_name_match_limit() -> u32 {
	50
}
