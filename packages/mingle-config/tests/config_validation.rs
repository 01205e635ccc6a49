use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use mingle_config::Config;

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with<F>(mutate: F) -> String
where
	F: FnOnce(&mut toml::Table),
{
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");

	mutate(root);

	toml::to_string(&value).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("mingle_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load(payload: String) -> mingle_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = mingle_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

#[test]
fn sample_config_is_valid() {
	let cfg = load(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.search.default_limit, 10);
	assert!(!cfg.search.allow_pii);
}

#[test]
fn api_base_and_path_are_normalized() {
	let cfg = load(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.providers.translator.api_base, "https://api.example.com/v1");
	assert_eq!(cfg.providers.translator.path, "/chat/completions");
}

#[test]
fn search_limits_have_defaults() {
	let payload = sample_with(|root| {
		root.remove("search");
	});
	let cfg = load(payload).expect("Config without [search] must load.");

	assert_eq!(cfg.search.default_limit, 10);
	assert_eq!(cfg.search.max_limit, 100);
	assert_eq!(cfg.search.combined_max_limit, 30);
	assert_eq!(cfg.search.name_match_limit, 50);
	assert!(!cfg.search.allow_pii);
}

#[test]
fn api_key_must_be_non_empty() {
	let payload = sample_with(|root| {
		let translator = root
			.get_mut("providers")
			.and_then(Value::as_table_mut)
			.and_then(|providers| providers.get_mut("translator"))
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [providers.translator].");

		translator.insert("api_key".to_string(), Value::String(" ".to_string()));
	});
	let err = load(payload).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("providers.translator.api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn pool_size_must_be_positive() {
	let payload = sample_with(|root| {
		let postgres = root
			.get_mut("storage")
			.and_then(Value::as_table_mut)
			.and_then(|storage| storage.get_mut("postgres"))
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [storage.postgres].");

		postgres.insert("pool_max_conns".to_string(), Value::Integer(0));
	});
	let err = load(payload).expect_err("Expected pool size validation error.");

	assert!(
		err.to_string().contains("storage.postgres.pool_max_conns must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn max_limit_must_cover_default_limit() {
	let payload = sample_with(|root| {
		let search = root
			.get_mut("search")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [search].");

		search.insert("default_limit".to_string(), Value::Integer(40));
		search.insert("max_limit".to_string(), Value::Integer(20));
	});
	let err = load(payload).expect_err("Expected limit ordering validation error.");

	assert!(
		err.to_string().contains("search.max_limit must be at least search.default_limit."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_file_is_a_read_error() {
	let mut path = env::temp_dir();

	path.push("mingle_config_test_missing.toml");

	let err = mingle_config::load(&path).expect_err("Expected read error.");

	assert!(err.to_string().contains("Failed to read config"), "Unexpected error: {err}");
}
