mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Providers, Search, Service, Storage, TranslatorConfig};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.translator.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.translator.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.translator.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.translator.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit == 0 {
		return Err(Error::Validation {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_limit < cfg.search.default_limit {
		return Err(Error::Validation {
			message: "search.max_limit must be at least search.default_limit.".to_string(),
		});
	}
	if cfg.search.combined_max_limit == 0 {
		return Err(Error::Validation {
			message: "search.combined_max_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.name_match_limit == 0 {
		return Err(Error::Validation {
			message: "search.name_match_limit must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let base = cfg.providers.translator.api_base.trim_end_matches('/').to_string();

	cfg.providers.translator.api_base = base;

	if !cfg.providers.translator.path.starts_with('/') {
		cfg.providers.translator.path = format!("/{}", cfg.providers.translator.path);
	}
}
