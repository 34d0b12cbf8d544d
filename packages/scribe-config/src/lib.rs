mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Notes, Postgres, Service, Storage};

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
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
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

	let notes = &cfg.notes;

	if notes.lock_stale_after_secs == 0 {
		return Err(Error::Validation {
			message: "notes.lock_stale_after_secs must be greater than zero.".to_string(),
		});
	}
	if notes.version_retention == 0 {
		return Err(Error::Validation {
			message: "notes.version_retention must be greater than zero.".to_string(),
		});
	}
	if notes.max_title_chars == 0 {
		return Err(Error::Validation {
			message: "notes.max_title_chars must be greater than zero.".to_string(),
		});
	}
	if notes.default_title.trim().is_empty() {
		return Err(Error::Validation {
			message: "notes.default_title must be non-empty.".to_string(),
		});
	}
	if notes.default_title.chars().count() as u32 > notes.max_title_chars {
		return Err(Error::Validation {
			message: "notes.default_title must not exceed notes.max_title_chars.".to_string(),
		});
	}
	if !is_hex_color(&notes.default_color) {
		return Err(Error::Validation {
			message: "notes.default_color must be a #rrggbb hex color.".to_string(),
		});
	}
	if notes.default_version_list_limit == 0 {
		return Err(Error::Validation {
			message: "notes.default_version_list_limit must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
	cfg.notes.default_title = cfg.notes.default_title.trim().to_string();
	cfg.notes.default_color = cfg.notes.default_color.trim().to_ascii_lowercase();
}

/// Whether `value` is a `#rrggbb` color, in either letter case. Notes and the configured default
/// share this rule.
pub fn is_hex_color(value: &str) -> bool {
	value
		.strip_prefix('#')
		.map(|hex| hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit()))
		.unwrap_or(false)
}
