mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Feedback, Postgres, Ranking, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
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
	if !cfg.feedback.like_weight.is_finite() {
		return Err(Error::Validation {
			message: "feedback.like_weight must be a finite number.".to_string(),
		});
	}
	if cfg.feedback.like_weight <= 0.0 {
		return Err(Error::Validation {
			message: "feedback.like_weight must be greater than zero.".to_string(),
		});
	}
	if !cfg.feedback.dislike_weight.is_finite() {
		return Err(Error::Validation {
			message: "feedback.dislike_weight must be a finite number.".to_string(),
		});
	}
	if cfg.feedback.dislike_weight >= 0.0 {
		return Err(Error::Validation {
			message: "feedback.dislike_weight must be less than zero.".to_string(),
		});
	}
	if !cfg.ranking.vector_weight.is_finite() {
		return Err(Error::Validation {
			message: "ranking.vector_weight must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.ranking.vector_weight) {
		return Err(Error::Validation {
			message: "ranking.vector_weight must be in the range 0.0-1.0.".to_string(),
		});
	}

	Ok(())
}
