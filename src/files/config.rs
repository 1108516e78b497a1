use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

use crate::error::Result;

/// The target used when no config overrides it.
pub const DEFAULT_TARGET: &str = "https://server.test";

/// Configuration for new builders, usually kept in a `testrequest.toml`.
///
/// ```toml
/// target = "https://api.test"
///
/// [headers]
/// User-Agent = "testrequest"
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
	/// The target every new builder starts with, if any.
	pub target: Option<String>,
	/// Headers every new builder starts with, if any.
	pub headers: Option<BTreeMap<String, String>>,
}

impl Config {
	/// Parses a config from TOML.
	///
	/// # Errors
	/// Fails if the text is not a valid config.
	pub fn from_toml(text: &str) -> Result<Config> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a config file.
	///
	/// # Errors
	/// Fails if the file cannot be read or is not a valid config.
	pub fn load(path: impl AsRef<Path>) -> Result<Config> {
		let text = std::fs::read_to_string(path)?;
		Config::from_toml(&text)
	}

	/// Returns this config with its target replaced.
	#[must_use]
	pub fn with_target(mut self, target: impl Into<String>) -> Config {
		self.target = Some(target.into());
		self
	}

	/// Returns this config with a default header added.
	#[must_use]
	pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Config {
		self.headers
			.get_or_insert_with(BTreeMap::default)
			.insert(key.into(), value.into());
		self
	}

	/// The target new builders start with.
	#[must_use]
	pub fn target(&self) -> &str {
		self.target.as_deref().unwrap_or(DEFAULT_TARGET)
	}
}

/// Layers two configs. Fields set on the right win; header maps are merged.
impl std::ops::BitAnd for Config {
	type Output = Config;

	fn bitand(self, rhs: Self) -> Self::Output {
		Config {
			target: match (self.target, rhs.target) {
				(_, Some(v)) | (Some(v), None) => Some(v),
				(None, None) => None,
			},
			headers: match (self.headers, rhs.headers) {
				(Some(v), None) | (None, Some(v)) => Some(v),
				(Some(a), Some(b)) => Some(a.into_iter().chain(b.into_iter()).collect()),
				(None, None) => None,
			},
		}
	}
}
